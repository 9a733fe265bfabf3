//! Flattened record table with search and column sorting.

use crate::models::{Dataset, RateValue};
use serde::Serialize;
use std::cmp::Ordering;

/// One record flattened with its country, for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub country: String,
    pub target: Option<String>,
    pub target_type: Option<String>,
    pub rate: Option<RateValue>,
    pub date_announced: Option<String>,
    pub date_in_effect: Option<String>,
    pub legal_authority: Option<String>,
}

/// Flatten every record in dataset encounter order.
pub fn table_rows(dataset: &Dataset) -> Vec<TableRow> {
    dataset
        .records()
        .map(|(country, record)| TableRow {
            country: country.to_string(),
            target: record.target.clone(),
            target_type: record.target_type.clone(),
            rate: record.rate.clone(),
            date_announced: record.date_announced.clone(),
            date_in_effect: record.date_in_effect.clone(),
            legal_authority: record.legal_authority.clone(),
        })
        .collect()
}

/// Case-insensitive substring match against country and target. An empty
/// term keeps every row.
pub fn search_rows(rows: Vec<TableRow>, term: &str) -> Vec<TableRow> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| {
            row.country.to_lowercase().contains(&needle)
                || row
                    .target
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSort {
    CountryAsc,
    CountryDesc,
    RateAsc,
    RateDesc,
}

/// Rate used for column sorting; rows without a numeric rate sort below
/// every real rate.
fn sort_rate(row: &TableRow) -> f64 {
    row.rate.as_ref().and_then(RateValue::numeric).unwrap_or(-1.0)
}

/// Sort rows by the chosen column. Stable, so equal keys keep their
/// current relative order.
pub fn sort_rows(rows: &mut [TableRow], sort: TableSort) {
    match sort {
        TableSort::CountryAsc => rows.sort_by(|a, b| a.country.cmp(&b.country)),
        TableSort::CountryDesc => rows.sort_by(|a, b| b.country.cmp(&a.country)),
        TableSort::RateAsc => rows.sort_by(|a, b| {
            sort_rate(a).partial_cmp(&sort_rate(b)).unwrap_or(Ordering::Equal)
        }),
        TableSort::RateDesc => rows.sort_by(|a, b| {
            sort_rate(b).partial_cmp(&sort_rate(a)).unwrap_or(Ordering::Equal)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TariffRecord;

    fn sample_rows() -> Vec<TableRow> {
        let ds = Dataset::from_entries(vec![
            (
                "Canada".to_string(),
                vec![TariffRecord {
                    target: Some("softwood lumber".to_string()),
                    rate: Some(RateValue::Number(0.25)),
                    ..Default::default()
                }],
            ),
            (
                "China".to_string(),
                vec![
                    TariffRecord {
                        target: Some("all goods".to_string()),
                        rate: Some(RateValue::Number(0.34)),
                        ..Default::default()
                    },
                    TariffRecord {
                        target: Some("semiconductors".to_string()),
                        rate: Some(RateValue::Text("Under investigation".to_string())),
                        ..Default::default()
                    },
                ],
            ),
        ]);
        table_rows(&ds)
    }

    #[test]
    fn test_table_rows_flattens_in_order() {
        let rows = sample_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].country, "Canada");
        assert_eq!(rows[1].country, "China");
        assert_eq!(rows[2].target.as_deref(), Some("semiconductors"));
    }

    #[test]
    fn test_search_matches_country_or_target() {
        let by_country = search_rows(sample_rows(), "chi");
        assert_eq!(by_country.len(), 2);

        let by_target = search_rows(sample_rows(), "LUMBER");
        assert_eq!(by_target.len(), 1);
        assert_eq!(by_target[0].country, "Canada");

        assert_eq!(search_rows(sample_rows(), "  ").len(), 3);
        assert!(search_rows(sample_rows(), "zzz").is_empty());
    }

    #[test]
    fn test_sort_by_rate_puts_non_numeric_last() {
        let mut rows = sample_rows();
        sort_rows(&mut rows, TableSort::RateDesc);
        assert_eq!(rows[0].country, "China");
        assert_eq!(rows[0].target.as_deref(), Some("all goods"));
        assert_eq!(rows[2].target.as_deref(), Some("semiconductors"));

        sort_rows(&mut rows, TableSort::RateAsc);
        assert_eq!(rows[0].target.as_deref(), Some("semiconductors"));
    }

    #[test]
    fn test_sort_by_country() {
        let mut rows = sample_rows();
        sort_rows(&mut rows, TableSort::CountryDesc);
        assert_eq!(rows[0].country, "China");
        assert_eq!(rows[2].country, "Canada");
    }
}
