//! Global rate statistics.

use crate::models::Dataset;
use serde::Serialize;

/// Arithmetic mean; 0 for an empty slice, never NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median: sort ascending, average the two middle elements for an even
/// count; 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Headline statistics over every numeric rate in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Number of numeric rates the statistics were computed over.
    pub sample_count: usize,
}

/// Flatten ALL numeric rates (percent-scaled) across the dataset and
/// compute mean/min/max/median.
///
/// Unlike [`crate::engine::country_averages`], zero rates are kept: any
/// record whose rate is a number counts here. The two inclusion rules are
/// intentionally different and must not be unified.
pub fn global_statistics(dataset: &Dataset) -> GlobalStats {
    let rates: Vec<f64> = dataset
        .records()
        .filter_map(|(_, record)| record.percent_rate())
        .collect();

    if rates.is_empty() {
        return GlobalStats::default();
    }

    let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    GlobalStats {
        mean: mean(&rates),
        min,
        max,
        median: median(&rates),
        sample_count: rates.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RateValue, TariffRecord};

    fn record(rate: Option<RateValue>) -> TariffRecord {
        TariffRecord {
            rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[10.0, 20.0, 30.0]), 20.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[10.0, 20.0, 30.0]), 20.0);
        assert_eq!(median(&[10.0, 20.0, 30.0, 40.0]), 25.0);
        assert_eq!(median(&[30.0, 10.0, 20.0]), 20.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_global_statistics() {
        let ds = Dataset::from_entries(vec![
            ("A".to_string(), vec![record(Some(RateValue::Number(0.1)))]),
            ("B".to_string(), vec![record(Some(RateValue::Number(0.3)))]),
            (
                "C".to_string(),
                vec![record(Some(RateValue::Text("Exempt".to_string())))],
            ),
        ]);

        let stats = global_statistics(&ds);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.median, 20.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.sample_count, 2);
    }

    #[test]
    fn test_global_statistics_keeps_zero_rates() {
        // Zero rates are excluded from country averages but kept here.
        let ds = Dataset::from_entries(vec![(
            "A".to_string(),
            vec![
                record(Some(RateValue::Number(0.0))),
                record(Some(RateValue::Number(0.2))),
            ],
        )]);

        let stats = global_statistics(&ds);
        assert_eq!(stats.sample_count, 2);
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.min, 0.0);
    }

    #[test]
    fn test_global_statistics_empty_dataset() {
        let stats = global_statistics(&Dataset::default());
        assert_eq!(stats, GlobalStats::default());
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
    }
}
