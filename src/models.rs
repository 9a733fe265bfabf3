//! Core data model for the tariff dataset.
//!
//! This module contains the raw dataset types shared by the loader,
//! the aggregation engine and the report generator.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Placeholder strings that appear where an effective date is expected.
pub const SENTINEL_DATES: [&str; 3] = ["TBD", "Exempt", "Under investigation"];

/// Returns true if the value is a non-date placeholder ("TBD", "Exempt", ...).
pub fn is_sentinel(value: &str) -> bool {
    SENTINEL_DATES.contains(&value.trim())
}

/// Parse an ISO `YYYY-MM-DD` date string. Anything else yields `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// A tariff rate as it appears in the source data: either a numeric
/// fraction (0.25 = 25%) or free text ("TBD", "Exempt", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    /// Numeric fraction in [0, 1].
    Number(f64),
    /// Free-text placeholder.
    Text(String),
}

impl RateValue {
    /// The rate as a fraction, if numeric.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            RateValue::Number(n) => Some(*n),
            RateValue::Text(_) => None,
        }
    }

    /// The rate scaled to percent, if numeric.
    pub fn percent(&self) -> Option<f64> {
        self.numeric().map(|n| n * 100.0)
    }
}

impl fmt::Display for RateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateValue::Number(n) => write!(f, "{:.1}%", n * 100.0),
            RateValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Accepts a number or a string; any other JSON shape becomes `None`
/// rather than failing the whole record.
fn lenient_rate<'de, D>(deserializer: D) -> Result<Option<RateValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().map(RateValue::Number),
        serde_json::Value::String(s) => Some(RateValue::Text(s)),
        _ => None,
    })
}

/// One announced/implemented duty entry for a country against some target
/// goods. Every field is optional in the source data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffRecord {
    /// Free-text description of the goods/sector affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Short category label used for per-country breakdowns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    /// Numeric fraction or free text; see [`RateValue`].
    #[serde(
        default,
        deserialize_with = "lenient_rate",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate: Option<RateValue>,
    /// ISO date the measure was announced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_announced: Option<String>,
    /// ISO date in effect, or a sentinel ("TBD", "Exempt", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_in_effect: Option<String>,
    /// Legal basis citation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_authority: Option<String>,
    /// Source citations; not used in aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl TariffRecord {
    /// Numeric rate as a fraction, if present.
    pub fn numeric_rate(&self) -> Option<f64> {
        self.rate.as_ref().and_then(RateValue::numeric)
    }

    /// Numeric rate scaled to percent, if present.
    pub fn percent_rate(&self) -> Option<f64> {
        self.rate.as_ref().and_then(RateValue::percent)
    }

    /// Valid announcement date, if any.
    pub fn announced_date(&self) -> Option<NaiveDate> {
        self.date_announced.as_deref().and_then(parse_date)
    }

    /// Valid, non-sentinel effective date, if any.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        let raw = self.date_in_effect.as_deref()?;
        if is_sentinel(raw) {
            return None;
        }
        parse_date(raw)
    }
}

/// The immutable in-memory dataset: country name mapped to its tariff
/// records, with the source document's encounter order preserved so that
/// descending sorts break ties in original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Vec<(String, Vec<TariffRecord>)>,
}

impl Dataset {
    /// Build a dataset from (country, records) pairs in encounter order.
    pub fn from_entries(entries: Vec<(String, Vec<TariffRecord>)>) -> Self {
        Self { entries }
    }

    /// Iterate countries in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TariffRecord])> {
        self.entries
            .iter()
            .map(|(country, records)| (country.as_str(), records.as_slice()))
    }

    /// Iterate every record with its country, in encounter order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &TariffRecord)> {
        self.iter()
            .flat_map(|(country, records)| records.iter().map(move |r| (country, r)))
    }

    /// Records for a single country, if present.
    pub fn get(&self, country: &str) -> Option<&[TariffRecord]> {
        self.entries
            .iter()
            .find(|(name, _)| name == country)
            .map(|(_, records)| records.as_slice())
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset has no countries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of records across all countries.
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    /// Country names in encounter order.
    pub fn country_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}
