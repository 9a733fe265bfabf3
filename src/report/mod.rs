//! Report assembly: the view bundle handed to the renderers.

mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::engine::{
    AuthoritySummary, CountryAverage, CountryComparison, GlobalStats, ImplementationDelay,
    MonthBucket, RegionSummary, SectorSummary, TableRow, TimelineEvent,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Provenance attached to every report.
#[derive(Debug, Clone, Serialize)]
pub struct ViewMetadata {
    /// Where the dataset came from (file path or URL).
    pub source: String,
    /// Region filter applied before aggregation.
    pub region: String,
    pub generated_at: DateTime<Utc>,
    pub country_count: usize,
    pub record_count: usize,
}

/// The chronological views travel together.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineView {
    pub events: Vec<TimelineEvent>,
    pub months: Vec<MonthBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<ImplementationDelay>,
}

/// Everything a single run computed. Views the user did not request stay
/// `None` and are omitted from JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardViews {
    pub metadata: ViewMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_countries: Option<Vec<CountryAverage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<RegionSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<SectorSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<AuthoritySummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Vec<CountryComparison>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<TableRow>>,
}

impl DashboardViews {
    /// An empty bundle carrying only provenance.
    pub fn new(metadata: ViewMetadata) -> Self {
        Self {
            metadata,
            global: None,
            top_countries: None,
            regions: None,
            sectors: None,
            authorities: None,
            timeline: None,
            comparison: None,
            table: None,
        }
    }
}
