//! The tariff aggregation engine.
//!
//! Pure functions over the immutable [`crate::models::Dataset`]: the same
//! inputs always produce the same output, and nothing here touches
//! presentation state. Region tables, classification rules and the "today"
//! clock are explicit parameters so every operation stays effect-free.

pub mod regions;
pub mod rollups;
pub mod sectors;
pub mod stats;
pub mod table;
pub mod timeline;

pub use regions::RegionMap;
pub use rollups::{
    arrange, authority_rollup, comparison_set, country_averages, filter_by_region,
    regional_rollup, sector_rollup, AuthoritySummary, CountryAverage, CountryComparison,
    RegionSummary, SectorSummary, SortOrder,
};
pub use sectors::SectorRules;
pub use stats::{global_statistics, GlobalStats};
pub use table::{search_rows, sort_rows, table_rows, TableRow, TableSort};
pub use timeline::{
    events_in_range, implementation_delay, month_buckets, timeline_events, EventKind,
    ImplementationDelay, MonthBucket, TimelineEvent,
};
