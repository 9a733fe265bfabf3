//! Grouping rollups: country, region, sector, legal authority, comparison.
//!
//! Every rollup reduces the dataset to per-group statistics and returns a
//! freshly-built view; the input dataset is never mutated.

use crate::engine::regions::RegionMap;
use crate::engine::sectors::SectorRules;
use crate::engine::stats::mean;
use crate::models::{Dataset, TariffRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

/// Sort order for the top-countries view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    HighestFirst,
    LowestFirst,
    Alphabetical,
}

/// One country with its positive-numeric average rate, percent-scaled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryAverage {
    pub country: String,
    pub avg_rate: f64,
}

/// Per-region rollup statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    /// Average of per-country averages (a two-level mean), percent-scaled.
    pub avg_rate: f64,
    /// Member countries with at least one positive numeric rate.
    pub country_count: usize,
    /// Countries defined for the region; `None` for the "Other" bucket.
    pub total_countries: Option<usize>,
    /// `country_count / total_countries`; `None` for the "Other" bucket.
    pub coverage: Option<f64>,
    /// Total records of qualifying countries, regardless of rate numerics.
    pub record_count: usize,
    pub highest: Option<CountryAverage>,
    pub lowest: Option<CountryAverage>,
}

/// Per-sector rollup statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorSummary {
    pub sector: String,
    /// Average over numeric rates only; 0 when the sector has none.
    pub avg_rate: f64,
    /// All classified records, including those with non-numeric rates.
    pub record_count: usize,
    /// Distinct affected countries, sorted.
    pub countries: Vec<String>,
    /// Distinct target descriptions (product diversity).
    pub product_count: usize,
    /// Up to five distinct targets for display.
    pub sample_products: Vec<String>,
}

/// Per-legal-authority rollup statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthoritySummary {
    pub authority: String,
    pub avg_rate: f64,
    pub record_count: usize,
    pub country_count: usize,
}

/// One country in the comparison view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryComparison {
    pub country: String,
    pub avg_rate: f64,
    /// Records with a positive numeric rate.
    pub record_count: usize,
    /// `target_type` label → record count, plus the implicit "All Tariffs"
    /// bucket holding the qualifying record count.
    pub categories: BTreeMap<String, usize>,
}

/// Positive numeric rates (fractions) for one country's records.
fn qualifying_rates(records: &[TariffRecord]) -> Vec<f64> {
    records
        .iter()
        .filter_map(TariffRecord::numeric_rate)
        .filter(|rate| *rate > 0.0)
        .collect()
}

/// Project the dataset onto one region's member countries.
///
/// "all" returns an equal dataset. An unknown key yields an empty dataset,
/// matching the UI behavior of an empty member list. The output never
/// introduces keys absent from the input.
pub fn filter_by_region(dataset: &Dataset, key: &str, regions: &RegionMap) -> Dataset {
    if key.trim().eq_ignore_ascii_case(super::regions::ALL_REGIONS) {
        return dataset.clone();
    }

    let Some(region) = regions.get(key) else {
        warn!("Unknown region filter {:?}; no countries match", key);
        return Dataset::default();
    };

    let entries = dataset
        .iter()
        .filter(|(country, _)| region.countries.iter().any(|c| c == country))
        .map(|(country, records)| (country.to_string(), records.to_vec()))
        .collect();

    Dataset::from_entries(entries)
}

/// Average rate per country over positive numeric rates only, sorted
/// descending. Countries without a qualifying record are excluded, never
/// zero-filled. Ties keep the dataset's encounter order (stable sort).
pub fn country_averages(dataset: &Dataset) -> Vec<CountryAverage> {
    let mut rows: Vec<CountryAverage> = dataset
        .iter()
        .filter_map(|(country, records)| {
            let rates = qualifying_rates(records);
            if rates.is_empty() {
                return None;
            }
            Some(CountryAverage {
                country: country.to_string(),
                avg_rate: mean(&rates) * 100.0,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.avg_rate.partial_cmp(&a.avg_rate).unwrap_or(Ordering::Equal));
    rows
}

/// Presentation step over [`country_averages`] output: re-sort and
/// truncate to the top N. Asking for more entries than exist returns the
/// full sequence.
pub fn arrange(
    mut rows: Vec<CountryAverage>,
    order: SortOrder,
    top: Option<usize>,
) -> Vec<CountryAverage> {
    match order {
        SortOrder::HighestFirst => {} // country_averages is already descending
        SortOrder::LowestFirst => {
            rows.sort_by(|a, b| a.avg_rate.partial_cmp(&b.avg_rate).unwrap_or(Ordering::Equal));
        }
        SortOrder::Alphabetical => rows.sort_by(|a, b| a.country.cmp(&b.country)),
    }
    if let Some(n) = top {
        rows.truncate(n);
    }
    rows
}

#[derive(Default)]
struct RegionAcc {
    avg_sum: f64,
    country_count: usize,
    record_count: usize,
    highest: Option<CountryAverage>,
    lowest: Option<CountryAverage>,
}

impl RegionAcc {
    fn add_country(&mut self, country: &str, avg_percent: f64, records: usize) {
        self.avg_sum += avg_percent;
        self.country_count += 1;
        self.record_count += records;

        let entry = CountryAverage {
            country: country.to_string(),
            avg_rate: avg_percent,
        };
        if self.highest.as_ref().map_or(true, |h| avg_percent > h.avg_rate) {
            self.highest = Some(entry.clone());
        }
        if self.lowest.as_ref().map_or(true, |l| avg_percent < l.avg_rate) {
            self.lowest = Some(entry);
        }
    }
}

const OTHER_REGION: &str = "Other";

/// Roll countries up into regions. The region average is the average of
/// per-country averages, not of raw rates. Regions with no qualifying
/// country are omitted; countries outside every region accumulate into an
/// "Other" bucket without a coverage denominator. Sorted by region average
/// descending.
pub fn regional_rollup(dataset: &Dataset, regions: &RegionMap) -> Vec<RegionSummary> {
    let mut accs: HashMap<String, RegionAcc> = HashMap::new();

    for (country, records) in dataset.iter() {
        let rates = qualifying_rates(records);
        if rates.is_empty() {
            continue;
        }
        let avg_percent = mean(&rates) * 100.0;
        let region_name = regions
            .region_of(country)
            .map_or(OTHER_REGION, |r| r.name.as_str());

        accs.entry(region_name.to_string())
            .or_default()
            .add_country(country, avg_percent, records.len());
    }

    // Assemble in definition order (then "Other") so equal averages keep a
    // deterministic order through the stable sort below.
    let mut summaries = Vec::new();
    for region in regions.iter() {
        if let Some(acc) = accs.remove(&region.name) {
            let total = region.countries.len();
            summaries.push(RegionSummary {
                region: region.name.clone(),
                avg_rate: acc.avg_sum / acc.country_count as f64,
                country_count: acc.country_count,
                total_countries: Some(total),
                coverage: Some(acc.country_count as f64 / total as f64),
                record_count: acc.record_count,
                highest: acc.highest,
                lowest: acc.lowest,
            });
        }
    }
    if let Some(acc) = accs.remove(OTHER_REGION) {
        summaries.push(RegionSummary {
            region: OTHER_REGION.to_string(),
            avg_rate: acc.avg_sum / acc.country_count as f64,
            country_count: acc.country_count,
            total_countries: None,
            coverage: None,
            record_count: acc.record_count,
            highest: acc.highest,
            lowest: acc.lowest,
        });
    }

    summaries.sort_by(|a, b| b.avg_rate.partial_cmp(&a.avg_rate).unwrap_or(Ordering::Equal));
    summaries
}

#[derive(Default)]
struct SectorAcc {
    rates: Vec<f64>,
    record_count: usize,
    countries: BTreeSet<String>,
    targets: BTreeSet<String>,
}

/// Classify every record with a non-empty `target` and roll up per sector.
/// Sectors with fewer than `min_records` records are omitted. Sorted by
/// sector average descending.
pub fn sector_rollup(
    dataset: &Dataset,
    rules: &SectorRules,
    min_records: usize,
) -> Vec<SectorSummary> {
    let mut accs: HashMap<String, SectorAcc> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for (country, record) in dataset.records() {
        let Some(target) = record.target.as_deref().map(str::trim) else {
            continue;
        };
        if target.is_empty() {
            continue;
        }

        let sector = rules.classify(target).to_string();
        if !accs.contains_key(&sector) {
            first_seen.push(sector.clone());
        }
        let acc = accs.entry(sector).or_default();

        if let Some(percent) = record.percent_rate() {
            acc.rates.push(percent);
        }
        acc.record_count += 1;
        acc.countries.insert(country.to_string());
        acc.targets.insert(target.to_string());
    }

    let mut summaries: Vec<SectorSummary> = first_seen
        .into_iter()
        .filter_map(|sector| {
            let acc = accs.remove(&sector)?;
            if acc.record_count < min_records {
                return None;
            }
            Some(SectorSummary {
                sector,
                avg_rate: mean(&acc.rates),
                record_count: acc.record_count,
                countries: acc.countries.into_iter().collect(),
                product_count: acc.targets.len(),
                sample_products: acc.targets.into_iter().take(5).collect(),
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.avg_rate.partial_cmp(&a.avg_rate).unwrap_or(Ordering::Equal));
    summaries
}

#[derive(Default)]
struct AuthorityAcc {
    rates: Vec<f64>,
    record_count: usize,
    countries: BTreeSet<String>,
}

/// Group records by trimmed `legal_authority`; records without one are
/// excluded entirely. Sorted by record count descending — unlike the other
/// rollups, usage matters more than rate here.
pub fn authority_rollup(dataset: &Dataset) -> Vec<AuthoritySummary> {
    let mut accs: HashMap<String, AuthorityAcc> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for (country, record) in dataset.records() {
        let Some(authority) = record.legal_authority.as_deref().map(str::trim) else {
            continue;
        };
        if authority.is_empty() {
            continue;
        }

        if !accs.contains_key(authority) {
            first_seen.push(authority.to_string());
        }
        let acc = accs.entry(authority.to_string()).or_default();

        if let Some(percent) = record.percent_rate() {
            acc.rates.push(percent);
        }
        acc.record_count += 1;
        acc.countries.insert(country.to_string());
    }

    let mut summaries: Vec<AuthoritySummary> = first_seen
        .into_iter()
        .filter_map(|authority| {
            let acc = accs.remove(&authority)?;
            Some(AuthoritySummary {
                authority,
                avg_rate: mean(&acc.rates),
                record_count: acc.record_count,
                country_count: acc.countries.len(),
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.record_count.cmp(&a.record_count));
    summaries
}

/// Side-by-side view for a caller-chosen country list. Requested countries
/// absent from the dataset are silently skipped. Sorted by average rate
/// descending.
pub fn comparison_set(dataset: &Dataset, countries: &[String]) -> Vec<CountryComparison> {
    let mut rows: Vec<CountryComparison> = countries
        .iter()
        .filter_map(|country| {
            let records = dataset.get(country)?;
            let rates = qualifying_rates(records);

            let mut categories = BTreeMap::new();
            categories.insert("All Tariffs".to_string(), rates.len());
            for record in records {
                if let Some(label) = record.target_type.as_deref() {
                    *categories.entry(label.to_string()).or_insert(0) += 1;
                }
            }

            Some(CountryComparison {
                country: country.clone(),
                avg_rate: if rates.is_empty() { 0.0 } else { mean(&rates) * 100.0 },
                record_count: rates.len(),
                categories,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.avg_rate.partial_cmp(&a.avg_rate).unwrap_or(Ordering::Equal));
    rows
}
