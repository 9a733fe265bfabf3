//! Markdown and JSON rendering of the computed views.

use crate::engine::{
    AuthoritySummary, CountryAverage, CountryComparison, GlobalStats, RegionSummary,
    SectorSummary, TableRow,
};
use crate::report::{DashboardViews, TimelineView, ViewMetadata};
use anyhow::Result;

fn display_rate(rate: &Option<crate::models::RateValue>) -> String {
    rate.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
}

/// Generate a complete Markdown report from the computed views.
pub fn generate_markdown_report(views: &DashboardViews) -> String {
    let mut output = String::new();

    output.push_str("# TariffScope Report\n\n");

    output.push_str(&generate_metadata_section(&views.metadata));

    if let Some(ref global) = views.global {
        output.push_str(&generate_global_section(global));
    }
    if let Some(ref countries) = views.top_countries {
        output.push_str(&generate_countries_section(countries));
    }
    if let Some(ref regions) = views.regions {
        output.push_str(&generate_regions_section(regions));
    }
    if let Some(ref sectors) = views.sectors {
        output.push_str(&generate_sectors_section(sectors));
    }
    if let Some(ref authorities) = views.authorities {
        output.push_str(&generate_authorities_section(authorities));
    }
    if let Some(ref timeline) = views.timeline {
        output.push_str(&generate_timeline_section(timeline));
    }
    if let Some(ref comparison) = views.comparison {
        output.push_str(&generate_comparison_section(comparison));
    }
    if let Some(ref table) = views.table {
        output.push_str(&generate_table_section(table));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ViewMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!("- **Region Filter:** {}\n", metadata.region));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Countries:** {}\n", metadata.country_count));
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push_str("\n");

    section
}

/// Generate the global statistics section.
fn generate_global_section(global: &GlobalStats) -> String {
    let mut section = String::new();

    section.push_str("## Global Statistics\n\n");
    section.push_str("| Mean | Median | Min | Max | Samples |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {:.1}% | {:.1}% | {:.1}% | {:.1}% | {} |\n\n",
        global.mean, global.median, global.min, global.max, global.sample_count
    ));

    section
}

/// Generate the per-country averages section.
fn generate_countries_section(countries: &[CountryAverage]) -> String {
    let mut section = String::new();

    section.push_str("## Tariff Rates by Country\n\n");

    if countries.is_empty() {
        section.push_str("No country has a numeric tariff rate on record.\n\n");
        return section;
    }

    section.push_str("| Country | Average Rate |\n");
    section.push_str("|:---|:---:|\n");
    for country in countries {
        section.push_str(&format!(
            "| {} | {:.1}% |\n",
            country.country, country.avg_rate
        ));
    }
    section.push_str("\n");

    let highest = countries
        .iter()
        .max_by(|a, b| a.avg_rate.total_cmp(&b.avg_rate));
    let lowest = countries
        .iter()
        .min_by(|a, b| a.avg_rate.total_cmp(&b.avg_rate));
    if let (Some(high), Some(low)) = (highest, lowest) {
        section.push_str("### Key Insights\n\n");
        section.push_str(&format!(
            "- **Highest:** {} at {:.1}%\n",
            high.country, high.avg_rate
        ));
        section.push_str(&format!(
            "- **Lowest:** {} at {:.1}%\n",
            low.country, low.avg_rate
        ));
        section.push_str(&format!("- **Countries with data:** {}\n\n", countries.len()));
    }

    section
}

/// Generate the regional rollup section.
fn generate_regions_section(regions: &[RegionSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Regional Breakdown\n\n");

    if regions.is_empty() {
        section.push_str("No region has tariff data.\n\n");
        return section;
    }

    section.push_str("| Region | Average Rate | Countries | Coverage | Records |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|\n");
    for region in regions {
        let coverage = region
            .coverage
            .map_or_else(|| "-".to_string(), |c| format!("{:.0}%", c * 100.0));
        section.push_str(&format!(
            "| {} | {:.1}% | {} | {} | {} |\n",
            region.region, region.avg_rate, region.country_count, coverage, region.record_count
        ));
    }
    section.push_str("\n");

    section.push_str("### Key Insights\n\n");
    section.push_str(&format!(
        "- **Most affected region:** {} at {:.1}% average\n",
        regions[0].region, regions[0].avg_rate
    ));
    for region in regions {
        if let (Some(high), Some(low)) = (region.highest.as_ref(), region.lowest.as_ref()) {
            section.push_str(&format!(
                "- **{}:** highest {} ({:.1}%), lowest {} ({:.1}%)\n",
                region.region, high.country, high.avg_rate, low.country, low.avg_rate
            ));
        }
    }
    section.push_str("\n");

    section
}

/// Generate the sector rollup section.
fn generate_sectors_section(sectors: &[SectorSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Sector Breakdown\n\n");

    if sectors.is_empty() {
        section.push_str("No record carries a classifiable target description.\n\n");
        return section;
    }

    section.push_str("| Sector | Average Rate | Records | Countries | Products |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|\n");
    for sector in sectors {
        section.push_str(&format!(
            "| {} | {:.1}% | {} | {} | {} |\n",
            sector.sector,
            sector.avg_rate,
            sector.record_count,
            sector.countries.len(),
            sector.product_count
        ));
    }
    section.push_str("\n");

    section.push_str("### Key Insights\n\n");
    section.push_str(&format!(
        "- **Highest-tariffed sector:** {} at {:.1}%\n",
        sectors[0].sector, sectors[0].avg_rate
    ));
    if let Some(busiest) = sectors.iter().max_by_key(|s| s.record_count) {
        section.push_str(&format!(
            "- **Most targeted sector:** {} with {} records\n",
            busiest.sector, busiest.record_count
        ));
    }
    if let Some(diverse) = sectors.iter().max_by_key(|s| s.product_count) {
        section.push_str(&format!(
            "- **Widest product spread:** {} across {} product descriptions\n",
            diverse.sector, diverse.product_count
        ));
    }
    section.push_str("\n");

    section
}

/// Generate the legal authority section.
fn generate_authorities_section(authorities: &[AuthoritySummary]) -> String {
    let mut section = String::new();

    section.push_str("## Legal Authorities\n\n");

    if authorities.is_empty() {
        section.push_str("No record names a legal authority.\n\n");
        return section;
    }

    section.push_str("| Authority | Records | Average Rate | Countries |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");
    for authority in authorities {
        section.push_str(&format!(
            "| {} | {} | {:.1}% | {} |\n",
            authority.authority,
            authority.record_count,
            authority.avg_rate,
            authority.country_count
        ));
    }
    section.push_str("\n");

    section.push_str("### Key Insights\n\n");
    section.push_str(&format!(
        "- **Most used authority:** {} ({} records across {} countries)\n\n",
        authorities[0].authority, authorities[0].record_count, authorities[0].country_count
    ));

    section
}

/// Generate the timeline section.
fn generate_timeline_section(timeline: &TimelineView) -> String {
    let mut section = String::new();

    section.push_str("## Timeline\n\n");

    if timeline.events.is_empty() {
        section.push_str("No dated events in the selected window.\n\n");
        return section;
    }

    for event in &timeline.events {
        section.push_str(&format!("- **{}** {}\n", event.date, event.description));
    }
    section.push_str("\n");

    if !timeline.months.is_empty() {
        section.push_str("### Implementations by Month\n\n");
        section.push_str("| Month | Events | Average Rate |\n");
        section.push_str("|:---|:---:|:---:|\n");
        for month in &timeline.months {
            section.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                month.label, month.event_count, month.avg_rate
            ));
        }
        section.push_str("\n");
    }

    if let Some(ref delay) = timeline.delay {
        section.push_str("### Key Insights\n\n");
        section.push_str(&format!(
            "- **Average announcement-to-effect delay:** {:.1} days ({} records)\n\n",
            delay.average_days, delay.sample_count
        ));
    }

    section
}

/// Generate the country comparison section.
fn generate_comparison_section(comparison: &[CountryComparison]) -> String {
    let mut section = String::new();

    section.push_str("## Country Comparison\n\n");

    if comparison.is_empty() {
        section.push_str("None of the requested countries appear in the dataset.\n\n");
        return section;
    }

    section.push_str("| Country | Average Rate | Tariffs |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for entry in comparison {
        section.push_str(&format!(
            "| {} | {:.1}% | {} |\n",
            entry.country, entry.avg_rate, entry.record_count
        ));
    }
    section.push_str("\n");

    for entry in comparison {
        if entry.categories.len() > 1 {
            section.push_str(&format!("### {} by Category\n\n", entry.country));
            for (category, count) in &entry.categories {
                section.push_str(&format!("- {}: {}\n", category, count));
            }
            section.push_str("\n");
        }
    }

    section
}

/// Generate the flat record table.
fn generate_table_section(rows: &[TableRow]) -> String {
    let mut section = String::new();

    section.push_str("## All Records\n\n");

    if rows.is_empty() {
        section.push_str("No records match the current filters.\n\n");
        return section;
    }

    section.push_str("| Country | Target | Type | Rate | Announced | In Effect | Authority |\n");
    section.push_str("|:---|:---|:---|:---:|:---:|:---:|:---|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            row.country,
            row.target.as_deref().unwrap_or("-"),
            row.target_type.as_deref().unwrap_or("-"),
            display_rate(&row.rate),
            row.date_announced.as_deref().unwrap_or("-"),
            row.date_in_effect.as_deref().unwrap_or("-"),
            row.legal_authority.as_deref().unwrap_or("-"),
        ));
    }
    section.push_str("\n");

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by TariffScope*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(views: &DashboardViews) -> Result<String> {
    serde_json::to_string_pretty(views).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GlobalStats;
    use crate::models::RateValue;
    use chrono::Utc;

    fn create_test_views() -> DashboardViews {
        let metadata = ViewMetadata {
            source: "data/tariff_data.json".to_string(),
            region: "all".to_string(),
            generated_at: Utc::now(),
            country_count: 2,
            record_count: 3,
        };

        let mut views = DashboardViews::new(metadata);
        views.global = Some(GlobalStats {
            mean: 20.0,
            min: 10.0,
            max: 30.0,
            median: 20.0,
            sample_count: 2,
        });
        views.top_countries = Some(vec![
            CountryAverage {
                country: "China".to_string(),
                avg_rate: 30.0,
            },
            CountryAverage {
                country: "Canada".to_string(),
                avg_rate: 10.0,
            },
        ]);
        views
    }

    #[test]
    fn test_generate_markdown_report() {
        let views = create_test_views();
        let markdown = generate_markdown_report(&views);

        assert!(markdown.contains("# TariffScope Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Global Statistics"));
        assert!(markdown.contains("| China | 30.0% |"));
        assert!(markdown.contains("**Highest:** China at 30.0%"));
        // Unrequested views render no section.
        assert!(!markdown.contains("## Regional Breakdown"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let views = create_test_views();
        let section = generate_metadata_section(&views.metadata);

        assert!(section.contains("data/tariff_data.json"));
        assert!(section.contains("**Region Filter:** all"));
        assert!(section.contains("**Countries:** 2"));
    }

    #[test]
    fn test_generate_table_section_formats_rates() {
        let rows = vec![TableRow {
            country: "China".to_string(),
            target: Some("semiconductors".to_string()),
            target_type: None,
            rate: Some(RateValue::Text("Under investigation".to_string())),
            date_announced: Some("2025-04-01".to_string()),
            date_in_effect: None,
            legal_authority: None,
        }];

        let section = generate_table_section(&rows);
        assert!(section.contains("| China | semiconductors | - | Under investigation | 2025-04-01 | - | - |"));
    }

    #[test]
    fn test_generate_json_report_omits_empty_views() {
        let views = create_test_views();
        let json = generate_json_report(&views).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"global\""));
        assert!(!json.contains("\"sectors\""));
        assert!(!json.contains("\"timeline\""));
    }
}
