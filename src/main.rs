//! TariffScope - tariff data aggregation and reporting
//!
//! A CLI tool that loads a tariff dataset, aggregates it by country,
//! region, sector, legal authority, and time, and renders the views
//! as JSON or Markdown.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (load failure, malformed data shape, bad config)
//!   2 - The region filter matched no countries

mod cli;
mod config;
mod dataset;
mod engine;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat, SortChoice, ViewKind};
use config::Config;
use dataset::{load_dataset, DataSource};
use engine::{RegionMap, SectorRules, SortOrder, TableSort};
use models::parse_date;
use report::{DashboardViews, TimelineView, ViewMetadata};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("TariffScope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the report
    match run_report(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {}", e);
            eprintln!("\nError: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .tariffscope.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".tariffscope.toml");

    if path.exists() {
        eprintln!(".tariffscope.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .tariffscope.toml")?;

    println!("Created .tariffscope.toml with default settings.");
    println!("Edit it to customize the data source, filters, and sector rules.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow. Returns exit code (0 or 2).
async fn run_report(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Load the dataset
    let source = DataSource::parse(&config.data.source);
    info!("Loading dataset from {}", source);
    let dataset = load_dataset(&source).await?;
    info!(
        "Loaded {} countries, {} records",
        dataset.len(),
        dataset.record_count()
    );

    // Step 2: Apply the region filter
    let regions = RegionMap::builtin();
    let region_key = config.filters.region.clone();
    let filtered = engine::filter_by_region(&dataset, &region_key, &regions);

    if filtered.is_empty() {
        warn!("Region filter '{}' matched no countries", region_key);
        eprintln!("No countries match region '{}'. Nothing to report.", region_key);
        return Ok(2);
    }

    // Step 3: Build the sector classifier (config rules or built-in)
    let sector_rules = build_sector_rules(&config)?;

    // Step 4: Compute the requested views
    let metadata = ViewMetadata {
        source: source.to_string(),
        region: region_key,
        generated_at: Utc::now(),
        country_count: filtered.len(),
        record_count: filtered.record_count(),
    };
    let views = compute_views(&args, &config, &filtered, &regions, &sector_rules, metadata);

    // Step 5: Render and write
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&views)?,
        OutputFormat::Markdown => report::generate_markdown_report(&views),
    };

    let destination = &config.general.output;
    if destination == "-" {
        println!("{}", output);
    } else {
        std::fs::write(destination, &output)
            .with_context(|| format!("Failed to write report to {}", destination))?;
        info!("Report saved to {}", destination);
    }

    Ok(0)
}

/// Build the sector rule set from config, falling back to the built-in
/// rules when none are configured.
fn build_sector_rules(config: &Config) -> Result<SectorRules> {
    if config.sectors.rules.is_empty() {
        return Ok(SectorRules::builtin());
    }

    let pairs: Vec<(&str, &str)> = config
        .sectors
        .rules
        .iter()
        .map(|rule| (rule.pattern.as_str(), rule.label.as_str()))
        .collect();

    SectorRules::from_pairs(&pairs, &config.sectors.default_label)
        .context("Invalid sector rule pattern in configuration")
}

/// Compute the views selected by --view over the filtered dataset.
fn compute_views(
    args: &Args,
    config: &Config,
    dataset: &models::Dataset,
    regions: &RegionMap,
    sector_rules: &SectorRules,
    metadata: ViewMetadata,
) -> DashboardViews {
    let view = args.view;
    let mut views = DashboardViews::new(metadata);

    let wants = |kind: ViewKind| view == ViewKind::All || view == kind;

    if view == ViewKind::All {
        views.global = Some(engine::global_statistics(dataset));
    }

    if wants(ViewKind::Top) {
        let averages = engine::country_averages(dataset);
        let order = match args.sort {
            Some(SortChoice::LowHigh) => SortOrder::LowestFirst,
            Some(SortChoice::Alpha) => SortOrder::Alphabetical,
            _ => SortOrder::HighestFirst,
        };
        // A configured top of 0 keeps every country.
        let top = match config.filters.top {
            0 => None,
            n => Some(n),
        };
        views.top_countries = Some(engine::arrange(averages, order, top));
    }

    if wants(ViewKind::Regional) {
        views.regions = Some(engine::regional_rollup(dataset, regions));
    }

    if wants(ViewKind::Sector) {
        views.sectors = Some(engine::sector_rollup(
            dataset,
            sector_rules,
            config.filters.min_sector_records,
        ));
    }

    if wants(ViewKind::Authority) {
        views.authorities = Some(engine::authority_rollup(dataset));
    }

    if wants(ViewKind::Timeline) {
        let today = args
            .as_of
            .as_deref()
            .and_then(parse_date)
            .unwrap_or_else(|| Utc::now().date_naive());
        let from = config.filters.start_date.as_deref().and_then(parse_date);
        let to = config.filters.end_date.as_deref().and_then(parse_date);

        let events = engine::events_in_range(engine::timeline_events(dataset), from, to);
        let months = engine::month_buckets(&events, today);
        let delay = engine::implementation_delay(dataset);

        views.timeline = Some(TimelineView {
            events,
            months,
            delay,
        });
    }

    if wants(ViewKind::Comparison) {
        views.comparison = Some(engine::comparison_set(
            dataset,
            &config.filters.comparison_countries,
        ));
    }

    if wants(ViewKind::Table) {
        let mut rows = engine::table_rows(dataset);
        if let Some(ref term) = args.search {
            rows = engine::search_rows(rows, term);
        }
        match args.sort {
            Some(SortChoice::LowHigh) => engine::sort_rows(&mut rows, TableSort::RateAsc),
            Some(SortChoice::Alpha) => engine::sort_rows(&mut rows, TableSort::CountryAsc),
            Some(SortChoice::HighLow) => engine::sort_rows(&mut rows, TableSort::RateDesc),
            None => {}
        }
        views.table = Some(rows);
    }

    views
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .tariffscope.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
