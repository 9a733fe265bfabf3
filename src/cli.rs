//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::engine::RegionMap;
use crate::models::parse_date;
use clap::Parser;
use std::path::PathBuf;

/// Bundled sample dataset; also the CLI default for --data.
pub const DEFAULT_DATA_SOURCE: &str = "data/tariff_data.json";

/// TariffScope - tariff data aggregation and reporting
///
/// Load a tariff dataset (local file or URL), aggregate it by country,
/// region, sector, legal authority, and time, and render the views as
/// JSON or Markdown.
///
/// Examples:
///   tariffscope --data data/tariff_data.json
///   tariffscope --view top --top 10 --sort high-low
///   tariffscope --view regional --region asia --format markdown
///   tariffscope --view comparison --countries "China,Canada,Mexico"
///   tariffscope --view timeline --from 2025-01-01 --to 2025-06-30
///   tariffscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset to load: a JSON file path or an http(s) URL
    ///
    /// The document must be an object mapping country names to arrays of
    /// tariff records.
    #[arg(
        short,
        long,
        default_value = DEFAULT_DATA_SOURCE,
        env = "TARIFFSCOPE_DATA",
        value_name = "PATH|URL"
    )]
    pub data: String,

    /// Which view to compute
    #[arg(long, default_value = "all", value_name = "VIEW")]
    pub view: ViewKind,

    /// Region filter applied before aggregation
    ///
    /// Values: all, asia, europe, africa, north-america, south-america,
    /// oceania, middle-east
    #[arg(short, long, default_value = "all", value_name = "REGION")]
    pub region: String,

    /// Keep only the top N countries in the country view
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Sort order for the country view
    #[arg(long, value_name = "ORDER")]
    pub sort: Option<SortChoice>,

    /// Countries for the comparison view (comma-separated)
    ///
    /// Example: --countries "China,European Union,Canada"
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Start of the timeline window (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// End of the timeline window (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Treat this date as "today" for monthly bucketing (YYYY-MM-DD)
    ///
    /// Defaults to the current date. Useful for reproducible reports.
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,

    /// Minimum record count for a sector to appear in the sector view
    #[arg(long, value_name = "COUNT")]
    pub min_sector_records: Option<usize>,

    /// Search term for the table view (matches country and target)
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Output file path, or "-" for stdout
    #[arg(short, long, default_value = "-", value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (json, markdown)
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .tariffscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .tariffscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Which aggregation to compute and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewKind {
    /// Every view at once (default)
    #[default]
    All,
    /// Per-country averages
    Top,
    /// Regional rollup
    Regional,
    /// Sector classification rollup
    Sector,
    /// Event timeline with monthly buckets
    Timeline,
    /// Legal authority rollup
    Authority,
    /// Side-by-side country comparison
    Comparison,
    /// Flat record table
    Table,
}

/// Sort order for the country view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortChoice {
    /// Highest average rate first
    HighLow,
    /// Lowest average rate first
    LowHigh,
    /// Alphabetical by country name
    Alpha,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// Markdown format
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.data.trim().is_empty() {
            return Err("Data source must not be empty".to_string());
        }

        // Validate region key against the built-in region table
        let regions = RegionMap::builtin();
        let key = self.region.trim();
        if !key.eq_ignore_ascii_case("all") && regions.get(key).is_none() {
            return Err(format!(
                "Unknown region '{}'. Valid regions: {}",
                self.region,
                regions.filter_keys().join(", ")
            ));
        }

        // Validate date arguments
        let check_date = |name: &str, value: &Option<String>| match value {
            Some(raw) => match parse_date(raw) {
                Some(date) => Ok(Some(date)),
                None => Err(format!("{} must be a YYYY-MM-DD date, got '{}'", name, raw)),
            },
            None => Ok(None),
        };
        let from = check_date("--from", &self.from)?;
        let to = check_date("--to", &self.to)?;
        check_date("--as-of", &self.as_of)?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err("--from must not be after --to".to_string());
            }
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
