//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.tariffscope.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Filter and view settings.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Sector classification settings.
    #[serde(default)]
    pub sectors: SectorConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output path; "-" writes to stdout.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "-".to_string()
}

/// Dataset location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset to load: a JSON file path or an http(s) URL.
    #[serde(default = "default_source")]
    pub source: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

fn default_source() -> String {
    crate::cli::DEFAULT_DATA_SOURCE.to_string()
}

/// Filter and view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Region filter applied before aggregation.
    #[serde(default = "default_region")]
    pub region: String,

    /// Country view cutoff; 0 keeps every country.
    #[serde(default = "default_top")]
    pub top: usize,

    /// Countries preselected for the comparison view.
    #[serde(default = "default_comparison_countries")]
    pub comparison_countries: Vec<String>,

    /// Minimum record count for a sector to appear.
    #[serde(default = "default_min_sector_records")]
    pub min_sector_records: usize,

    /// Timeline window start (YYYY-MM-DD).
    #[serde(default)]
    pub start_date: Option<String>,

    /// Timeline window end (YYYY-MM-DD).
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            top: default_top(),
            comparison_countries: default_comparison_countries(),
            min_sector_records: default_min_sector_records(),
            start_date: None,
            end_date: None,
        }
    }
}

fn default_region() -> String {
    "all".to_string()
}

fn default_top() -> usize {
    10
}

fn default_comparison_countries() -> Vec<String> {
    vec!["China", "European Union", "Canada", "Mexico"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_min_sector_records() -> usize {
    1
}

/// Sector classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorConfig {
    /// Label for targets no rule matches.
    #[serde(default = "default_sector_label")]
    pub default_label: String,

    /// Custom classification rules; empty uses the built-in rule set.
    /// Rules are tried in order and the first match wins.
    #[serde(default)]
    pub rules: Vec<SectorRuleEntry>,
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            default_label: default_sector_label(),
            rules: Vec::new(),
        }
    }
}

fn default_sector_label() -> String {
    "General".to_string()
}

/// One pattern-to-label classification rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorRuleEntry {
    /// Case-insensitive regular expression matched against the target.
    pub pattern: String,

    /// Sector label assigned on match.
    pub label: String,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".tariffscope.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Data source - the CLI default is the bundled sample, so only a
        // non-default value overrides the config file
        if args.data != crate::cli::DEFAULT_DATA_SOURCE {
            self.data.source = args.data.clone();
        }

        // Output - the CLI default is stdout ("-")
        if args.output.as_os_str() != "-" {
            self.general.output = args.output.display().to_string();
        }

        // Optional settings - only override if provided
        if let Some(top) = args.top {
            self.filters.top = top;
        }
        if let Some(ref countries) = args.countries {
            self.filters.comparison_countries = countries.clone();
        }
        if let Some(min) = args.min_sector_records {
            self.filters.min_sector_records = min;
        }
        if args.from.is_some() {
            self.filters.start_date = args.from.clone();
        }
        if args.to.is_some() {
            self.filters.end_date = args.to.clone();
        }

        // Region - the CLI default is "all", so only a non-default value
        // overrides the config file
        if !args.region.trim().eq_ignore_ascii_case("all") {
            self.filters.region = args.region.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.source, "data/tariff_data.json");
        assert_eq!(config.filters.region, "all");
        assert_eq!(config.filters.top, 10);
        assert!(config
            .filters
            .comparison_countries
            .contains(&"China".to_string()));
        assert!(config.sectors.rules.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "report.md"
verbose = true

[data]
source = "https://example.com/tariffs.json"

[filters]
region = "asia"
top = 5
comparison_countries = ["China", "Japan"]

[[sectors.rules]]
pattern = "solar|panel"
label = "Renewables"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "report.md");
        assert!(config.general.verbose);
        assert_eq!(config.data.source, "https://example.com/tariffs.json");
        assert_eq!(config.filters.region, "asia");
        assert_eq!(config.filters.top, 5);
        assert_eq!(config.filters.comparison_countries, vec!["China", "Japan"]);
        assert_eq!(config.sectors.rules.len(), 1);
        assert_eq!(config.sectors.rules[0].label, "Renewables");
    }

    #[test]
    fn test_merge_with_args_overrides() {
        let mut config = Config::default();
        let mut args = crate::cli::Args {
            data: "data/tariff_data.json".to_string(),
            view: crate::cli::ViewKind::All,
            region: "europe".to_string(),
            top: Some(3),
            sort: None,
            countries: Some(vec!["Brazil".to_string()]),
            from: Some("2025-01-01".to_string()),
            to: None,
            as_of: None,
            min_sector_records: None,
            search: None,
            output: std::path::PathBuf::from("-"),
            format: crate::cli::OutputFormat::Json,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        };

        config.merge_with_args(&args);
        assert_eq!(config.filters.region, "europe");
        assert_eq!(config.filters.top, 3);
        assert_eq!(config.filters.comparison_countries, vec!["Brazil"]);
        assert_eq!(config.filters.start_date.as_deref(), Some("2025-01-01"));
        // Defaults for data and output leave the config values alone.
        assert_eq!(config.data.source, crate::cli::DEFAULT_DATA_SOURCE);
        assert_eq!(config.general.output, "-");

        args.data = "other.json".to_string();
        args.output = std::path::PathBuf::from("report.md");
        config.merge_with_args(&args);
        assert_eq!(config.data.source, "other.json");
        assert_eq!(config.general.output, "report.md");

        // A default "all" region leaves the config value alone.
        config.filters.region = "asia".to_string();
        args.region = "all".to_string();
        config.merge_with_args(&args);
        assert_eq!(config.filters.region, "asia");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[filters]"));
    }
}
