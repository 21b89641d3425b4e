//! Configuration loading.
//! Reads happiness.toml from the current directory or the path in the
//! HAPPINESS_CONFIG env var; command-line flags override it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::analysis::columns::RADAR_INDICATORS;
use crate::data::source::{DataSource, LocalPathsSource, RemoteSource};
use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "HAPPINESS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "happiness.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Remote dataset, tried first when set.
    pub url: Option<String>,
    #[serde(default = "default_local_paths")]
    pub local_paths: Vec<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_local_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("world_happiness_report.csv"),
        PathBuf::from("data/world_happiness_report.csv"),
    ]
}
fn default_timeout_secs() -> u64 { 30 }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            url: None,
            local_paths: default_local_paths(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_radar_indicators")]
    pub radar_indicators: Vec<String>,
    #[serde(default = "default_indicator")]
    pub default_indicator: String,
    #[serde(default = "default_scatter_x")]
    pub scatter_x: String,
}

fn default_radar_indicators() -> Vec<String> {
    RADAR_INDICATORS.iter().map(|s| s.to_string()).collect()
}
fn default_indicator() -> String { "Happiness_Score".to_string() }
fn default_scatter_x() -> String { "GDP_per_Capita".to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            radar_indicators: default_radar_indicators(),
            default_indicator: default_indicator(),
            scatter_x: default_scatter_x(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path, else `HAPPINESS_CONFIG`, else `happiness.toml` if it
    /// exists, else defaults. An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        log::debug!("no config file, using defaults");
        Ok(Self::default())
    }

    /// Fold command-line flags into the file configuration.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.data.url = Some(url.clone());
        }
        if cli.offline {
            self.data.url = None;
        }
        if !cli.data.is_empty() {
            let mut paths = cli.data.clone();
            paths.append(&mut self.data.local_paths);
            self.data.local_paths = paths;
        }
    }

    /// Startup chain: remote (if configured) then local candidates. The
    /// upload step is added interactively by the UI.
    pub fn startup_sources(&self) -> Vec<Box<dyn DataSource>> {
        let mut sources: Vec<Box<dyn DataSource>> = Vec::new();
        if let Some(url) = &self.data.url {
            sources.push(Box::new(RemoteSource::new(
                url.clone(),
                Duration::from_secs(self.data.timeout_secs),
            )));
        }
        if !self.data.local_paths.is_empty() {
            sources.push(Box::new(LocalPathsSource::new(self.data.local_paths.clone())));
        }
        sources
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "happiness-atlas")]
#[command(about = "World Happiness dashboards")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Remote dataset URL, tried before local files
    #[arg(long)]
    pub url: Option<String>,

    /// Local dataset path (repeatable), tried before configured paths
    #[arg(short, long)]
    pub data: Vec<PathBuf>,

    /// Skip the remote download
    #[arg(long)]
    pub offline: bool,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dashboard.radar_indicators.len(), 6);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[data]\nurl = \"https://data.example/whr.csv\"\n\n[dashboard]\ndefault_indicator = \"Life Ladder\""
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.data.url.as_deref(), Some("https://data.example/whr.csv"));
        assert_eq!(config.data.local_paths, default_local_paths());
        assert_eq!(config.data.timeout_secs, 30);
        assert_eq!(config.dashboard.default_indicator, "Life Ladder");
        assert_eq!(config.dashboard.scatter_x, "GDP_per_Capita");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nope/happiness.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data\nurl = 1").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn cli_overrides_and_source_order() {
        let mut config = Config::default();
        config.data.url = Some("https://data.example/whr.csv".into());

        let cli = Cli::parse_from(["happiness-atlas", "--data", "mine.csv"]);
        config.apply_cli(&cli);
        assert_eq!(config.data.local_paths[0], PathBuf::from("mine.csv"));
        assert_eq!(config.data.local_paths.len(), 3);

        let sources = config.startup_sources();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].describe().starts_with("remote"));
        assert!(sources[1].describe().starts_with("local"));

        config.apply_cli(&Cli::parse_from(["happiness-atlas", "--offline"]));
        assert_eq!(config.startup_sources().len(), 1);
    }
}
