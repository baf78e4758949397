//! Command-line arguments

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::DashboardConfig;
use crate::constants::config::{CONFIG_FILE, DATA_DIR};
use crate::data::GeoSource;
use crate::error::Result;

/// Road safety statistics dashboard
#[derive(Debug, Parser)]
#[command(name = "roadwatch", version, about)]
pub struct Cli {
    /// Dashboard configuration (JSON). Falls back to ./roadwatch.json, then the built-in layout
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base directory for relative CSV paths
    #[arg(long, value_name = "DIR", default_value = DATA_DIR)]
    pub data_dir: PathBuf,

    /// Boundary file for map charts, a local path or an http(s) URL
    #[arg(long, value_name = "PATH|URL")]
    pub geo: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_filter(&self) -> EnvFilter {
        match self.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    }

    pub fn load_config(&self) -> Result<DashboardConfig> {
        if let Some(path) = &self.config {
            return DashboardConfig::load(path);
        }
        let local = Path::new(CONFIG_FILE);
        if local.is_file() {
            DashboardConfig::load(local)
        } else {
            tracing::debug!("using built-in configuration");
            DashboardConfig::builtin()
        }
    }

    pub fn geo_source(&self) -> Option<GeoSource> {
        self.geo.as_deref().map(GeoSource::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashError;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["roadwatch"]).unwrap();
        assert!(cli.config.is_none());
        assert_eq!(cli.data_dir, PathBuf::from(DATA_DIR));
        assert!(cli.geo_source().is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "roadwatch",
            "--data-dir",
            "/srv/stats",
            "--geo",
            "https://example.org/states.geojson",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/srv/stats"));
        assert!(matches!(cli.geo_source(), Some(GeoSource::Url(_))));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, include_str!("../assets/roadwatch.json")).unwrap();

        let cli = Cli::try_parse_from(["roadwatch", "--config", path.to_str().unwrap()]).unwrap();
        assert_eq!(cli.load_config().unwrap(), DashboardConfig::builtin().unwrap());
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["roadwatch", "--config", "/nonexistent/dash.json"]).unwrap();
        assert!(matches!(cli.load_config(), Err(DashError::FileIo(_))));
    }
}
