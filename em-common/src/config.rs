//! Configuration loading and validation
//!
//! The service builds one immutable [`ApiConfig`] at startup and hands it to
//! each component explicitly.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const ENV_CONFIG_PATH: &str = "EM_API_CONFIG";

/// Complete service configuration (TOML file shape)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub api: ApiSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Document store location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("eventmosaic.db"),
        }
    }
}

/// Query limits and windows consumed by the event pipeline.
///
/// The zoom threshold, cluster cap and geotile precisions describe the
/// aggregation mode; they are validated and carried but not acted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Zoom level above which individual events are returned instead of clusters
    pub individual_events_zoom_threshold: u32,
    /// Days after the event date searched for mentions
    pub mention_search_days_range: u32,
    /// Event window length when since/until are not both given
    pub default_event_window_hours: u32,
    pub max_clusters_per_request: u32,
    pub max_individual_events_per_request: u32,
    pub default_geotile_precision: u32,
    pub max_geotile_precision: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            individual_events_zoom_threshold: 10,
            mention_search_days_range: 2,
            default_event_window_hours: 24,
            max_clusters_per_request: 1000,
            max_individual_events_per_request: 500,
            default_geotile_precision: 5,
            max_geotile_precision: 18,
        }
    }
}

impl ApiSettings {
    /// Reject values outside the supported ranges
    pub fn validate(&self) -> Result<()> {
        check_range("individual_events_zoom_threshold", self.individual_events_zoom_threshold, 1, 25)?;
        check_range("mention_search_days_range", self.mention_search_days_range, 0, 30)?;
        check_range("default_event_window_hours", self.default_event_window_hours, 1, 8760)?;
        check_range("max_clusters_per_request", self.max_clusters_per_request, 10, 10_000)?;
        check_range("max_individual_events_per_request", self.max_individual_events_per_request, 10, 10_000)?;
        check_range("default_geotile_precision", self.default_geotile_precision, 1, 15)?;
        check_range("max_geotile_precision", self.max_geotile_precision, 5, 29)?;
        Ok(())
    }
}

fn check_range(key: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(Error::Config(format!(
            "api.{} must be in range [{}, {}], got {}",
            key, min, max, value
        )));
    }
    Ok(())
}

impl ApiConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ApiConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.api.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Config source resolution, highest priority first:
/// 1. Command-line argument
/// 2. `EM_API_CONFIG` environment variable
/// 3. Platform config file (`~/.config/eventmosaic/config.toml`, `/etc/eventmosaic/config.toml`)
/// 4. Compiled defaults
///
/// A missing platform file is not an error. An explicitly named file must exist.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    pub fn resolve(&self) -> Result<ApiConfig> {
        if let Some(path) = &self.cli_path {
            info!("Loading config from command line: {}", path.display());
            return ApiConfig::load_from_file(path);
        }

        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(path);
            info!("Loading config from {}: {}", ENV_CONFIG_PATH, path.display());
            return ApiConfig::load_from_file(&path);
        }

        if let Some(path) = platform_config_file() {
            info!("Loading config from {}", path.display());
            return ApiConfig::load_from_file(&path);
        }

        debug!("No config file found, using compiled defaults");
        Ok(ApiConfig::default())
    }
}

/// First existing platform config file, if any
fn platform_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("eventmosaic").join("config.toml"));

    let mut candidates: Vec<PathBuf> = user_config.into_iter().collect();
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/eventmosaic/config.toml"));
    }

    candidates.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = ApiConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.mention_search_days_range, 2);
        assert_eq!(config.api.default_event_window_hours, 24);
        assert_eq!(config.api.max_individual_events_per_request, 500);
        assert!(config.api.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ApiConfig::from_toml_str(
            r#"
            [api]
            max_individual_events_per_request = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.api.max_individual_events_per_request, 50);
        assert_eq!(config.api.default_event_window_hours, 24);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        let err = ApiConfig::from_toml_str(
            r#"
            [api]
            mention_search_days_range = 31
            "#,
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("mention_search_days_range"), "{}", msg);
        assert!(msg.contains("[0, 30]"), "{}", msg);
    }

    #[test]
    fn test_zero_window_rejected() {
        let settings = ApiSettings {
            default_event_window_hours: 0,
            ..ApiSettings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_window_longer_than_a_year_rejected() {
        let settings = ApiSettings {
            default_event_window_hours: u32::MAX,
            ..ApiSettings::default()
        };
        let msg = settings.validate().unwrap_err().to_string();
        assert!(msg.contains("default_event_window_hours"), "{}", msg);
        assert!(msg.contains("[1, 8760]"), "{}", msg);

        let one_year = ApiSettings {
            default_event_window_hours: 8760,
            ..ApiSettings::default()
        };
        assert!(one_year.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ApiConfig::from_toml_str("[api\nport = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
