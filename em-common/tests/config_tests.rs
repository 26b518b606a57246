//! Integration tests for config file resolution
//!
//! Priority order: command line > EM_API_CONFIG > platform file > compiled defaults.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate EM_API_CONFIG are marked with #[serial].

use em_common::config::{ApiConfig, ConfigResolver, ENV_CONFIG_PATH};
use em_common::Error;
use serial_test::serial;
use std::env;
use std::fs;

fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    let dir = tempfile::tempdir().unwrap();
    let cli = write_config(&dir, "cli.toml", "[server]\nport = 9001\n");
    let from_env = write_config(&dir, "env.toml", "[server]\nport = 9002\n");
    env::set_var(ENV_CONFIG_PATH, &from_env);

    let config = ConfigResolver::new(Some(cli)).resolve().unwrap();
    assert_eq!(config.server.port, 9001);

    env::remove_var(ENV_CONFIG_PATH);
}

#[test]
#[serial]
fn test_env_path_used_without_cli() {
    let dir = tempfile::tempdir().unwrap();
    let from_env = write_config(
        &dir,
        "env.toml",
        "[api]\ndefault_event_window_hours = 48\n[store]\ndatabase_path = \"/data/gdelt.db\"\n",
    );
    env::set_var(ENV_CONFIG_PATH, &from_env);

    let config = ConfigResolver::new(None).resolve().unwrap();
    assert_eq!(config.api.default_event_window_hours, 48);
    assert_eq!(config.store.database_path.to_string_lossy(), "/data/gdelt.db");

    env::remove_var(ENV_CONFIG_PATH);
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    env::remove_var(ENV_CONFIG_PATH);
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = ConfigResolver::new(Some(missing)).resolve().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_invalid_value_in_file_is_error() {
    env::remove_var(ENV_CONFIG_PATH);
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "bad.toml", "[api]\nmax_individual_events_per_request = 5\n");

    let err = ConfigResolver::new(Some(path)).resolve().unwrap_err();
    assert!(err.to_string().contains("max_individual_events_per_request"));
}

#[test]
fn test_load_from_file_full_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "full.toml",
        r#"
[server]
host = "0.0.0.0"
port = 8181

[store]
database_path = "events.db"

[api]
individual_events_zoom_threshold = 12
mention_search_days_range = 3
default_event_window_hours = 12
max_clusters_per_request = 200
max_individual_events_per_request = 100
default_geotile_precision = 6
max_geotile_precision = 20
"#,
    );

    let config = ApiConfig::load_from_file(&path).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8181);
    assert_eq!(config.api.individual_events_zoom_threshold, 12);
    assert_eq!(config.api.mention_search_days_range, 3);
    assert_eq!(config.api.max_individual_events_per_request, 100);
    assert_eq!(config.api.max_geotile_precision, 20);
}
