//! Configuration resolution and graceful degradation
//!
//! Tests that touch SHELF_* environment variables are marked #[serial] so
//! they do not race each other.

use serial_test::serial;
use shelf_common::config::{
    load_toml_config, resolve_root_folder, CliOverrides, CompiledDefaults, ServiceConfig,
    LoggingConfig, TomlConfig, ENV_BIND, ENV_DATABASE, ENV_LOG_LEVEL, ENV_PORT, ENV_ROOT_FOLDER,
    ENV_SIMILAR_LIMIT,
};
use shelf_common::Error;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_ROOT_FOLDER);
    env::remove_var(ENV_PORT);
    env::remove_var(ENV_SIMILAR_LIMIT);
    env::remove_var(ENV_BIND);
    env::remove_var(ENV_DATABASE);
    env::remove_var(ENV_LOG_LEVEL);
}

#[test]
#[serial]
fn test_defaults_when_nothing_configured() {
    clear_env();
    let defaults = CompiledDefaults::for_current_platform();
    let config =
        ServiceConfig::from_sources(&CliOverrides::default(), &TomlConfig::default(), &defaults)
            .unwrap();

    assert_eq!(config.root_folder, defaults.root_folder);
    assert_eq!(config.database_path, defaults.root_folder.join("shelf.db"));
    assert_eq!(config.port, 5740);
    assert_eq!(config.similar_limit, 10);
    assert_eq!(config.listen_addr(), "127.0.0.1:5740");
    assert_eq!(config.log_level, "info");
}

#[test]
#[serial]
fn test_priority_cli_over_env_over_toml() {
    clear_env();
    let defaults = CompiledDefaults::for_current_platform();
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/srv/toml-root")),
        port: Some(7000),
        ..TomlConfig::default()
    };

    // TOML beats defaults
    let config = ServiceConfig::from_sources(&CliOverrides::default(), &toml, &defaults).unwrap();
    assert_eq!(config.root_folder, PathBuf::from("/srv/toml-root"));
    assert_eq!(config.port, 7000);

    // environment beats TOML
    env::set_var(ENV_ROOT_FOLDER, "/srv/env-root");
    env::set_var(ENV_PORT, "7100");
    let config = ServiceConfig::from_sources(&CliOverrides::default(), &toml, &defaults).unwrap();
    assert_eq!(config.root_folder, PathBuf::from("/srv/env-root"));
    assert_eq!(config.port, 7100);

    // CLI beats environment
    let cli = CliOverrides {
        root_folder: Some(PathBuf::from("/srv/cli-root")),
        port: Some(7200),
        ..CliOverrides::default()
    };
    let config = ServiceConfig::from_sources(&cli, &toml, &defaults).unwrap();
    assert_eq!(config.root_folder, PathBuf::from("/srv/cli-root"));
    assert_eq!(config.port, 7200);

    clear_env();
}

#[test]
#[serial]
fn test_bind_database_log_level_priority() {
    clear_env();
    let defaults = CompiledDefaults::for_current_platform();
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/srv/root")),
        database: Some(PathBuf::from("toml.db")),
        bind: Some("10.0.0.1".to_string()),
        logging: LoggingConfig {
            level: Some("warn".to_string()),
        },
        ..TomlConfig::default()
    };

    let config = ServiceConfig::from_sources(&CliOverrides::default(), &toml, &defaults).unwrap();
    assert_eq!(config.database_path, PathBuf::from("/srv/root/toml.db"));
    assert_eq!(config.bind, "10.0.0.1");
    assert_eq!(config.log_level, "warn");

    env::set_var(ENV_DATABASE, "env.db");
    env::set_var(ENV_BIND, "0.0.0.0");
    env::set_var(ENV_LOG_LEVEL, "debug");
    let config = ServiceConfig::from_sources(&CliOverrides::default(), &toml, &defaults).unwrap();
    assert_eq!(config.database_path, PathBuf::from("/srv/root/env.db"));
    assert_eq!(config.bind, "0.0.0.0");
    assert_eq!(config.log_level, "debug");

    let cli = CliOverrides {
        database: Some(PathBuf::from("/data/cli.db")),
        bind: Some("::1".to_string()),
        log_level: Some("shelf_pa=trace".to_string()),
        ..CliOverrides::default()
    };
    let config = ServiceConfig::from_sources(&cli, &toml, &defaults).unwrap();
    assert_eq!(config.database_path, PathBuf::from("/data/cli.db"));
    assert_eq!(config.bind, "::1");
    assert_eq!(config.log_level, "shelf_pa=trace");

    clear_env();
}

#[test]
#[serial]
fn test_log_level_falls_back_to_compiled_default() {
    clear_env();
    let defaults = CompiledDefaults {
        log_level: "error",
        ..CompiledDefaults::for_current_platform()
    };

    // A TOML file without a [logging] section leaves the level unset
    let toml: TomlConfig = toml::from_str("port = 6001\n").unwrap();
    let config = ServiceConfig::from_sources(&CliOverrides::default(), &toml, &defaults).unwrap();
    assert_eq!(config.log_level, "error");

    // Blank environment values are ignored
    env::set_var(ENV_LOG_LEVEL, "  ");
    env::set_var(ENV_BIND, "");
    let config = ServiceConfig::from_sources(&CliOverrides::default(), &toml, &defaults).unwrap();
    assert_eq!(config.log_level, "error");
    assert_eq!(config.bind, "127.0.0.1");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_value_is_config_error() {
    clear_env();
    env::set_var(ENV_PORT, "not-a-port");
    let result = ServiceConfig::from_sources(
        &CliOverrides::default(),
        &TomlConfig::default(),
        &CompiledDefaults::for_current_platform(),
    );
    clear_env();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_zero_similar_limit_rejected() {
    clear_env();
    let cli = CliOverrides {
        similar_limit: Some(0),
        ..CliOverrides::default()
    };
    let result = ServiceConfig::from_sources(
        &cli,
        &TomlConfig::default(),
        &CompiledDefaults::for_current_platform(),
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_relative_database_joins_root_absolute_kept() {
    clear_env();
    let defaults = CompiledDefaults::for_current_platform();
    let cli = CliOverrides {
        root_folder: Some(PathBuf::from("/data/shelf")),
        database: Some(PathBuf::from("archive/personas.db")),
        ..CliOverrides::default()
    };
    let config = ServiceConfig::from_sources(&cli, &TomlConfig::default(), &defaults).unwrap();
    assert_eq!(
        config.database_path,
        PathBuf::from("/data/shelf/archive/personas.db")
    );

    let cli = CliOverrides {
        database: Some(PathBuf::from("/tmp/other.db")),
        ..cli
    };
    let config = ServiceConfig::from_sources(&cli, &TomlConfig::default(), &defaults).unwrap();
    assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
}

#[test]
#[serial]
fn test_resolve_root_folder_ignores_empty_env() {
    clear_env();
    env::set_var(ENV_ROOT_FOLDER, "");
    let defaults = CompiledDefaults::for_current_platform();
    let root = resolve_root_folder(None, ENV_ROOT_FOLDER, &TomlConfig::default(), &defaults);
    clear_env();
    assert_eq!(root, defaults.root_folder);
}

#[test]
#[serial]
fn test_explicit_config_file_loaded() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "root_folder = \"/opt/shelf\"\nsimilar_limit = 5\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let cli = CliOverrides {
        config_file: Some(path),
        ..CliOverrides::default()
    };
    let config = ServiceConfig::resolve(&cli).unwrap();
    assert_eq!(config.root_folder, PathBuf::from("/opt/shelf"));
    assert_eq!(config.similar_limit, 5);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_malformed_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = \"eighty\"\n").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = load_toml_config(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
