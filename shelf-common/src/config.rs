//! Configuration loading and root folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error: a warning is logged and the
//! compiled defaults apply. A config file that exists but does not parse is
//! reported as `Error::Config`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "SHELF_ROOT_FOLDER";
/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "SHELF_PORT";
/// Environment variable overriding the default similar-persona limit
pub const ENV_SIMILAR_LIMIT: &str = "SHELF_SIMILAR_LIMIT";
/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "SHELF_BIND";
/// Environment variable overriding the database file
pub const ENV_DATABASE: &str = "SHELF_DATABASE";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "SHELF_LOG_LEVEL";

/// Logging section of the TOML config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "shelf_pa=debug"
    pub level: Option<String>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    /// Database file; relative paths are taken from the root folder
    pub database: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub similar_limit: Option<usize>,
    pub logging: LoggingConfig,
}

/// Compiled defaults used when nothing else supplies a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub database_file: &'static str,
    pub bind: &'static str,
    pub port: u16,
    pub similar_limit: usize,
    pub log_level: &'static str,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            database_file: "shelf.db",
            bind: "127.0.0.1",
            port: 5740,
            similar_limit: 10,
            log_level: "info",
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub similar_limit: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub bind: String,
    pub port: u16,
    /// Default number of similar personas returned when a request has no limit
    pub similar_limit: usize,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve configuration from CLI, environment, TOML file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml = match &cli.config_file {
            Some(path) => load_toml_config(path)?,
            None => match default_config_path() {
                Ok(path) => load_toml_config(&path)?,
                Err(e) => {
                    warn!("{}; using compiled defaults", e);
                    TomlConfig::default()
                }
            },
        };
        Self::from_sources(cli, &toml, &CompiledDefaults::for_current_platform())
    }

    /// Merge already-loaded sources; environment variables are read here
    pub fn from_sources(
        cli: &CliOverrides,
        toml: &TomlConfig,
        defaults: &CompiledDefaults,
    ) -> Result<Self> {
        let root_folder = resolve_root_folder(
            cli.root_folder.as_deref(),
            ENV_ROOT_FOLDER,
            toml,
            defaults,
        );

        let database = cli
            .database
            .clone()
            .or_else(|| env_string(ENV_DATABASE).map(PathBuf::from))
            .or_else(|| toml.database.clone())
            .unwrap_or_else(|| PathBuf::from(defaults.database_file));
        let database_path = if database.is_absolute() {
            database
        } else {
            root_folder.join(database)
        };

        let port = match cli.port {
            Some(port) => port,
            None => match env_parse::<u16>(ENV_PORT)? {
                Some(port) => port,
                None => toml.port.unwrap_or(defaults.port),
            },
        };

        let similar_limit = match cli.similar_limit {
            Some(limit) => limit,
            None => match env_parse::<usize>(ENV_SIMILAR_LIMIT)? {
                Some(limit) => limit,
                None => toml.similar_limit.unwrap_or(defaults.similar_limit),
            },
        };
        if similar_limit == 0 {
            return Err(Error::Config("similar_limit must be at least 1".to_string()));
        }

        let bind = cli
            .bind
            .clone()
            .or_else(|| env_string(ENV_BIND))
            .or_else(|| toml.bind.clone())
            .unwrap_or_else(|| defaults.bind.to_string());

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env_string(ENV_LOG_LEVEL))
            .or_else(|| toml.logging.level.clone())
            .unwrap_or_else(|| defaults.log_level.to_string());

        Ok(Self {
            root_folder,
            database_path,
            bind,
            port,
            similar_limit,
            log_level,
        })
    }

    /// `bind:port` socket address string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Root folder resolution, CLI > environment > TOML > compiled default
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml: &TomlConfig,
    defaults: &CompiledDefaults,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    defaults.root_folder.clone()
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    debug!("Loaded config file {}", path.display());
    Ok(config)
}

/// Locate the platform config file
///
/// Linux checks `~/.config/shelf/config.toml` then `/etc/shelf/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        let user_config = dirs::config_dir().map(|d| d.join("shelf").join("config.toml"));
        let system_config = PathBuf::from("/etc/shelf/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else if cfg!(target_os = "macos") || cfg!(target_os = "windows") {
        dirs::config_dir()
            .map(|d| d.join("shelf").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    } else {
        return Err(Error::Config("Unsupported platform".to_string()));
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {}",
            config_path.display()
        )))
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/shelf
        dirs::data_local_dir()
            .map(|d| d.join("shelf"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/shelf"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("shelf"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/shelf"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("shelf"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\shelf"))
    } else {
        PathBuf::from("./shelf_data")
    }
}

/// Non-empty, trimmed environment value
fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has invalid value {:?}", name, raw))),
        _ => Ok(None),
    }
}
