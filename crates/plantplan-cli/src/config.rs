//! Configuration file management for plantplan.
//!
//! Provides a TOML config file at `~/.config/plantplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use plantplan_core::StoreBackend;
use plantplan_db::config::DbConfig;

/// Environment variable selecting the store backend.
pub const STORE_ENV_VAR: &str = "PLANTPLAN_STORE";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    pub store: StoreSection,
    pub server: ServerSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DbConfig::DEFAULT_URL.to_owned(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl ServerSection {
    pub const DEFAULT_BIND: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 3000;
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: Self::DEFAULT_BIND.to_owned(),
            port: Self::DEFAULT_PORT,
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the plantplan config directory.
///
/// XDG layout on every platform: `$XDG_CONFIG_HOME/plantplan` or
/// `~/.config/plantplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("plantplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("plantplan")
}

/// Return the path to the plantplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. `Ok(None)` when no file exists; a file
/// that cannot be read or parsed is an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    parse_config(&contents)
        .with_context(|| format!("invalid config file at {}", path.display()))
        .map(Some)
}

pub fn parse_config(contents: &str) -> Result<ConfigFile> {
    toml::from_str(contents).context("failed to parse config file")
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix (the URL may carry a password).
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct PlantplanConfig {
    pub db_config: DbConfig,
    pub backend: StoreBackend,
    pub server: ServerSection,
}

impl PlantplanConfig {
    /// Resolve configuration from the CLI flag, the environment and the
    /// config file at [`config_path`] (if present).
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        Self::from_sources(cli_db_url, load_config()?)
    }

    /// - DB URL: `cli_db_url` > `PLANTPLAN_DATABASE_URL` > `database.url` > default
    /// - Backend: `PLANTPLAN_STORE` > `store.backend` > `memory`
    /// - Server: `server.*` > `127.0.0.1:3000` (CLI flags are applied by `serve`)
    pub fn from_sources(cli_db_url: Option<&str>, file: Option<ConfigFile>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let db_url = if let Some(url) = cli_db_url {
            url.to_owned()
        } else if let Ok(url) = std::env::var(DbConfig::ENV_VAR) {
            url
        } else {
            file.database.url
        };

        let backend = match std::env::var(STORE_ENV_VAR) {
            Ok(value) => value
                .parse()
                .with_context(|| format!("{STORE_ENV_VAR} env var is invalid"))?,
            Err(_) => file.store.backend,
        };

        Ok(Self {
            db_config: DbConfig::new(db_url),
            backend,
            server: file.server,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
