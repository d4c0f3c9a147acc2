//! Service configuration.
//!
//! Loaded from a TOML file, then overridden from the environment, then
//! validated as a whole. Every section has defaults, so an empty file is a
//! valid (if useless) configuration.

mod validation;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use catalog_auth::{CredentialError, InMemoryCredentialStore, DEFAULT_BYPASS_SUFFIX};
use catalog_observability::LogSettings;

pub use validation::{validate_config, ValidationError};

/// Used when neither `--config` nor `CONFIG_PATH` is given.
pub const DEFAULT_CONFIG_PATH: &str = "etc/config.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogSettings,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub env: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "catalog".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            env: "development".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind IP address.
    pub listen: String,
    /// TCP port, kept as text so a bad value is reported by validation
    /// rather than as a parse error.
    pub port: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0".to_string(),
            port: "50051".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.listen.trim().parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::new(
                "server.listen",
                "must be an IP address",
            )])
        })?;
        let port: u16 = self.port.trim().parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::new(
                "server.port",
                "must be a number between 0 and 65535",
            )])
        })?;
        Ok(SocketAddr::new(ip, port))
    }
}

/// Postgres connection settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_name: String,
    pub max_connections: u32,
    pub run_migrations: bool,
    /// Full connection URL; when set it replaces the individual fields.
    /// Normally injected from `DATABASE_URL`.
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            db_name: "catalog".to_string(),
            max_connections: 10,
            run_migrations: true,
            url: None,
        }
    }
}

impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("db_name", &self.db_name)
            .field("max_connections", &self.max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// One configured API user.
#[derive(Clone, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for UserEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserEntry")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Method-path suffix that skips authentication.
    pub bypass_suffix: String,
    pub users: Vec<UserEntry>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bypass_suffix: DEFAULT_BYPASS_SUFFIX.to_string(),
            users: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Hash the configured users into a credential store.
    ///
    /// The plaintext entries are drained from the config in the process.
    pub fn take_credential_store(&mut self) -> Result<InMemoryCredentialStore, CredentialError> {
        let users = std::mem::take(&mut self.users);
        InMemoryCredentialStore::with_users(
            users
                .iter()
                .map(|u| (u.username.as_str(), u.password.as_str())),
        )
    }
}

impl AppConfig {
    /// Parse TOML text without touching the environment or validating.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides read through `lookup` (normally `std::env::var`).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self).map_err(ConfigError::Validation)
    }
}

/// Pick the config file: explicit path, else `CONFIG_PATH`, else the default.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            std::env::var_os("CONFIG_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load, override from the process environment, and validate.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = AppConfig::from_toml_str(&content)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
