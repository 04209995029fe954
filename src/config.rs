//! Process configuration, read once at startup.
//!
//! Both binaries layer built-in defaults under raw environment variables
//! (`DB_HOST`, `MYSQL_DATABASE`, ...). The resulting structs are immutable and
//! handed to the components that need them; nothing reads the environment
//! after startup.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;

use crate::error::HubError;

/// Loopback host the importer always connects to; it runs beside the server.
pub const IMPORTER_DB_HOST: &str = "127.0.0.1";

/// Account used by the importer. Schema creation and `LOAD DATA INFILE` need it.
pub const IMPORTER_DB_USER: &str = "root";

pub const DEFAULT_CSV_PATH: &str = "/var/lib/mysql-files/titanic passengers.csv";

/// Numeric and boolean keys; figment parses these from their env text.
const API_TYPED_KEYS: &[&str] = &[
    "DB_PORT",
    "DB_POOL_MAX_CONNECTIONS",
    "DB_ACQUIRE_TIMEOUT_SECS",
    "EXPOSE_ERROR_DETAIL",
];

/// Text keys, taken verbatim so `DB_PASSWORD=007` stays `"007"`.
const API_TEXT_KEYS: &[(&str, &str)] = &[
    ("DB_HOST", "db_host"),
    ("DB_NAME", "db_name"),
    ("DB_USER", "db_user"),
    ("DB_PASSWORD", "db_password"),
    ("LISTEN_ADDR", "listen_addr"),
    ("LOGLEVEL", "loglevel"),
];

const IMPORTER_TYPED_KEYS: &[&str] = &["MYSQL_PORT"];

const IMPORTER_TEXT_KEYS: &[(&str, &str)] = &[
    ("MYSQL_DATABASE", "mysql_database"),
    ("MYSQL_USER", "mysql_user"),
    ("MYSQL_PASSWORD", "mysql_password"),
    ("MYSQL_ROOT_PASSWORD", "mysql_root_password"),
    ("CSV_PATH", "csv_path"),
    ("LOGLEVEL", "loglevel"),
];

/// Layer the process environment over `figment`.
fn merge_env(figment: Figment, typed: &[&str], text: &[(&str, &str)]) -> Figment {
    let figment = figment.merge(Env::raw().only(typed));
    text.iter()
        .fold(figment, |figment, &(var, field)| match std::env::var(var) {
            Ok(value) => figment.merge(Serialized::default(field, value)),
            Err(_) => figment,
        })
}

/// Settings for the HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    /// Socket address the HTTP listener binds to.
    pub listen_addr: String,
    /// Upper bound on pooled MySQL connections.
    pub db_pool_max_connections: u32,
    /// How long a request waits for a pooled connection before failing.
    pub db_acquire_timeout_secs: u64,
    /// Include the driver's error text in `/data` failure bodies.
    pub expose_error_detail: bool,
    pub loglevel: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            db_host: "127.0.0.1".to_string(),
            db_port: 3306,
            db_name: "titanic".to_string(),
            db_user: "root".to_string(),
            db_password: String::new(),
            listen_addr: "0.0.0.0:5000".to_string(),
            db_pool_max_connections: 5,
            db_acquire_timeout_secs: 5,
            expose_error_detail: true,
            loglevel: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Defaults overlaid with the process environment.
    pub fn load() -> Result<Self, HubError> {
        Self::from_figment(merge_env(
            Figment::from(Serialized::defaults(Self::default())),
            API_TYPED_KEYS,
            API_TEXT_KEYS,
        ))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, HubError> {
        let cfg: Self = figment.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }

    fn validate(&self) -> Result<(), HubError> {
        if self.db_name.trim().is_empty() {
            return Err(HubError::InvalidConfig("DB_NAME must not be empty".into()));
        }
        if self.db_pool_max_connections == 0 {
            return Err(HubError::InvalidConfig(
                "DB_POOL_MAX_CONNECTIONS must be greater than 0".into(),
            ));
        }
        if self.db_acquire_timeout_secs == 0 {
            return Err(HubError::InvalidConfig(
                "DB_ACQUIRE_TIMEOUT_SECS must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for the one-shot importer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImporterConfig {
    pub mysql_database: String,
    /// Application account; provisioned by the server image, informational here.
    #[serde(default)]
    pub mysql_user: Option<String>,
    #[serde(default)]
    pub mysql_password: Option<String>,
    pub mysql_root_password: String,
    pub mysql_port: u16,
    /// Path to the CSV as seen by the MySQL server, not by this process.
    pub csv_path: String,
    pub loglevel: String,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            mysql_database: "titanic".to_string(),
            mysql_user: None,
            mysql_password: None,
            mysql_root_password: String::new(),
            mysql_port: 3306,
            csv_path: DEFAULT_CSV_PATH.to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl ImporterConfig {
    pub fn load() -> Result<Self, HubError> {
        Self::from_figment(merge_env(
            Figment::from(Serialized::defaults(Self::default())),
            IMPORTER_TYPED_KEYS,
            IMPORTER_TEXT_KEYS,
        ))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, HubError> {
        let cfg: Self = figment.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Root connection to the local server.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(IMPORTER_DB_HOST)
            .port(self.mysql_port)
            .username(IMPORTER_DB_USER)
            .password(&self.mysql_root_password)
            .database(&self.mysql_database)
    }

    fn validate(&self) -> Result<(), HubError> {
        if self.mysql_database.trim().is_empty() {
            return Err(HubError::InvalidConfig(
                "MYSQL_DATABASE must not be empty".into(),
            ));
        }
        if self.csv_path.trim().is_empty() {
            return Err(HubError::InvalidConfig("CSV_PATH must not be empty".into()));
        }
        Ok(())
    }
}

/// Render a secret for log output without revealing it.
pub fn mask(secret: &str) -> &'static str {
    if secret.is_empty() { "<empty>" } else { "***" }
}
