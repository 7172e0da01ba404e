//! Application configuration management.

use std::str::FromStr;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Cash register configuration.
    #[serde(default)]
    pub register: RegisterConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Cash register configuration.
///
/// The business day does not end at local midnight: activity before
/// `cutoff_hour` belongs to the previous calendar date.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterConfig {
    /// Local hour (0-23) at which a new business day starts.
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
    /// IANA timezone of the shop.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Absolute cash difference still considered balanced.
    #[serde(default = "default_cash_difference_tolerance")]
    pub cash_difference_tolerance: Decimal,
}

fn default_cutoff_hour() -> u32 {
    4
}

fn default_timezone() -> String {
    "America/Argentina/Buenos_Aires".to_string()
}

fn default_cash_difference_tolerance() -> Decimal {
    Decimal::new(1000, 2)
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            cutoff_hour: default_cutoff_hour(),
            timezone: default_timezone(),
            cash_difference_tolerance: default_cash_difference_tolerance(),
        }
    }
}

/// Invalid register configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterConfigError {
    /// Cutoff hour outside 0..=23.
    #[error("cutoff_hour must be between 0 and 23, got {0}")]
    InvalidCutoffHour(u32),

    /// Timezone name not found in the tz database.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Tolerance below zero.
    #[error("cash_difference_tolerance cannot be negative")]
    NegativeTolerance,
}

impl RegisterConfig {
    /// Validates the register settings.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), RegisterConfigError> {
        if self.cutoff_hour > 23 {
            return Err(RegisterConfigError::InvalidCutoffHour(self.cutoff_hour));
        }
        self.tz()?;
        if self.cash_difference_tolerance < Decimal::ZERO {
            return Err(RegisterConfigError::NegativeTolerance);
        }
        Ok(())
    }

    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone name is unknown.
    pub fn tz(&self) -> Result<Tz, RegisterConfigError> {
        Tz::from_str(&self.timezone)
            .map_err(|_| RegisterConfigError::UnknownTimezone(self.timezone.clone()))
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MOSTRADOR").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.register
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(app)
    }
}
