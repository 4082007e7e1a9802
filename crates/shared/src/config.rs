//! Layered configuration: `config/default`, then `config/{RUN_MODE}`, then
//! `AVSTOCK__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Everything the server reads at start-up.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listen address.
    #[serde(default)]
    pub server: ServerConfig,
    /// PostgreSQL connection.
    pub database: DatabaseConfig,
    /// Token verification.
    pub jwt: JwtSettings,
    /// Checkout and return tuning.
    #[serde(default)]
    pub inventory: InventoryConfig,
}

/// Listen address.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// PostgreSQL connection and pool bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` URL.
    pub url: String,
    /// Pool upper bound.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open when idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Token settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Shared HMAC secret.
    pub secret: String,
    /// Lifetime of tokens minted by the seeder, in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600
}

/// Settings for the checkout/return reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Days between a debt's creation and its due date.
    pub debt_due_days: u32,
    /// Attempts per checkout/return before a conflict is surfaced.
    pub max_attempts: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            debt_due_days: 7,
            max_attempts: 3,
        }
    }
}

impl AppConfig {
    /// Reads and checks the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed, a required key is
    /// missing, or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config: Self = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("AVSTOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.inventory.debt_due_days == 0 {
            return Err(ConfigError::Message(
                "inventory.debt_due_days must be at least 1".into(),
            ));
        }
        if self.inventory.max_attempts == 0 {
            return Err(ConfigError::Message(
                "inventory.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
