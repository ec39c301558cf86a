use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::DEFAULT_TRANSACTION_BUDGET_BYTES;
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Hard byte budget of one atomic transaction at the storage boundary.
    pub transaction_budget_bytes: usize,
    /// Optional cap on the number of operations applied in one transaction.
    pub max_operations_per_transaction: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            transaction_budget_bytes: DEFAULT_TRANSACTION_BUDGET_BYTES,
            max_operations_per_transaction: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodecConfig {
    /// IANA zone used for floating times. Falls back to the host zone when unset.
    pub default_timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `config.toml` values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails,
    /// or if the loaded values are invalid.
    pub fn load() -> Result<Self> {
        #[expect(
            clippy::cast_possible_wrap,
            reason = "Default budget is a small constant"
        )]
        let default_budget = DEFAULT_TRANSACTION_BUDGET_BYTES as i64;

        let settings = Config::builder()
            .set_default("storage.transaction_budget_bytes", default_budget)?
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env file
            .add_source(
                config::Environment::with_prefix("KUNAI")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values the deserializer cannot reject on its own.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if the transaction budget or
    /// the operation cap is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.storage.transaction_budget_bytes == 0 {
            return Err(CoreError::InvalidConfiguration(
                "storage.transaction_budget_bytes must be greater than zero".to_string(),
            ));
        }
        if self.storage.max_operations_per_transaction == Some(0) {
            return Err(CoreError::InvalidConfiguration(
                "storage.max_operations_per_transaction must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(
        budget = settings.storage.transaction_budget_bytes,
        "Configuration loaded"
    );
    Ok(settings)
}
