// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    ///
    /// The provider credential additionally falls back to the plain
    /// `OPENAI_API_KEY` environment variable when no prefixed value is set.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let file_path = config_path
            .map(|p| p.to_string())
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(&file_path).required(false))
            // Override with environment variables (prefix: COPYSTREAM_)
            .add_source(Environment::with_prefix("COPYSTREAM").separator("_"))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let mut config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        if !config.provider.has_api_key() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                config.provider.api_key = key;
            }
        }

        Ok(config)
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".copystream")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
