//! Configuration module for messecall-dashboard.
//!
//! Handles loading configuration from a TOML file and applying CLI and
//! environment overrides on top of it.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::RuntimeConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid api base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub church_id: Option<String>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, falling back to defaults if it does not exist
    /// 2. Apply overrides
    /// 3. Validate and build the runtime configuration
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(api_base) = &self.overrides.api_base {
            file_config.api.base_url = api_base.clone();
        }
        if let Some(church_id) = &self.overrides.church_id {
            file_config.dashboard.church_id = church_id.clone();
        }

        build_runtime_config(file_config)
    }
}

fn build_runtime_config(file_config: FileConfig) -> Result<RuntimeConfig, ConfigError> {
    let api_base = Url::parse(file_config.api.base_url.trim())?;
    if !matches!(api_base.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "api base url must use http or https, got {}",
            api_base.scheme()
        )));
    }
    if file_config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api timeout_secs must be greater than zero".to_owned(),
        ));
    }

    Ok(RuntimeConfig {
        api_base,
        timeout: Duration::from_secs(file_config.api.timeout_secs),
        church_id: file_config.dashboard.church_id,
    })
}
