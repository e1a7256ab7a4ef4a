//! TOML file configuration structures.
//!
//! These structs directly map to the `messecall.toml` file format. Every
//! section is optional.

use serde::{Deserialize, Serialize};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Backend connection section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL of the MesseCall backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport timeout for every request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Dashboard section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Organization (parish) whose public events are shown initially.
    #[serde(default = "default_church_id")]
    pub church_id: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            church_id: default_church_id(),
        }
    }
}

fn default_church_id() -> String {
    "1".to_owned()
}
