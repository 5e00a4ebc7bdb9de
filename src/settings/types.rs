// Standard library
use std::path::PathBuf;
use std::sync::Arc;

// 3rd party crates
use serde::Deserialize;
use tokio::sync::RwLock;

// Project imports
use cloudstore::{RateGateConfig, StoreConfig};

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Demo {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub log: Log,
    pub store: StoreConfig,

    #[serde(default)]
    pub rate_gate: RateGateConfig,

    #[serde(default)]
    pub demo: Demo,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings that passed validation.
#[derive(Debug)]
pub struct ValidatedSettings(pub(crate) Settings);

/// Manages the application settings, allowing for loading and reloading configurations.
pub struct ConfigManager {
    pub settings: Arc<RwLock<Settings>>,
    pub config_path: PathBuf,
}
