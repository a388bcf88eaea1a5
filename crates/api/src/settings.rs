//! Service Settings

use config::{Config, ConfigError, Environment, File};
use inference_engine::DEFAULT_PIPELINE_PATH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime settings, layered: defaults < config file < environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address for the HTTP server
    pub bind_addr: String,
    /// Pipeline artifact loaded at startup
    pub pipeline_path: PathBuf,
    /// Maximum tracing level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            pipeline_path: PathBuf::from(DEFAULT_PIPELINE_PATH),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Optional settings file, any format the config crate recognizes
    pub const FILE: &'static str = "config/estimator";
    /// Environment prefix, e.g. `ESTIMATOR__PIPELINE_PATH`
    pub const ENV_PREFIX: &'static str = "ESTIMATOR";

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::FILE)
    }

    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix(Self::ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}
