use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::DashError;

/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "launch_dash.json";

/// Dashboard settings. Every field has a default, so the file may list only
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    pub slider_min: f64,
    pub slider_max: f64,
    pub slider_step: f64,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("spacex_launch_dash.csv"),
            slider_min: 0.0,
            slider_max: 10_000.0,
            slider_step: 1000.0,
            window_width: 1200.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, DashError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_err = |source: anyhow::Error| DashError::Config {
            path: path.to_path_buf(),
            source,
        };
        let text = std::fs::read_to_string(path)
            .context("reading config file")
            .map_err(config_err)?;
        let config: Self = serde_json::from_str(&text)
            .context("parsing config JSON")
            .map_err(config_err)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
