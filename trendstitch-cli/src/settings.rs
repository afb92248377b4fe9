use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use trendstitch::StitchConfig;
use trendstitch_http::HttpConfig;

/// Contents of the optional `--config` JSON file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Vendor connection settings; required for HTTP vendors unless `--base-url` is given.
    pub http: Option<HttpConfig>,
    /// Orchestrator settings.
    pub stitch: StitchConfig,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }
}
