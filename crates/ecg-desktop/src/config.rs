//! Dashboard configuration loaded from JSON

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ecg_core::{VisibleLeadSet, DEFAULT_SAMPLE_RATE};
use ecg_render::ChartConfig;
use ecg_synthesis::DemoRecordingConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "ECG_DASHBOARD_CONFIG";

/// Size and sample count of the Normal-vs-MI comparison cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceCardConfig {
    pub width: f32,
    pub height: f32,
    /// Baseline offset below the vertical centre, in pixels
    pub vertical_offset: f32,
    /// Samples per synthesized cycle
    pub length: usize,
}

impl Default for TraceCardConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            vertical_offset: 41.0,
            length: 1000,
        }
    }
}

/// Complete dashboard configuration; every field has a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sample rate assumed for payloads that omit one, in Hz
    pub sample_rate: f32,
    /// Leads shown when the dashboard opens
    pub initial_leads: VisibleLeadSet,
    pub comparison: TraceCardConfig,
    pub charts: ChartConfig,
    /// Recording shown until a prediction is opened
    pub demo: DemoRecordingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            initial_leads: VisibleLeadSet::all(),
            comparison: TraceCardConfig::default(),
            charts: ChartConfig::default(),
            demo: DemoRecordingConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: DashboardConfig =
            serde_json::from_str(text).context("Invalid dashboard configuration")?;
        if config.comparison.length == 0 {
            anyhow::bail!("comparison.length must be positive");
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Configuration path from the first CLI argument, else the environment
    pub fn resolve_path(arg: Option<String>, env: Option<OsString>) -> Option<PathBuf> {
        arg.filter(|a| !a.is_empty())
            .map(PathBuf::from)
            .or_else(|| env.filter(|e| !e.is_empty()).map(PathBuf::from))
    }

    /// Load `path`, falling back to defaults when absent or broken
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded dashboard configuration");
                config
            }
            Err(e) => {
                warn!("{:#}; using default configuration", e);
                Self::default()
            }
        }
    }
}
