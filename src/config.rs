use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LatencyError, Result};
use crate::metrics::{CapacityMode, OutputFormat, PercentileMethod, Reporter, DEFAULT_RANKS};

/// Largest accepted `target_sample_count`. A bounded series allocates
/// the whole run up front (16 bytes per sample).
pub const MAX_TARGET_SAMPLES: usize = 10_000_000;

// ─── Sampler ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of intervals collected before the report is produced
    #[serde(default = "default_target")]
    pub target_sample_count: usize,

    /// Percentile ranks to report, each in (0, 100]
    #[serde(default = "default_ranks")]
    pub percentile_ranks: Vec<f64>,

    #[serde(default)]
    pub capacity_mode: CapacityMode,

    #[serde(default)]
    pub percentile_method: PercentileMethod,
}

fn default_target() -> usize {
    100_000
}
fn default_ranks() -> Vec<f64> {
    DEFAULT_RANKS.to_vec()
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            target_sample_count: default_target(),
            percentile_ranks: default_ranks(),
            capacity_mode: CapacityMode::default(),
            percentile_method: PercentileMethod::default(),
        }
    }
}

// ─── Driver ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Fixed-rate ticks; late wake-ups are caught up in a burst.
    #[default]
    Cyclic,
    /// Fixed sleep between samples.
    Delay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default)]
    pub kind: DriverKind,

    /// Tick period (cyclic) or sleep length (delay), in milliseconds
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

fn default_period_ms() -> u64 {
    4
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            kind: DriverKind::default(),
            period_ms: default_period_ms(),
        }
    }
}

impl DriverConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

// ─── Output ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ─── Top level ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LatencyError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| LatencyError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let sampler = &self.sampler;
        if sampler.target_sample_count < 2 {
            return Err(LatencyError::InvalidConfig(
                "target_sample_count must be at least 2".into(),
            ));
        }
        if sampler.target_sample_count > MAX_TARGET_SAMPLES {
            return Err(LatencyError::InvalidConfig(format!(
                "target_sample_count must be at most {MAX_TARGET_SAMPLES}"
            )));
        }
        if sampler.percentile_ranks.is_empty() {
            return Err(LatencyError::InvalidConfig(
                "percentile_ranks must not be empty".into(),
            ));
        }
        if let Some(bad) = sampler
            .percentile_ranks
            .iter()
            .find(|r| !r.is_finite() || **r <= 0.0 || **r > 100.0)
        {
            return Err(LatencyError::InvalidConfig(format!(
                "percentile rank {bad} must be in (0, 100]"
            )));
        }
        if self.driver.period_ms == 0 {
            return Err(LatencyError::InvalidConfig(
                "period_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn reporter(&self) -> Reporter {
        Reporter::new(
            self.sampler.percentile_ranks.clone(),
            self.sampler.percentile_method,
            self.output.format,
        )
    }
}
