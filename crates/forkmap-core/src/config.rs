use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable thresholds for conflict detection, risk scoring, and
/// recommendations.
///
/// Loaded from `.forkmap/config.toml`; every field has a default so a
/// partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub conflicts: ConflictConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictConfig {
    /// A target bucket whose summed complexity weight exceeds this value is
    /// reported as overloaded.
    #[serde(default = "default_overload_threshold")]
    pub overload_threshold: u32,
    /// Headliners allowed per bucket per layer.
    #[serde(default = "default_headliner_cap")]
    pub headliner_cap: usize,
    /// The one bucket/layer pair allowed extra headliners.
    #[serde(default)]
    pub overflow: Option<OverflowRule>,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            overload_threshold: default_overload_threshold(),
            headliner_cap: default_headliner_cap(),
            overflow: None,
        }
    }
}

impl ConflictConfig {
    /// Headliner cap for `layer` in `bucket`.
    #[must_use]
    pub fn headliner_cap_for(&self, bucket: &str, layer: &str) -> usize {
        match &self.overflow {
            Some(rule) if rule.bucket == bucket && rule.layer == layer => rule.cap,
            _ => self.headliner_cap,
        }
    }

    #[must_use]
    pub fn is_overflow_bucket(&self, bucket: &str) -> bool {
        self.overflow.as_ref().is_some_and(|rule| rule.bucket == bucket)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowRule {
    pub bucket: String,
    pub layer: String,
    #[serde(default = "default_overflow_cap")]
    pub cap: usize,
}

impl OverflowRule {
    #[must_use]
    pub fn new(bucket: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            layer: layer.into(),
            cap: default_overflow_cap(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Items beyond this count add crowding risk.
    #[serde(default = "default_crowding_baseline")]
    pub crowding_baseline: usize,
    /// Headliners beyond this count add risk (waived for the overflow bucket).
    #[serde(default = "default_headliner_allowance")]
    pub headliner_allowance: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            crowding_baseline: default_crowding_baseline(),
            headliner_allowance: default_headliner_allowance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendConfig {
    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: u32,
    #[serde(default = "default_crowded_bucket_threshold")]
    pub crowded_bucket_threshold: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: default_high_risk_threshold(),
            crowded_bucket_threshold: default_crowded_bucket_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Items highlighted when the critical-path toggle is on.
    #[serde(default = "default_top_critical")]
    pub top_critical: usize,
    /// Items listed in the analytics report's top section.
    #[serde(default = "default_report_top")]
    pub report_top: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_critical: default_top_critical(),
            report_top: default_report_top(),
        }
    }
}

impl EngineConfig {
    /// Parse a config document.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str::<Self>(text).context("Failed to parse engine config")
    }
}

/// Load `.forkmap/config.toml` under `project_root`, or defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_engine_config(project_root: &Path) -> Result<EngineConfig> {
    let path = project_root.join(".forkmap/config.toml");
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EngineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_overload_threshold() -> u32 {
    15
}

const fn default_headliner_cap() -> usize {
    1
}

const fn default_overflow_cap() -> usize {
    2
}

const fn default_crowding_baseline() -> usize {
    5
}

const fn default_headliner_allowance() -> usize {
    2
}

const fn default_high_risk_threshold() -> u32 {
    20
}

const fn default_crowded_bucket_threshold() -> usize {
    6
}

const fn default_top_critical() -> usize {
    5
}

const fn default_report_top() -> usize {
    10
}
