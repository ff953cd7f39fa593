//! Risk/benefit scoring configuration.
//!
//! Every threshold and table the scoring components read lives here and is
//! passed explicitly into each component. Missing fields take the defaults
//! below when loaded from YAML, TOML or JSON.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TherascoreError};
use crate::tiers::{default_tissue_tiers, RiskTier, TierWeights};

/// Complete scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBenefitConfig {
    /// Two-sided confidence level for the Wilson interval
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    /// Risk sensitivity of the utility formula
    #[serde(default = "default_utility_lambda")]
    pub utility_lambda: f64,

    /// Any High-tier tissue proportion above this rejects the gene
    #[serde(default = "default_hard_reject_threshold")]
    pub hard_reject_threshold: f64,

    /// Minimum benefit point estimate in at least one indication for Accept
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f64,

    /// Tissues with fewer samples are marked for manual review
    #[serde(default = "default_min_samples_tissue")]
    pub min_samples_tissue: usize,

    #[serde(default)]
    pub tier_weights: TierWeights,

    /// Tissue name → risk tier
    #[serde(default = "default_tissue_tiers")]
    pub tissue_tiers: IndexMap<String, RiskTier>,

    /// Tier used for tissues absent from `tissue_tiers`
    #[serde(default)]
    pub default_tier: RiskTier,
}

fn default_confidence_level() -> f64 { 0.95 }
fn default_utility_lambda() -> f64 { 3.0 }
fn default_hard_reject_threshold() -> f64 { 0.05 }
fn default_accept_threshold() -> f64 { 0.10 }
fn default_min_samples_tissue() -> usize { 8 }

impl Default for RiskBenefitConfig {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
            utility_lambda: default_utility_lambda(),
            hard_reject_threshold: default_hard_reject_threshold(),
            accept_threshold: default_accept_threshold(),
            min_samples_tissue: default_min_samples_tissue(),
            tier_weights: TierWeights::default(),
            tissue_tiers: default_tissue_tiers(),
            default_tier: RiskTier::default(),
        }
    }
}

impl RiskBenefitConfig {
    /// Tier for a tissue, falling back to `default_tier` for unmapped names.
    pub fn tier_for(&self, tissue: &str) -> RiskTier {
        self.tissue_tiers
            .get(tissue)
            .copied()
            .unwrap_or(self.default_tier)
    }

    pub fn weight_for(&self, tier: RiskTier) -> f64 {
        self.tier_weights.weight(tier)
    }

    /// Reject out-of-range parameters before any gene is scored.
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(TherascoreError::Configuration(format!(
                "confidence_level must lie strictly between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        if !self.utility_lambda.is_finite() || self.utility_lambda < 0.0 {
            return Err(TherascoreError::Configuration(format!(
                "utility_lambda must be finite and non-negative, got {}",
                self.utility_lambda
            )));
        }
        check_unit_interval("hard_reject_threshold", self.hard_reject_threshold)?;
        check_unit_interval("accept_threshold", self.accept_threshold)?;
        self.tier_weights.validate()
    }

    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loading scoring config");
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TherascoreError::Configuration(format!(
            "{name} must lie in [0, 1], got {value}"
        )));
    }
    Ok(())
}
