//! Normal-tissue risk tiers and their aggregation weights.
//!
//! A tier reflects how severe off-target expression in that tissue would be.
//! Tissues missing from the table fall back to the configured default tier
//! (`Low` unless overridden), so an unseen tissue name never drops out of the
//! risk score.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TherascoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl Default for RiskTier {
    fn default() -> Self {
        RiskTier::Low
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::High => write!(f, "High"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::Low => write!(f, "Low"),
        }
    }
}

// ── Tier Weights ──────────────────────────────────────────────────────────────

/// Weight applied to each tissue proportion when averaging into a risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierWeights {
    #[serde(default = "default_high_weight")]
    pub high: f64,

    #[serde(default = "default_medium_weight")]
    pub medium: f64,

    #[serde(default = "default_low_weight")]
    pub low: f64,
}

fn default_high_weight() -> f64 { 1.0 }
fn default_medium_weight() -> f64 { 0.5 }
fn default_low_weight() -> f64 { 0.1 }

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            high: default_high_weight(),
            medium: default_medium_weight(),
            low: default_low_weight(),
        }
    }
}

impl TierWeights {
    pub fn weight(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::High => self.high,
            RiskTier::Medium => self.medium,
            RiskTier::Low => self.low,
        }
    }

    /// Weights must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (tier, w) in [
            (RiskTier::High, self.high),
            (RiskTier::Medium, self.medium),
            (RiskTier::Low, self.low),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(TherascoreError::Configuration(format!(
                    "tier weight for {tier} must be a finite non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }
}

// ── Reference Tissue Table ────────────────────────────────────────────────────

const HIGH_RISK_TISSUES: &[&str] = &[
    "Adipose Tissue",
    "Blood",
    "Blood Vessel",
    "Soft tissue/Bone",
    "Brain",
    "Esophagus",
    "Eye",
    "Heart",
    "Liver",
    "Lung",
    "Lymphatic tissue",
    "Muscle",
    "Nerve",
    "Paraganglia",
    "Small Intestine",
    "White blood cell",
    "Head and Neck region",
    "Bile duct",
];

const MEDIUM_RISK_TISSUES: &[&str] = &[
    "Adrenal Gland",
    "Bladder",
    "Colon",
    "Kidney",
    "Pancreas",
    "Pituitary",
    "Stomach",
    "Skin",
    "Lining of body cavities",
];

const LOW_RISK_TISSUES: &[&str] = &[
    "Breast",
    "Cervix",
    "Fallopian Tube",
    "Ovary",
    "Salivary Gland",
    "Prostate",
    "Rectum",
    "Spleen",
    "Thymus",
    "Thyroid",
    "Uterus",
    "Endometrium",
    "Vagina",
];

/// The reference tissue → tier assignment.
pub fn default_tissue_tiers() -> IndexMap<String, RiskTier> {
    let mut table = IndexMap::new();
    for (tissues, tier) in [
        (HIGH_RISK_TISSUES, RiskTier::High),
        (MEDIUM_RISK_TISSUES, RiskTier::Medium),
        (LOW_RISK_TISSUES, RiskTier::Low),
    ] {
        for tissue in tissues {
            table.insert(tissue.to_string(), tier);
        }
    }
    table
}
