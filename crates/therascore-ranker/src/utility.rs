//! Risk-penalised utility.
//!
//! U(g, i) = B(g, i) / (1 + λ × R(g))
//!
//! An undefined benefit counts as 0 and an undefined risk score as 0 here
//! only; the stored profile keeps them as missing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use therascore_common::RiskBenefitConfig;

use crate::benefit::IndicationBenefit;
use crate::risk::GeneRiskProfile;

/// Utility per indication, in indication order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneUtility {
    pub per_indication: IndexMap<String, f64>,
}

impl GeneUtility {
    pub fn get(&self, indication: &str) -> Option<f64> {
        self.per_indication.get(indication).copied()
    }

    pub fn len(&self) -> usize {
        self.per_indication.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_indication.is_empty()
    }
}

pub fn utility(benefit: Option<f64>, riskscore: Option<f64>, lambda: f64) -> f64 {
    benefit.unwrap_or(0.0) / (1.0 + lambda * riskscore.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityScorer {
    lambda: f64,
}

impl Default for UtilityScorer {
    fn default() -> Self {
        Self { lambda: 3.0 }
    }
}

impl UtilityScorer {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    pub fn from_config(config: &RiskBenefitConfig) -> Self {
        Self::new(config.utility_lambda)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn score(&self, risk: &GeneRiskProfile, benefit: &IndicationBenefit) -> GeneUtility {
        let per_indication = benefit
            .points()
            .map(|(name, b)| (name.to_string(), utility(b, risk.riskscore, self.lambda)))
            .collect();
        GeneUtility { per_indication }
    }
}
