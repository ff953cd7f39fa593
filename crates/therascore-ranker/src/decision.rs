//! Go/no-go classification.
//!
//! Reject is gene-wide and overrides any benefit; otherwise a gene is
//! accepted when at least one indication clears the benefit floor.

use std::fmt;

use serde::{Deserialize, Serialize};
use therascore_common::RiskBenefitConfig;

use crate::benefit::IndicationBenefit;
use crate::risk::GeneRiskProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// A High-tier tissue exceeds the hard-reject ceiling.
    Reject,
    Accept,
    /// Not rejected on risk, but no indication shows enough benefit.
    Flag,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Reject => write!(f, "Reject"),
            Decision::Accept => write!(f, "Accept"),
            Decision::Flag => write!(f, "Flag"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionClassifier {
    pub hard_reject_threshold: f64,
    pub accept_threshold: f64,
}

impl Default for DecisionClassifier {
    fn default() -> Self {
        Self {
            hard_reject_threshold: 0.05,
            accept_threshold: 0.10,
        }
    }
}

impl DecisionClassifier {
    pub fn from_config(config: &RiskBenefitConfig) -> Self {
        Self {
            hard_reject_threshold: config.hard_reject_threshold,
            accept_threshold: config.accept_threshold,
        }
    }

    pub fn classify(
        &self,
        max_high_risk_proportion: f64,
        benefit_points: impl IntoIterator<Item = Option<f64>>,
    ) -> Decision {
        if max_high_risk_proportion > self.hard_reject_threshold {
            return Decision::Reject;
        }
        let accept_any = benefit_points
            .into_iter()
            .flatten()
            .any(|b| b >= self.accept_threshold);
        if accept_any {
            Decision::Accept
        } else {
            Decision::Flag
        }
    }

    pub fn classify_gene(&self, risk: &GeneRiskProfile, benefit: &IndicationBenefit) -> Decision {
        self.classify(risk.max_high_risk_proportion, benefit.points().map(|(_, b)| b))
    }
}
