//! Normal-tissue risk aggregation.
//!
//! RiskScore = Σ(w_t × p_t) / Σ w_t over tissues with a defined proportion.
//! Tissues with no samples carry no weight rather than a zero proportion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use therascore_common::{Result, RiskBenefitConfig, RiskTier};
use tracing::debug;

use crate::dataset::ResolvedGroups;
use crate::proportion::{ProportionEstimate, ProportionEstimator};

/// Expression proportion and tier for one tissue of one gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueInfo {
    pub estimate: ProportionEstimate,
    pub tier: RiskTier,
    pub weight: f64,
    /// Fewer samples than `min_samples_tissue`; advisory only.
    pub low_sample: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRiskProfile {
    pub riskscore: Option<f64>,
    pub max_high_risk_proportion: f64,
    pub per_tissue: IndexMap<String, TissueInfo>,
}

impl GeneRiskProfile {
    pub fn from_tissues(per_tissue: IndexMap<String, TissueInfo>) -> Self {
        Self {
            riskscore: weighted_risk(per_tissue.values()),
            max_high_risk_proportion: max_high_risk(per_tissue.values()),
            per_tissue,
        }
    }

    pub fn proportion(&self, tissue: &str) -> Option<f64> {
        self.per_tissue.get(tissue).and_then(|t| t.estimate.point())
    }

    pub fn low_sample_tissues(&self) -> impl Iterator<Item = (&str, usize)> {
        self.per_tissue
            .iter()
            .filter(|(_, t)| t.low_sample)
            .map(|(name, t)| (name.as_str(), t.estimate.n))
    }
}

/// Weight-normalised mean of defined tissue proportions.
/// `None` when no tissue with positive weight has a defined proportion.
pub fn weighted_risk<'a>(tissues: impl IntoIterator<Item = &'a TissueInfo>) -> Option<f64> {
    let (weighted_sum, total_weight) = tissues
        .into_iter()
        .filter_map(|t| t.estimate.point().map(|p| (t.weight * p, t.weight)))
        .fold((0.0, 0.0), |(s, w), (sp, sw)| (s + sp, w + sw));

    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

/// Largest defined proportion among High-tier tissues, 0 if there is none.
pub fn max_high_risk<'a>(tissues: impl IntoIterator<Item = &'a TissueInfo>) -> f64 {
    tissues
        .into_iter()
        .filter(|t| t.tier == RiskTier::High)
        .filter_map(|t| t.estimate.point())
        .fold(0.0, f64::max)
}

pub struct TissueRiskAggregator<'a> {
    config: &'a RiskBenefitConfig,
    estimator: ProportionEstimator,
}

impl<'a> TissueRiskAggregator<'a> {
    pub fn new(config: &'a RiskBenefitConfig, estimator: ProportionEstimator) -> Self {
        Self { config, estimator }
    }

    pub fn tissue_info(&self, tissue: &str, k: usize, n: usize) -> Result<TissueInfo> {
        let tier = self.config.tier_for(tissue);
        Ok(TissueInfo {
            estimate: self.estimator.estimate(k, n)?,
            tier,
            weight: self.config.weight_for(tier),
            low_sample: n < self.config.min_samples_tissue,
        })
    }

    /// Risk profile of one gene's normal expression row.
    pub fn aggregate(
        &self,
        expression: &[f64],
        cutoff: f64,
        tissues: &ResolvedGroups,
    ) -> Result<GeneRiskProfile> {
        let mut per_tissue = IndexMap::with_capacity(tissues.len());
        for group in tissues {
            let estimate = self.estimator.estimate_group(expression, &group.columns, cutoff)?;
            let info = self.tissue_info(&group.label, estimate.k, estimate.n)?;
            per_tissue.insert(group.label.clone(), info);
        }

        let profile = GeneRiskProfile::from_tissues(per_tissue);
        debug!(
            riskscore = ?profile.riskscore,
            max_high = profile.max_high_risk_proportion,
            tissues = profile.per_tissue.len(),
            "Aggregated tissue risk"
        );
        Ok(profile)
    }
}
