//! Per-indication benefit: fraction of tumour samples above cutoff.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use therascore_common::Result;

use crate::dataset::ResolvedGroups;
use crate::proportion::{ProportionEstimate, ProportionEstimator};

/// Benefit estimates keyed by indication, in indication order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicationBenefit {
    pub per_indication: IndexMap<String, ProportionEstimate>,
}

impl IndicationBenefit {
    pub fn point(&self, indication: &str) -> Option<f64> {
        self.per_indication.get(indication).and_then(ProportionEstimate::point)
    }

    /// Point estimates in indication order; `None` for empty indications.
    pub fn points(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.per_indication.iter().map(|(name, est)| (name.as_str(), est.point()))
    }

    pub fn len(&self) -> usize {
        self.per_indication.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_indication.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndicationBenefitEstimator {
    estimator: ProportionEstimator,
}

impl IndicationBenefitEstimator {
    pub fn new(estimator: ProportionEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimate(
        &self,
        expression: &[f64],
        cutoff: f64,
        indications: &ResolvedGroups,
    ) -> Result<IndicationBenefit> {
        let mut per_indication = IndexMap::with_capacity(indications.len());
        for group in indications {
            let estimate = self.estimator.estimate_group(expression, &group.columns, cutoff)?;
            per_indication.insert(group.label.clone(), estimate);
        }
        Ok(IndicationBenefit { per_indication })
    }
}
