//! Per-gene scoring and batch assembly.
//!
//! Each gene's record depends only on its own expression rows and the fixed
//! metadata, so genes can be scored in any order or in parallel. Ranking
//! happens once, after every record has been collected.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use therascore_common::{Result, RiskBenefitConfig, TherascoreError};
use tracing::{debug, info, warn};

use crate::benefit::{IndicationBenefit, IndicationBenefitEstimator};
use crate::dataset::{Dataset, ResolvedGroups};
use crate::decision::{Decision, DecisionClassifier};
use crate::proportion::ProportionEstimator;
use crate::ranking::{rank, SummaryRow};
use crate::risk::{GeneRiskProfile, TissueRiskAggregator};
use crate::utility::{GeneUtility, UtilityScorer};

/// Everything computed for one gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub gene: String,
    pub cutoff: f64,
    pub risk: GeneRiskProfile,
    pub benefit: IndicationBenefit,
    pub utility: GeneUtility,
    pub decision: Decision,
}

/// A gene that could not be scored.
#[derive(Debug)]
pub struct GeneFailure {
    pub gene: String,
    pub error: TherascoreError,
}

/// Output of a scoring run.
#[derive(Debug)]
pub struct RankedResults {
    /// One row per scored gene, best utility first
    pub rows: Vec<SummaryRow>,
    /// Full per-gene detail, in scoring order
    pub records: Vec<GeneRecord>,
    pub failures: Vec<GeneFailure>,
}

impl RankedResults {
    pub fn record(&self, gene: &str) -> Option<&GeneRecord> {
        self.records.iter().find(|r| r.gene == gene)
    }

    pub fn failure(&self, gene: &str) -> Option<&GeneFailure> {
        self.failures.iter().find(|f| f.gene == gene)
    }
}

/// A tissue with fewer samples than `min_samples_tissue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowSampleTissue {
    pub tissue: String,
    pub n: usize,
}

pub struct Pipeline<'a> {
    config: &'a RiskBenefitConfig,
    dataset: &'a Dataset,
    tissue_groups: ResolvedGroups,
    indication_groups: ResolvedGroups,
    estimator: ProportionEstimator,
    utility: UtilityScorer,
    classifier: DecisionClassifier,
}

impl<'a> Pipeline<'a> {
    /// Validate the configuration and resolve sample metadata against both
    /// matrices. Any failure here is structural and aborts the run.
    pub fn new(config: &'a RiskBenefitConfig, dataset: &'a Dataset) -> Result<Self> {
        config.validate()?;
        if dataset.cutoffs.is_empty() {
            return Err(TherascoreError::Configuration(
                "cutoff table is empty; no gene can be scored".to_string(),
            ));
        }

        let tissue_groups = dataset.tissues.resolve(&dataset.normal, "normal")?;
        let indication_groups = dataset.indications.resolve(&dataset.tumour, "tumour")?;

        let pipeline = Self {
            config,
            dataset,
            tissue_groups,
            indication_groups,
            estimator: ProportionEstimator::new(config.confidence_level)?,
            utility: UtilityScorer::from_config(config),
            classifier: DecisionClassifier::from_config(config),
        };

        for low in pipeline.low_sample_tissues() {
            warn!(
                tissue = %low.tissue,
                n = low.n,
                min = config.min_samples_tissue,
                "Tissue below minimum sample count; estimate kept but flagged for review"
            );
        }
        Ok(pipeline)
    }

    /// Tissues whose sample count is below `min_samples_tissue`.
    pub fn low_sample_tissues(&self) -> Vec<LowSampleTissue> {
        self.tissue_groups
            .iter()
            .filter(|g| g.columns.len() < self.config.min_samples_tissue)
            .map(|g| LowSampleTissue { tissue: g.label.clone(), n: g.columns.len() })
            .collect()
    }

    pub fn score_gene(&self, gene: &str) -> Result<GeneRecord> {
        let cutoff = self.dataset.cutoffs.get(gene)?;
        let normal = self.dataset.normal.validated_row(gene, "normal")?;
        let tumour = self.dataset.tumour.validated_row(gene, "tumour")?;

        let risk = TissueRiskAggregator::new(self.config, self.estimator)
            .aggregate(normal, cutoff, &self.tissue_groups)?;
        let benefit = IndicationBenefitEstimator::new(self.estimator)
            .estimate(tumour, cutoff, &self.indication_groups)?;
        let utility = self.utility.score(&risk, &benefit);
        let decision = self.classifier.classify_gene(&risk, &benefit);

        debug!(gene, cutoff, riskscore = ?risk.riskscore, %decision, "Scored gene");

        Ok(GeneRecord {
            gene: gene.to_string(),
            cutoff,
            risk,
            benefit,
            utility,
            decision,
        })
    }

    /// Score an explicit gene list sequentially.
    pub fn score_genes(&self, genes: &[&str]) -> RankedResults {
        info!(genes = genes.len(), "Starting risk/benefit scoring");
        let outcomes = genes
            .iter()
            .map(|&gene| (gene.to_string(), self.score_gene(gene)))
            .collect();
        assemble(outcomes)
    }

    /// Score every gene in the cutoff table, in table order.
    pub fn score_all(&self) -> RankedResults {
        let genes: Vec<&str> = self.dataset.cutoffs.genes().collect();
        self.score_genes(&genes)
    }

    /// Same as [`score_all`](Self::score_all) but spreads genes over the rayon pool.
    pub fn par_score_all(&self) -> RankedResults {
        let genes: Vec<&str> = self.dataset.cutoffs.genes().collect();
        info!(genes = genes.len(), threads = rayon::current_num_threads(), "Starting parallel risk/benefit scoring");
        // indexed collect keeps table order
        let outcomes = genes
            .par_iter()
            .map(|&gene| (gene.to_string(), self.score_gene(gene)))
            .collect();
        assemble(outcomes)
    }
}

fn assemble(outcomes: Vec<(String, Result<GeneRecord>)>) -> RankedResults {
    let mut records = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (gene, outcome) in outcomes {
        match outcome {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(gene = %gene, error = %error, "Gene could not be scored");
                failures.push(GeneFailure { gene, error });
            }
        }
    }

    let rows = rank(&records);
    info!(
        scored = records.len(),
        failed = failures.len(),
        accepted = rows.iter().filter(|r| r.decision == Decision::Accept).count(),
        rejected = rows.iter().filter(|r| r.decision == Decision::Reject).count(),
        "Risk/benefit scoring complete"
    );
    RankedResults { rows, records, failures }
}
