//! Data behind the risk/benefit scatter plot and the tissue heatmap.
//! Drawing them is left to the caller.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::decision::Decision;
use crate::pipeline::RankedResults;
use crate::ranking::{top_n, SummaryRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub gene: String,
    pub riskscore: Option<f64>,
    pub best_benefit: Option<f64>,
    pub decision: Decision,
}

/// Risk score against best-indication benefit, one point per ranked gene.
pub fn scatter_points(rows: &[SummaryRow]) -> Vec<ScatterPoint> {
    rows.iter()
        .map(|row| ScatterPoint {
            gene: row.gene.clone(),
            riskscore: row.riskscore,
            best_benefit: row.best_benefit,
            decision: row.decision,
        })
        .collect()
}

/// Per-tissue normal proportions for the top-ranked genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueHeatmap {
    /// Row labels, in rank order
    pub genes: Vec<String>,
    /// Column labels, sorted by name
    pub tissues: Vec<String>,
    /// `values[gene][tissue]`; `None` where the tissue had no samples
    pub values: Vec<Vec<Option<f64>>>,
}

pub fn tissue_heatmap(results: &RankedResults, n: usize) -> TissueHeatmap {
    let rows = top_n(&results.rows, n);
    let records: Vec<_> = rows.iter().filter_map(|row| results.record(&row.gene)).collect();

    let tissues: Vec<String> = records
        .iter()
        .flat_map(|r| r.risk.per_tissue.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let values: Vec<Vec<Option<f64>>> = records
        .iter()
        .map(|r| tissues.iter().map(|t| r.risk.proportion(t)).collect::<Vec<_>>())
        .collect();

    TissueHeatmap {
        genes: records.iter().map(|r| r.gene.clone()).collect(),
        tissues,
        values,
    }
}
