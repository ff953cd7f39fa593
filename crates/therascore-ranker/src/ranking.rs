//! Best-indication selection and the ranked summary table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::decision::Decision;
use crate::pipeline::GeneRecord;
use crate::utility::GeneUtility;

/// One row per gene for ranking and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub gene: String,
    pub cutoff: f64,
    pub riskscore: Option<f64>,
    pub max_high_risk_proportion: f64,
    pub best_indication: Option<String>,
    pub best_benefit: Option<f64>,
    pub best_utility: Option<f64>,
    pub decision: Decision,
}

impl SummaryRow {
    pub fn from_record(record: &GeneRecord) -> Self {
        let best = best_indication(&record.utility);
        Self {
            gene: record.gene.clone(),
            cutoff: record.cutoff,
            riskscore: record.risk.riskscore,
            max_high_risk_proportion: record.risk.max_high_risk_proportion,
            best_indication: best.map(|(name, _)| name.to_string()),
            best_benefit: best.and_then(|(name, _)| record.benefit.point(name)),
            best_utility: best.map(|(_, u)| u),
            decision: record.decision,
        }
    }
}

/// Indication with the highest utility. Ties go to the earliest indication
/// in the utility map's order, which follows the metadata order.
pub fn best_indication(utility: &GeneUtility) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (name, &u) in &utility.per_indication {
        match best {
            Some((_, current)) if u <= current => {}
            _ => best = Some((name.as_str(), u)),
        }
    }
    best
}

/// Descending by utility; undefined utilities after every defined one.
pub fn compare_utility_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Summary rows sorted by best utility. The sort is stable, so genes with
/// equal utility keep their input order.
pub fn rank(records: &[GeneRecord]) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = records.iter().map(SummaryRow::from_record).collect();
    rows.sort_by(|a, b| compare_utility_desc(a.best_utility, b.best_utility));
    rows
}

pub fn top_n(rows: &[SummaryRow], n: usize) -> &[SummaryRow] {
    &rows[..n.min(rows.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benefit::IndicationBenefit;
    use crate::proportion::ProportionEstimator;
    use crate::risk::GeneRiskProfile;
    use indexmap::IndexMap;

    fn record(gene: &str, benefits: &[(&str, usize, usize)]) -> GeneRecord {
        let estimator = ProportionEstimator::default();
        let benefit = IndicationBenefit {
            per_indication: benefits
                .iter()
                .map(|&(name, k, n)| (name.to_string(), estimator.estimate(k, n).unwrap()))
                .collect(),
        };
        let utility = GeneUtility {
            per_indication: benefit
                .points()
                .map(|(name, b)| (name.to_string(), b.unwrap_or(0.0)))
                .collect(),
        };
        GeneRecord {
            gene: gene.to_string(),
            cutoff: 1.0,
            risk: GeneRiskProfile {
                riskscore: None,
                max_high_risk_proportion: 0.0,
                per_tissue: IndexMap::new(),
            },
            benefit,
            utility,
            decision: Decision::Flag,
        }
    }

    #[test]
    fn test_best_indication_first_on_tie() {
        let r = record("G", &[("LUAD", 1, 10), ("PAAD", 3, 10), ("BRCA", 3, 10)]);
        assert_eq!(best_indication(&r.utility), Some(("PAAD", 0.3)));
    }

    #[test]
    fn test_best_indication_empty() {
        assert_eq!(best_indication(&GeneUtility::default()), None);
    }

    #[test]
    fn test_summary_row_fields() {
        let r = record("G", &[("LUAD", 1, 10), ("PAAD", 4, 10)]);
        let row = SummaryRow::from_record(&r);
        assert_eq!(row.best_indication.as_deref(), Some("PAAD"));
        assert_eq!(row.best_benefit, Some(0.4));
        assert_eq!(row.best_utility, Some(0.4));
        assert_eq!(row.riskscore, None);
    }

    #[test]
    fn test_summary_row_without_indications() {
        let row = SummaryRow::from_record(&record("G", &[]));
        assert_eq!(row.best_indication, None);
        assert_eq!(row.best_benefit, None);
        assert_eq!(row.best_utility, None);
    }

    #[test]
    fn test_rank_order_with_undefined_last() {
        let records = vec![
            record("NONE", &[]),
            record("LOW", &[("LUAD", 1, 10)]),
            record("ZERO", &[("LUAD", 0, 10)]),
            record("HIGH", &[("LUAD", 9, 10)]),
        ];
        let rows = rank(&records);
        let genes: Vec<_> = rows.iter().map(|r| r.gene.as_str()).collect();
        assert_eq!(genes, vec!["HIGH", "LOW", "ZERO", "NONE"]);
    }

    #[test]
    fn test_rank_stable_for_ties() {
        let records = vec![
            record("B", &[("LUAD", 2, 10)]),
            record("A", &[("LUAD", 2, 10)]),
        ];
        let genes: Vec<_> = rank(&records).into_iter().map(|r| r.gene).collect();
        assert_eq!(genes, vec!["B", "A"]);
    }

    #[test]
    fn test_top_n() {
        let rows = rank(&[record("A", &[("X", 1, 2)]), record("B", &[("X", 2, 2)])]);
        assert_eq!(top_n(&rows, 1).len(), 1);
        assert_eq!(top_n(&rows, 1)[0].gene, "B");
        assert_eq!(top_n(&rows, 10).len(), 2);
    }
}
