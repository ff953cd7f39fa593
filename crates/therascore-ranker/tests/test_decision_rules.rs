//! End-to-end decision rules on synthetic cohorts.

mod common;

use therascore_common::RiskBenefitConfig;
use therascore_ranker::{Decision, Pipeline};
use therascore_test_utils::{init_tracing, SyntheticTables};

fn score(tables: &SyntheticTables, gene: &str) -> therascore_ranker::GeneRecord {
    init_tracing();
    let config = RiskBenefitConfig::default();
    let data = common::dataset(tables);
    let pipeline = Pipeline::new(&config, &data).unwrap();
    pipeline.score_gene(gene).unwrap()
}

#[test]
fn test_single_high_tissue_at_six_percent_rejects() {
    let tables = SyntheticTables::builder()
        .tissue("Heart", 100)
        .indication("PAAD", 100)
        .indication("LUAD", 100)
        .gene("GENE1", 1.0)
        .normal_above("GENE1", "Heart", 6)
        .tumour_above("GENE1", "PAAD", 90)
        .tumour_above("GENE1", "LUAD", 100)
        .build();

    let record = score(&tables, "GENE1");
    assert!((record.risk.max_high_risk_proportion - 0.06).abs() < 1e-12);
    assert!((record.risk.riskscore.unwrap() - 0.06).abs() < 1e-12);
    assert_eq!(record.decision, Decision::Reject);
}

#[test]
fn test_benefit_of_twenty_percent_accepts() {
    let tables = SyntheticTables::builder()
        .tissue("Heart", 100)
        .tissue("Kidney", 100)
        .indication("PAAD", 100)
        .gene("GENE1", 0.5)
        .normal_above("GENE1", "Kidney", 30)
        .tumour_above("GENE1", "PAAD", 20)
        .build();

    let record = score(&tables, "GENE1");
    assert_eq!(record.risk.max_high_risk_proportion, 0.0);
    // (1.0 × 0.0 + 0.5 × 0.3) / 1.5
    assert!((record.risk.riskscore.unwrap() - 0.1).abs() < 1e-12);
    assert!((record.utility.get("PAAD").unwrap() - 0.2 / 1.3).abs() < 1e-12);
    assert_eq!(record.decision, Decision::Accept);

    let paad = record.benefit.per_indication["PAAD"];
    assert_eq!((paad.k, paad.n), (20, 100));
    assert!(paad.ci_low().unwrap() < 0.2 && paad.ci_high().unwrap() > 0.2);
}

#[test]
fn test_low_benefit_everywhere_flags() {
    let tables = SyntheticTables::builder()
        .tissue("Heart", 50)
        .indication("PAAD", 100)
        .indication("LUAD", 100)
        .gene("GENE1", 2.0)
        .tumour_above("GENE1", "PAAD", 9)
        .tumour_above("GENE1", "LUAD", 5)
        .build();

    let record = score(&tables, "GENE1");
    assert_eq!(record.risk.max_high_risk_proportion, 0.0);
    assert_eq!(record.decision, Decision::Flag);
}

#[test]
fn test_medium_tier_expression_never_rejects() {
    let tables = SyntheticTables::builder()
        .tissue("Colon", 20)
        .indication("COAD", 20)
        .gene("GENE1", 1.0)
        .normal_above("GENE1", "Colon", 20)
        .tumour_above("GENE1", "COAD", 20)
        .build();

    let record = score(&tables, "GENE1");
    assert_eq!(record.risk.riskscore, Some(1.0));
    assert_eq!(record.decision, Decision::Accept);
    assert!((record.utility.get("COAD").unwrap() - 0.25).abs() < 1e-12);
}

#[test]
fn test_no_normal_tissues_still_classified() {
    let tables = SyntheticTables::builder()
        .indication("PAAD", 10)
        .gene("GENE1", 1.0)
        .tumour_above("GENE1", "PAAD", 5)
        .build();

    let record = score(&tables, "GENE1");
    assert_eq!(record.risk.riskscore, None);
    assert_eq!(record.risk.max_high_risk_proportion, 0.0);
    assert_eq!(record.utility.get("PAAD"), Some(0.5));
    assert_eq!(record.decision, Decision::Accept);
}

#[test]
fn test_tissues_without_samples_leave_risk_undefined() {
    let tables = SyntheticTables::builder()
        .indication("PAAD", 10)
        .gene("GENE1", 1.0)
        .tumour_above("GENE1", "PAAD", 0)
        .build();
    let mut data = common::dataset(&tables);
    data.tissues.push_group("Heart", Vec::<String>::new()).unwrap();
    data.tissues.push_group("Liver", Vec::<String>::new()).unwrap();

    let config = RiskBenefitConfig::default();
    let record = Pipeline::new(&config, &data).unwrap().score_gene("GENE1").unwrap();

    assert_eq!(record.risk.per_tissue.len(), 2);
    assert_eq!(record.risk.riskscore, None);
    assert!(record.risk.per_tissue.values().all(|t| !t.estimate.is_defined()));
    assert_eq!(record.decision, Decision::Flag);
}

#[test]
fn test_unmapped_tissue_counts_as_low_tier() {
    let tables = SyntheticTables::builder()
        .tissue("Heart", 10)
        .tissue("Tail", 10)
        .indication("PAAD", 10)
        .gene("GENE1", 1.0)
        .normal_above("GENE1", "Tail", 10)
        .build();

    let record = score(&tables, "GENE1");
    let tail = &record.risk.per_tissue["Tail"];
    assert_eq!(tail.tier, therascore_common::RiskTier::Low);
    // (1.0 × 0.0 + 0.1 × 1.0) / 1.1
    assert!((record.risk.riskscore.unwrap() - 0.1 / 1.1).abs() < 1e-12);
}
