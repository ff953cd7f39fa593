//! Helpers turning synthetic tables into a scoring dataset.

#![allow(dead_code)]

use therascore_ranker::{CutoffTable, Dataset, ExpressionMatrix, SampleGroups};
use therascore_test_utils::{Cohort, SyntheticTables};

pub fn matrix(cohort: &Cohort) -> ExpressionMatrix {
    ExpressionMatrix::from_rows(cohort.samples.clone(), cohort.rows.clone())
        .expect("synthetic matrix is well formed")
}

pub fn groups(cohort: &Cohort) -> SampleGroups {
    SampleGroups::from_metadata(cohort.metadata.clone()).expect("synthetic metadata is unique")
}

pub fn dataset(tables: &SyntheticTables) -> Dataset {
    let cutoffs: CutoffTable = tables.cutoffs.iter().cloned().collect();
    Dataset::new(
        matrix(&tables.normal),
        matrix(&tables.tumour),
        groups(&tables.normal),
        groups(&tables.tumour),
        cutoffs,
    )
}
