//! therascore-ranker: Risk/benefit scoring engine for therapeutic targets.
//!
//! Normal-tissue expression is turned into a tier-weighted risk score,
//! tumour expression into per-indication benefit, and the two are combined
//! into a utility, a Reject/Accept/Flag decision and a ranked summary.

pub mod benefit;
pub mod dataset;
pub mod decision;
pub mod pipeline;
pub mod proportion;
pub mod ranking;
pub mod report;
pub mod risk;
pub mod utility;

pub use dataset::{CutoffTable, Dataset, ExpressionMatrix, SampleGroups};
pub use decision::Decision;
pub use pipeline::{GeneFailure, GeneRecord, Pipeline, RankedResults};
pub use ranking::SummaryRow;
