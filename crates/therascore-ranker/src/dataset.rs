//! In-memory input tables and their boundary checks.
//!
//! Structural faults (ragged rows, duplicate or unknown sample ids) are
//! rejected when the tables are built. Per-value faults in one gene's row
//! (negative or non-finite expression) are only reported when that gene is
//! scored, so a single bad row never blocks the rest of the batch.

use std::collections::HashMap;

use indexmap::IndexMap;
use therascore_common::{Result, TherascoreError};

// ── Expression Matrix ─────────────────────────────────────────────────────────

/// Genes × samples expression values for one cohort (normal or tumour).
#[derive(Debug, Clone, Default)]
pub struct ExpressionMatrix {
    samples: Vec<String>,
    sample_index: HashMap<String, usize>,
    rows: IndexMap<String, Vec<f64>>,
}

impl ExpressionMatrix {
    pub fn new<S: Into<String>>(samples: impl IntoIterator<Item = S>) -> Result<Self> {
        let samples: Vec<String> = samples.into_iter().map(Into::into).collect();
        let mut sample_index = HashMap::with_capacity(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            if sample_index.insert(sample.clone(), i).is_some() {
                return Err(TherascoreError::DataIntegrity(format!(
                    "duplicate sample column '{sample}'"
                )));
            }
        }
        Ok(Self { samples, sample_index, rows: IndexMap::new() })
    }

    /// Build a matrix from sample columns and `(gene, values)` rows.
    pub fn from_rows<S, G>(
        samples: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = (G, Vec<f64>)>,
    ) -> Result<Self>
    where
        S: Into<String>,
        G: Into<String>,
    {
        let mut matrix = Self::new(samples)?;
        for (gene, values) in rows {
            matrix.insert_row(gene, values)?;
        }
        Ok(matrix)
    }

    pub fn insert_row(&mut self, gene: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let gene = gene.into();
        if values.len() != self.samples.len() {
            return Err(TherascoreError::DataIntegrity(format!(
                "row '{gene}' has {} values but the matrix has {} samples",
                values.len(),
                self.samples.len()
            )));
        }
        if self.rows.contains_key(&gene) {
            return Err(TherascoreError::DataIntegrity(format!("duplicate gene row '{gene}'")));
        }
        self.rows.insert(gene, values);
        Ok(())
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn column(&self, sample: &str) -> Option<usize> {
        self.sample_index.get(sample).copied()
    }

    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn row(&self, gene: &str) -> Option<&[f64]> {
        self.rows.get(gene).map(Vec::as_slice)
    }

    /// Row for `gene`, checked to be present, finite and non-negative.
    pub fn validated_row(&self, gene: &str, cohort: &str) -> Result<&[f64]> {
        let row = self.row(gene).ok_or_else(|| {
            TherascoreError::DataIntegrity(format!("gene '{gene}' missing from {cohort} expression"))
        })?;
        if let Some((i, v)) = row.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0) {
            return Err(TherascoreError::DataIntegrity(format!(
                "{cohort} expression for '{gene}' in sample '{}' is {v}; expected a finite non-negative value",
                self.samples[i]
            )));
        }
        Ok(row)
    }
}

// ── Sample Groups ─────────────────────────────────────────────────────────────

/// Sample ids grouped by a categorical label (tissue or indication).
///
/// Groups keep the order in which labels were first seen; that order is the
/// tie-break order used when picking a best indication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleGroups {
    groups: IndexMap<String, Vec<String>>,
}

impl SampleGroups {
    /// Group `(sample_id, label)` metadata rows. Sample ids must be unique.
    pub fn from_metadata<S, L>(rows: impl IntoIterator<Item = (S, L)>) -> Result<Self>
    where
        S: Into<String>,
        L: Into<String>,
    {
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut seen: HashMap<String, String> = HashMap::new();
        for (sample, label) in rows {
            let (sample, label) = (sample.into(), label.into());
            if let Some(previous) = seen.insert(sample.clone(), label.clone()) {
                return Err(TherascoreError::DataIntegrity(format!(
                    "sample '{sample}' appears twice in metadata (labels '{previous}' and '{label}')"
                )));
            }
            groups.entry(label).or_default().push(sample);
        }
        Ok(Self { groups })
    }

    /// Declare a group explicitly; an empty sample list is allowed.
    pub fn push_group<S: Into<String>>(
        &mut self,
        label: impl Into<String>,
        samples: impl IntoIterator<Item = S>,
    ) -> Result<()> {
        let label = label.into();
        if self.groups.contains_key(&label) {
            return Err(TherascoreError::DataIntegrity(format!("duplicate group '{label}'")));
        }
        let samples: Vec<String> = samples.into_iter().map(Into::into).collect();
        for sample in &samples {
            if self.groups.values().flatten().any(|s| s == sample) {
                return Err(TherascoreError::DataIntegrity(format!(
                    "sample '{sample}' already belongs to another group"
                )));
            }
        }
        self.groups.insert(label, samples);
        Ok(())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Map every sample id to its column in `matrix`.
    pub fn resolve(&self, matrix: &ExpressionMatrix, cohort: &str) -> Result<ResolvedGroups> {
        let mut groups = Vec::with_capacity(self.groups.len());
        for (label, samples) in &self.groups {
            let columns = samples
                .iter()
                .map(|s| {
                    matrix.column(s).ok_or_else(|| {
                        TherascoreError::DataIntegrity(format!(
                            "{cohort} metadata references sample '{s}' ({label}) absent from the expression matrix"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            groups.push(ResolvedGroup { label: label.clone(), columns });
        }
        Ok(ResolvedGroups { groups })
    }
}

/// One labelled group with its matrix column indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGroup {
    pub label: String,
    pub columns: Vec<usize>,
}

/// Sample groups resolved against a specific matrix, in label order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedGroups {
    groups: Vec<ResolvedGroup>,
}

impl ResolvedGroups {
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedGroups {
    type Item = &'a ResolvedGroup;
    type IntoIter = std::slice::Iter<'a, ResolvedGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

// ── Cutoff Table ──────────────────────────────────────────────────────────────

/// Per-gene expression cutoffs. Table order is the default scoring order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutoffTable {
    cutoffs: IndexMap<String, f64>,
}

impl CutoffTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, gene: impl Into<String>, cutoff: f64) {
        self.cutoffs.insert(gene.into(), cutoff);
    }

    /// Cutoff for `gene`; missing or non-finite entries are configuration errors.
    pub fn get(&self, gene: &str) -> Result<f64> {
        match self.cutoffs.get(gene) {
            Some(c) if c.is_finite() => Ok(*c),
            Some(c) => Err(TherascoreError::Configuration(format!(
                "cutoff for '{gene}' is not a finite number ({c})"
            ))),
            None => Err(TherascoreError::Configuration(format!("no cutoff for gene '{gene}'"))),
        }
    }

    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.cutoffs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cutoffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cutoffs.is_empty()
    }
}

impl<G: Into<String>> FromIterator<(G, f64)> for CutoffTable {
    fn from_iter<I: IntoIterator<Item = (G, f64)>>(iter: I) -> Self {
        Self {
            cutoffs: iter.into_iter().map(|(g, c)| (g.into(), c)).collect(),
        }
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// All read-only inputs for one scoring run.
///
/// Normal and tumour cohorts are kept apart; tissues only resolve against the
/// normal matrix and indications only against the tumour matrix.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub normal: ExpressionMatrix,
    pub tumour: ExpressionMatrix,
    pub tissues: SampleGroups,
    pub indications: SampleGroups,
    pub cutoffs: CutoffTable,
}

impl Dataset {
    pub fn new(
        normal: ExpressionMatrix,
        tumour: ExpressionMatrix,
        tissues: SampleGroups,
        indications: SampleGroups,
        cutoffs: CutoffTable,
    ) -> Self {
        Self { normal, tumour, tissues, indications, cutoffs }
    }
}
