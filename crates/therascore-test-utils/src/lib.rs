//! Shared test fixtures: synthetic expression cohorts with exact per-group
//! counts above cutoff, plus tracing setup for tests.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministically shuffle a slice.
pub fn shuffle_seeded<T>(items: &mut [T], seed: u64) {
    items.shuffle(&mut StdRng::seed_from_u64(seed));
}

/// Raw tables for one cohort (normal or tumour).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cohort {
    pub samples: Vec<String>,
    /// `(sample_id, label)` rows
    pub metadata: Vec<(String, String)>,
    /// `(gene, values)` rows aligned with `samples`
    pub rows: Vec<(String, Vec<f64>)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntheticTables {
    pub normal: Cohort,
    pub tumour: Cohort,
    pub cutoffs: Vec<(String, f64)>,
}

impl SyntheticTables {
    pub fn builder() -> SyntheticTablesBuilder {
        SyntheticTablesBuilder::default()
    }
}

/// Builds cohorts where each `(gene, group)` has an exact number of samples
/// above the gene's cutoff. Samples above cutoff get `cutoff + 1`, the rest
/// get `0`, so cutoffs must be non-negative.
#[derive(Debug, Clone, Default)]
pub struct SyntheticTablesBuilder {
    tissues: Vec<(String, usize)>,
    indications: Vec<(String, usize)>,
    genes: Vec<(String, f64)>,
    normal_above: HashMap<(String, String), usize>,
    tumour_above: HashMap<(String, String), usize>,
    seed: Option<u64>,
}

impl SyntheticTablesBuilder {
    pub fn tissue(mut self, name: &str, samples: usize) -> Self {
        self.tissues.push((name.to_string(), samples));
        self
    }

    pub fn indication(mut self, name: &str, samples: usize) -> Self {
        self.indications.push((name.to_string(), samples));
        self
    }

    pub fn gene(mut self, name: &str, cutoff: f64) -> Self {
        self.genes.push((name.to_string(), cutoff));
        self
    }

    pub fn normal_above(mut self, gene: &str, tissue: &str, k: usize) -> Self {
        self.normal_above.insert((gene.to_string(), tissue.to_string()), k);
        self
    }

    pub fn tumour_above(mut self, gene: &str, indication: &str, k: usize) -> Self {
        self.tumour_above.insert((gene.to_string(), indication.to_string()), k);
        self
    }

    /// Shuffle sample columns and which samples sit above cutoff.
    pub fn shuffled(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> SyntheticTables {
        let mut rng = self.seed.map(StdRng::seed_from_u64);
        let normal = build_cohort("N", &self.tissues, &self.genes, &self.normal_above, rng.as_mut());
        let tumour = build_cohort("T", &self.indications, &self.genes, &self.tumour_above, rng.as_mut());
        SyntheticTables { normal, tumour, cutoffs: self.genes }
    }
}

fn build_cohort(
    prefix: &str,
    groups: &[(String, usize)],
    genes: &[(String, f64)],
    above: &HashMap<(String, String), usize>,
    mut rng: Option<&mut StdRng>,
) -> Cohort {
    let mut metadata = Vec::new();
    for (label, n) in groups {
        for i in 0..*n {
            metadata.push((format!("{prefix}-{label}-{i}"), label.clone()));
        }
    }

    let mut samples: Vec<String> = metadata.iter().map(|(s, _)| s.clone()).collect();
    if let Some(rng) = rng.as_deref_mut() {
        samples.shuffle(rng);
    }
    let column: HashMap<&str, usize> = samples.iter().enumerate().map(|(i, s)| (s.as_str(), i)).collect();

    let mut rows = Vec::with_capacity(genes.len());
    for (gene, cutoff) in genes {
        let mut values = vec![0.0; samples.len()];
        for (label, n) in groups {
            let k = above.get(&(gene.clone(), label.clone())).copied().unwrap_or(0);
            assert!(k <= *n, "{gene}/{label}: {k} above cutoff but only {n} samples");
            let mut members: Vec<usize> = (0..*n).collect();
            if let Some(rng) = rng.as_deref_mut() {
                members.shuffle(rng);
            }
            for &i in members.iter().take(k) {
                let sample = format!("{prefix}-{label}-{i}");
                values[column[sample.as_str()]] = cutoff + 1.0;
            }
        }
        rows.push((gene.clone(), values));
    }

    Cohort { samples, metadata, rows }
}
