//! Binomial proportion estimates with Wilson score intervals.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use therascore_common::{Result, TherascoreError};

/// Normal quantile used for the default 95% level.
pub const Z_95: f64 = 1.96;

/// Point estimate with its clipped confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub point: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Fraction of `n` samples expressing above cutoff.
/// `interval` is `None` when there are no samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionEstimate {
    pub k: usize,
    pub n: usize,
    pub interval: Option<Interval>,
}

impl ProportionEstimate {
    pub fn point(&self) -> Option<f64> {
        self.interval.map(|i| i.point)
    }

    pub fn ci_low(&self) -> Option<f64> {
        self.interval.map(|i| i.ci_low)
    }

    pub fn ci_high(&self) -> Option<f64> {
        self.interval.map(|i| i.ci_high)
    }

    pub fn is_defined(&self) -> bool {
        self.interval.is_some()
    }
}

/// Two-sided normal quantile for a confidence level.
///
/// 0.95 maps to exactly 1.96; other levels use the inverse standard normal CDF.
pub fn z_for_confidence(level: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(TherascoreError::Configuration(format!(
            "confidence level must lie strictly between 0 and 1, got {level}"
        )));
    }
    if (level - 0.95).abs() < 1e-12 {
        return Ok(Z_95);
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| TherascoreError::Configuration(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + level / 2.0))
}

/// Wilson score interval for `k` successes out of `n`, clipped to [0, 1].
pub fn wilson_interval(k: usize, n: usize, z: f64) -> Result<ProportionEstimate> {
    if k > n {
        return Err(TherascoreError::DataIntegrity(format!(
            "success count {k} exceeds sample count {n}"
        )));
    }
    if n == 0 {
        return Ok(ProportionEstimate { k, n, interval: None });
    }

    let nf = n as f64;
    let p = k as f64 / nf;
    let z2 = z * z;
    let denom = 1.0 + z2 / nf;
    let centre = p + z2 / (2.0 * nf);
    let adj = z * ((p * (1.0 - p) + z2 / (4.0 * nf)) / nf).sqrt();

    let low = ((centre - adj) / denom).clamp(0.0, 1.0);
    let high = ((centre + adj) / denom).clamp(0.0, 1.0);

    Ok(ProportionEstimate {
        k,
        n,
        interval: Some(Interval {
            point: p,
            // rounding at p = 0 and p = 1 can leave the bound a ulp past the point
            ci_low: low.min(p),
            ci_high: high.max(p),
        }),
    })
}

/// Number of the given columns whose value is strictly greater than `cutoff`.
pub fn count_above(values: &[f64], columns: &[usize], cutoff: f64) -> usize {
    columns.iter().filter(|&&c| values[c] > cutoff).count()
}

/// Proportion estimator bound to one confidence level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionEstimator {
    z: f64,
}

impl Default for ProportionEstimator {
    fn default() -> Self {
        Self { z: Z_95 }
    }
}

impl ProportionEstimator {
    pub fn new(confidence_level: f64) -> Result<Self> {
        Ok(Self { z: z_for_confidence(confidence_level)? })
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn estimate(&self, k: usize, n: usize) -> Result<ProportionEstimate> {
        wilson_interval(k, n, self.z)
    }

    /// Estimate over one sample group of an expression row.
    pub fn estimate_group(
        &self,
        values: &[f64],
        columns: &[usize],
        cutoff: f64,
    ) -> Result<ProportionEstimate> {
        self.estimate(count_above(values, columns, cutoff), columns.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_samples_fully_undefined() {
        let est = wilson_interval(0, 0, Z_95).unwrap();
        assert_eq!(est.n, 0);
        assert!(est.point().is_none());
        assert!(est.ci_low().is_none());
        assert!(est.ci_high().is_none());
        assert!(!est.is_defined());
    }

    #[test]
    fn test_k_exceeds_n_is_integrity_error() {
        let err = wilson_interval(5, 4, Z_95).unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn test_known_interval() {
        // 20/100 at 95%: Wilson bounds ≈ (0.1334, 0.2888)
        let est = wilson_interval(20, 100, Z_95).unwrap();
        let i = est.interval.unwrap();
        assert!((i.point - 0.2).abs() < 1e-12);
        assert!((i.ci_low - 0.13337).abs() < 1e-4, "low = {}", i.ci_low);
        assert!((i.ci_high - 0.28883).abs() < 1e-4, "high = {}", i.ci_high);
    }

    #[test]
    fn test_bounds_contain_point_for_all_small_counts() {
        for n in 1..=60 {
            for k in 0..=n {
                let i = wilson_interval(k, n, Z_95).unwrap().interval.unwrap();
                assert!(i.ci_low >= 0.0 && i.ci_high <= 1.0, "k={k} n={n}");
                assert!(i.ci_low <= i.point && i.point <= i.ci_high, "k={k} n={n}: {i:?}");
            }
        }
    }

    #[test]
    fn test_extremes_clip_to_unit_interval() {
        let zero = wilson_interval(0, 10, Z_95).unwrap().interval.unwrap();
        assert_eq!(zero.ci_low, 0.0);
        assert!(zero.ci_high > 0.0);
        let all = wilson_interval(10, 10, Z_95).unwrap().interval.unwrap();
        assert_eq!(all.ci_high, 1.0);
        assert!(all.ci_low < 1.0);
    }

    #[test]
    fn test_z_for_confidence() {
        assert_eq!(z_for_confidence(0.95).unwrap(), 1.96);
        assert!((z_for_confidence(0.99).unwrap() - 2.5758).abs() < 1e-3);
        assert!((z_for_confidence(0.90).unwrap() - 1.6449).abs() < 1e-3);
        assert!(z_for_confidence(0.0).is_err());
        assert!(z_for_confidence(1.0).is_err());
    }

    #[test]
    fn test_wider_level_gives_wider_interval() {
        let narrow = ProportionEstimator::new(0.80).unwrap().estimate(7, 30).unwrap();
        let wide = ProportionEstimator::new(0.99).unwrap().estimate(7, 30).unwrap();
        assert!(wide.ci_low().unwrap() < narrow.ci_low().unwrap());
        assert!(wide.ci_high().unwrap() > narrow.ci_high().unwrap());
    }

    #[test]
    fn test_count_is_strictly_above() {
        let values = [0.0, 1.0, 1.0, 2.5, 3.0];
        assert_eq!(count_above(&values, &[0, 1, 2, 3, 4], 1.0), 2);
        assert_eq!(count_above(&values, &[0, 3], 1.0), 1);
        assert_eq!(count_above(&values, &[], 1.0), 0);
    }

    #[test]
    fn test_estimate_group() {
        let est = ProportionEstimator::default()
            .estimate_group(&[0.0, 5.0, 5.0, 0.0], &[1, 2, 3], 1.0)
            .unwrap();
        assert_eq!((est.k, est.n), (2, 3));
    }
}
