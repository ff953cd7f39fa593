//! therascore-common: Shared configuration, tiers and errors used across the Therascore crates.

pub mod error;
pub mod scoring_config;
pub mod tiers;

// Re-export commonly used types
pub use error::{Result, TherascoreError};
pub use scoring_config::RiskBenefitConfig;
pub use tiers::{RiskTier, TierWeights};
