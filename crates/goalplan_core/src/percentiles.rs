//! Percentile extraction from sorted simulation outcomes

use serde::{Deserialize, Serialize};

/// Standard percentiles reported for Monte Carlo outcomes
pub mod standard {
    pub const P10: f64 = 0.10;
    pub const P50: f64 = 0.50;
    pub const P90: f64 = 0.90;
    /// Tail fraction averaged for conditional value-at-risk
    pub const TAIL_5: f64 = 0.05;
}

/// Value at rank `floor(n * p)` of an ascending slice, clamped to the last
/// element. Returns 0 for an empty slice.
#[inline]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64) * p).floor().max(0.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Mean of the lowest `floor(n * fraction)` values, at least one.
pub fn tail_mean(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let count = ((sorted.len() as f64) * fraction).floor() as usize;
    let count = count.clamp(1, sorted.len());
    sorted[..count].iter().sum::<f64>() / count as f64
}

/// P10 / P50 / P90 of a set of outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileSet {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

impl PercentileSet {
    /// Extract the standard percentiles from ascending outcomes
    pub fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p10: percentile(sorted, standard::P10),
            p50: percentile(sorted, standard::P50),
            p90: percentile(sorted, standard::P90),
        }
    }
}
