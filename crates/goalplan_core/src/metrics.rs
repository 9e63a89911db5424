//! Path instrumentation for Monte Carlo runs
//!
//! Counters are collected per batch and merged in batch order, so the totals
//! are identical whether batches run serially or on the rayon pool.

use serde::{Deserialize, Serialize};

/// Counters collected while simulating paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Paths simulated
    pub paths: u64,
    /// Monthly steps across all paths
    pub months_simulated: u64,
    /// Crash shocks applied across all paths
    pub crash_events: u64,
    /// Annual contribution increases across all paths
    pub contribution_escalations: u64,
    /// Paths that never had a crash
    pub crash_free_paths: u64,
}

impl SimulationMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_month(&mut self) {
        self.months_simulated += 1;
    }

    pub fn record_crash(&mut self) {
        self.crash_events += 1;
    }

    pub fn record_escalation(&mut self) {
        self.contribution_escalations += 1;
    }

    /// Close out one path; `crashes` is the number of shocks it saw
    pub fn record_path(&mut self, crashes: u64) {
        self.paths += 1;
        if crashes == 0 {
            self.crash_free_paths += 1;
        }
    }

    /// Fold another batch's counters into this one
    pub fn merge(&mut self, other: &SimulationMetrics) {
        self.paths += other.paths;
        self.months_simulated += other.months_simulated;
        self.crash_events += other.crash_events;
        self.contribution_escalations += other.contribution_escalations;
        self.crash_free_paths += other.crash_free_paths;
    }

    /// Observed crash frequency per simulated year
    #[must_use]
    pub fn annual_crash_rate(&self) -> f64 {
        if self.months_simulated == 0 {
            0.0
        } else {
            self.crash_events as f64 * 12.0 / self.months_simulated as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_counters() {
        let mut a = SimulationMetrics::new();
        a.record_month();
        a.record_crash();
        a.record_path(1);

        let mut b = SimulationMetrics::new();
        b.record_month();
        b.record_escalation();
        b.record_path(0);

        a.merge(&b);
        assert_eq!(a.paths, 2);
        assert_eq!(a.months_simulated, 2);
        assert_eq!(a.crash_events, 1);
        assert_eq!(a.contribution_escalations, 1);
        assert_eq!(a.crash_free_paths, 1);
    }

    #[test]
    fn test_annual_crash_rate() {
        let mut m = SimulationMetrics::new();
        assert_eq!(m.annual_crash_rate(), 0.0);
        for _ in 0..24 {
            m.record_month();
        }
        m.record_crash();
        assert!((m.annual_crash_rate() - 0.5).abs() < 1e-12);
    }
}
