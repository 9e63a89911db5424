//! Monte Carlo simulation of goal outcomes
//!
//! Each path starts from the goal's current amount and steps month by month
//! to the target date with a perturbed return, an occasional crash shock and
//! an annual contribution increase. Every path owns an RNG seeded from the
//! run seed and its index, so the sorted outcomes do not depend on how paths
//! are scheduled across threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use jiff::civil::Date;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GoalError, Result};
use crate::metrics::SimulationMetrics;
use crate::model::{Goal, MarketAssumptions};
use crate::percentiles::{self, PercentileSet};

pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Paths per work unit handed to the thread pool
const BATCH_SIZE: usize = 250;

/// Shape of the monthly return perturbation `U`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReturnDistribution {
    /// `U = 2u - 1` with `u ~ Uniform[0, 1)`
    #[default]
    Uniform,
    /// `U ~ N(0, 1)`. Gives materially fatter tails than `Uniform`.
    Normal,
}

/// Knobs for a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub simulations: usize,
    /// Fixed seed for reproducible runs; drawn from entropy when absent
    pub seed: Option<u64>,
    pub distribution: ReturnDistribution,
    /// Yearly chance of a crash, applied as `p / 12` each month
    pub annual_crash_probability: f64,
    /// Fraction of value lost in a crash, drawn uniformly from this range
    pub crash_severity_min: f64,
    pub crash_severity_max: f64,
    /// Contribution increase applied every 12 months
    pub contribution_growth: f64,
    pub collect_metrics: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            seed: None,
            distribution: ReturnDistribution::Uniform,
            annual_crash_probability: 0.05,
            crash_severity_min: 0.2,
            crash_severity_max: 0.5,
            contribution_growth: 0.03,
            collect_metrics: false,
        }
    }
}

impl MonteCarloConfig {
    #[must_use]
    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_distribution(mut self, distribution: ReturnDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(GoalError::InvalidSimulationCount(self.simulations));
        }
        let (min, max) = (self.crash_severity_min, self.crash_severity_max);
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
            return Err(GoalError::InvalidCrashSeverity { min, max });
        }
        Ok(())
    }

    /// The configured seed, or a fresh one from the thread RNG
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Progress tracking and cancellation for long simulations
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl SimulationProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Paths finished so far
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    fn add(&self, n: usize) {
        self.completed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SimulationProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Per-path inputs resolved from a goal, its assumptions and a config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathParams {
    pub start_value: f64,
    pub monthly_contribution: f64,
    pub monthly_rate: f64,
    /// Annual volatility scaled by `1 / sqrt(12)`
    pub monthly_volatility: f64,
    pub months: u32,
    pub monthly_crash_probability: f64,
    pub crash_severity_min: f64,
    pub crash_severity_max: f64,
    pub contribution_growth: f64,
    pub distribution: ReturnDistribution,
}

impl PathParams {
    pub fn from_goal(
        goal: &Goal,
        assumptions: &MarketAssumptions,
        config: &MonteCarloConfig,
        now: Date,
    ) -> Self {
        Self {
            start_value: goal.current_amount,
            monthly_contribution: goal.monthly_contribution,
            monthly_rate: assumptions.effective_monthly_rate(goal),
            monthly_volatility: assumptions.volatility(goal.risk_tolerance) / 12f64.sqrt(),
            months: goal.months_remaining(now),
            monthly_crash_probability: config.annual_crash_probability / 12.0,
            crash_severity_min: config.crash_severity_min,
            crash_severity_max: config.crash_severity_max,
            contribution_growth: config.contribution_growth,
            distribution: config.distribution,
        }
    }
}

/// Simulate one path and return its terminal value.
///
/// Each month draws, in order: the return perturbation, the crash test and
/// (only on a crash) the severity.
pub fn simulate_path<R: Rng + ?Sized>(
    params: &PathParams,
    rng: &mut R,
    mut metrics: Option<&mut SimulationMetrics>,
) -> f64 {
    let mut value = params.start_value;
    let mut contribution = params.monthly_contribution;
    let mut crashes = 0u64;

    for month in 0..params.months {
        let shock = match params.distribution {
            ReturnDistribution::Uniform => (rng.random::<f64>() - 0.5) * 2.0,
            ReturnDistribution::Normal => StandardNormal.sample(rng),
        };
        let monthly_return = params.monthly_rate + params.monthly_volatility * shock;
        value = value * (1.0 + monthly_return) + contribution;

        if rng.random::<f64>() < params.monthly_crash_probability {
            let span = params.crash_severity_max - params.crash_severity_min;
            let severity = params.crash_severity_min + rng.random::<f64>() * span;
            value *= 1.0 - severity;
            crashes += 1;
            if let Some(m) = metrics.as_deref_mut() {
                m.record_crash();
            }
        }

        if month % 12 == 0 && month > 0 {
            contribution *= 1.0 + params.contribution_growth;
            if let Some(m) = metrics.as_deref_mut() {
                m.record_escalation();
            }
        }

        if let Some(m) = metrics.as_deref_mut() {
            m.record_month();
        }
    }

    if let Some(m) = metrics {
        m.record_path(crashes);
    }
    value
}

/// Derive the RNG seed for path `index` of a run seeded with `seed`.
///
/// SplitMix64 finalizer over a golden-ratio stride, so neighbouring paths get
/// unrelated streams.
#[inline]
pub fn path_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Sorted terminal values and success count of a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloOutcome {
    /// Terminal values, ascending
    pub outcomes: Vec<f64>,
    pub success_count: usize,
    pub simulations: usize,
    pub seed: u64,
    pub metrics: Option<SimulationMetrics>,
}

impl MonteCarloOutcome {
    /// `success_count / simulations`
    pub fn probability(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.success_count as f64 / self.simulations as f64
        }
    }

    pub fn percentile(&self, p: f64) -> f64 {
        percentiles::percentile(&self.outcomes, p)
    }

    pub fn percentiles(&self) -> PercentileSet {
        PercentileSet::from_sorted(&self.outcomes)
    }

    pub fn median(&self) -> f64 {
        self.percentile(percentiles::standard::P50)
    }

    pub fn mean(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.outcomes.iter().sum::<f64>() / self.outcomes.len() as f64
        }
    }
}

struct Batch {
    values: Vec<f64>,
    metrics: Option<SimulationMetrics>,
}

/// Run the Monte Carlo simulation for a goal.
pub fn simulate(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    config: &MonteCarloConfig,
    now: Date,
) -> Result<MonteCarloOutcome> {
    simulate_inner(goal, assumptions, config, now, None)
}

/// Like [`simulate`], reporting completed paths to `progress` and stopping
/// with [`GoalError::Cancelled`] once it is cancelled.
pub fn simulate_with_progress(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    config: &MonteCarloConfig,
    now: Date,
    progress: &SimulationProgress,
) -> Result<MonteCarloOutcome> {
    simulate_inner(goal, assumptions, config, now, Some(progress))
}

fn simulate_inner(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    config: &MonteCarloConfig,
    now: Date,
    progress: Option<&SimulationProgress>,
) -> Result<MonteCarloOutcome> {
    goal.validate()?;
    config.validate()?;

    let seed = config.resolve_seed();
    let params = PathParams::from_goal(goal, assumptions, config, now);
    let n = config.simulations;
    let num_batches = n.div_ceil(BATCH_SIZE);

    tracing::debug!(
        goal = %goal.id,
        simulations = n,
        months = params.months,
        seed,
        "starting monte carlo run"
    );

    if let Some(p) = progress {
        p.reset(n);
    }

    let run_batch = |b: usize| -> Result<Batch> {
        if progress.is_some_and(SimulationProgress::is_cancelled) {
            return Err(GoalError::Cancelled);
        }
        let start = b * BATCH_SIZE;
        let end = (start + BATCH_SIZE).min(n);
        let mut metrics = config.collect_metrics.then(SimulationMetrics::new);
        let values = (start..end)
            .map(|i| {
                let mut rng = SmallRng::seed_from_u64(path_seed(seed, i as u64));
                simulate_path(&params, &mut rng, metrics.as_mut())
            })
            .collect();
        if let Some(p) = progress {
            p.add(end - start);
        }
        Ok(Batch { values, metrics })
    };

    #[cfg(feature = "parallel")]
    let batches: Result<Vec<Batch>> = (0..num_batches).into_par_iter().map(run_batch).collect();
    #[cfg(not(feature = "parallel"))]
    let batches: Result<Vec<Batch>> = (0..num_batches).map(run_batch).collect();
    let batches = batches?;

    let mut outcomes = Vec::with_capacity(n);
    let mut metrics = config.collect_metrics.then(SimulationMetrics::new);
    for batch in batches {
        outcomes.extend(batch.values);
        if let (Some(total), Some(m)) = (metrics.as_mut(), batch.metrics.as_ref()) {
            total.merge(m);
        }
    }

    let success_count = outcomes.iter().filter(|&&v| v >= goal.target_amount).count();
    outcomes.sort_by(f64::total_cmp);

    tracing::debug!(
        goal = %goal.id,
        success_count,
        "monte carlo run finished"
    );

    Ok(MonteCarloOutcome {
        outcomes,
        success_count,
        simulations: n,
        seed,
        metrics,
    })
}

/// Simulate `simulations` paths serially from a single caller-supplied RNG.
///
/// Returns the terminal values in ascending order.
pub fn simulate_paths_with<R: Rng + ?Sized>(
    params: &PathParams,
    simulations: usize,
    rng: &mut R,
) -> Vec<f64> {
    let mut outcomes: Vec<f64> = (0..simulations)
        .map(|_| simulate_path(params, rng, None))
        .collect();
    outcomes.sort_by(f64::total_cmp);
    outcomes
}
