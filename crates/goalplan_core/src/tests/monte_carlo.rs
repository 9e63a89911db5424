//! Monte Carlo simulation tests

use super::{goal_due_in, now, sample_goal};
use crate::error::GoalError;
use crate::model::{Goal, MarketAssumptions};
use crate::simulation::{
    self, MonteCarloConfig, ReturnDistribution, SimulationProgress, simulate,
};

fn seeded(simulations: usize, seed: u64) -> MonteCarloConfig {
    MonteCarloConfig::default()
        .with_simulations(simulations)
        .with_seed(seed)
}

#[test]
fn test_seeded_runs_are_identical() {
    let goal = goal_due_in(60);
    let assumptions = MarketAssumptions::default();
    let config = seeded(2_000, 42);

    let a = simulate(&goal, &assumptions, &config, now()).unwrap();
    let b = simulate(&goal, &assumptions, &config, now()).unwrap();

    assert_eq!(a.outcomes, b.outcomes);
    assert_eq!(a.success_count, b.success_count);
    assert_eq!(a.seed, 42);
}

#[test]
fn test_different_seeds_differ() {
    let goal = goal_due_in(60);
    let assumptions = MarketAssumptions::default();

    let a = simulate(&goal, &assumptions, &seeded(500, 1), now()).unwrap();
    let b = simulate(&goal, &assumptions, &seeded(500, 2), now()).unwrap();
    assert_ne!(a.outcomes, b.outcomes);
}

#[test]
fn test_unseeded_run_reports_its_seed() {
    let goal = goal_due_in(24);
    let assumptions = MarketAssumptions::default();
    let config = MonteCarloConfig::default().with_simulations(300);

    let first = simulate(&goal, &assumptions, &config, now()).unwrap();
    let replay = simulate(&goal, &assumptions, &seeded(300, first.seed), now()).unwrap();
    assert_eq!(first.outcomes, replay.outcomes);
}

#[test]
fn test_partial_batches_are_counted() {
    let goal = goal_due_in(12);
    let out = simulate(&goal, &MarketAssumptions::default(), &seeded(1_001, 9), now()).unwrap();

    assert_eq!(out.outcomes.len(), 1_001);
    assert_eq!(out.simulations, 1_001);
    assert!(out.outcomes.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_percentiles_are_ordered() {
    let goal = goal_due_in(120);
    let out = simulate(&goal, &MarketAssumptions::default(), &seeded(2_000, 7), now()).unwrap();
    let set = out.percentiles();

    assert!(set.p10 <= set.p50);
    assert!(set.p50 <= set.p90);
    assert_eq!(out.median(), set.p50);
    assert!((0.0..=1.0).contains(&out.probability()));
}

#[test]
fn test_probability_is_monotone_in_contribution() {
    let assumptions = MarketAssumptions::default();
    let config = seeded(1_000, 2024);
    let mut last = 0.0;

    for contribution in [0.0, 300.0, 600.0, 1_200.0, 2_400.0] {
        let goal = Goal {
            monthly_contribution: contribution,
            ..goal_due_in(36)
        };
        let p = simulate(&goal, &assumptions, &config, now())
            .unwrap()
            .probability();
        assert!(p >= last, "contribution={contribution} p={p} last={last}");
        last = p;
    }
}

#[test]
fn test_zero_months_keeps_current_amount() {
    let goal = Goal {
        target_date: now(),
        ..sample_goal()
    };
    let out = simulate(&goal, &MarketAssumptions::default(), &seeded(100, 3), now()).unwrap();

    assert!(out.outcomes.iter().all(|&v| v == goal.current_amount));
    assert_eq!(out.probability(), 0.0);

    let met = Goal {
        current_amount: 25_000.0,
        ..goal
    };
    let out = simulate(&met, &MarketAssumptions::default(), &seeded(100, 3), now()).unwrap();
    assert_eq!(out.probability(), 1.0);
}

#[test]
fn test_normal_distribution_is_reproducible() {
    let goal = goal_due_in(48);
    let assumptions = MarketAssumptions::default();
    let normal = seeded(500, 11).with_distribution(ReturnDistribution::Normal);

    let a = simulate(&goal, &assumptions, &normal, now()).unwrap();
    let b = simulate(&goal, &assumptions, &normal, now()).unwrap();
    let uniform = simulate(&goal, &assumptions, &seeded(500, 11), now()).unwrap();

    assert_eq!(a.outcomes, b.outcomes);
    assert_ne!(a.outcomes, uniform.outcomes);
}

#[test]
fn test_metrics_are_collected() {
    let goal = goal_due_in(30);
    let config = MonteCarloConfig {
        collect_metrics: true,
        ..seeded(600, 5)
    };
    let out = simulate(&goal, &MarketAssumptions::default(), &config, now()).unwrap();
    let metrics = out.metrics.expect("metrics requested");

    assert_eq!(metrics.paths, 600);
    assert_eq!(metrics.months_simulated, 600 * 30);
    // escalations after months 12 and 24
    assert_eq!(metrics.contribution_escalations, 600 * 2);
    assert!(metrics.crash_free_paths <= metrics.paths);
}

#[test]
fn test_metrics_absent_by_default() {
    let out = simulate(
        &goal_due_in(6),
        &MarketAssumptions::default(),
        &seeded(50, 1),
        now(),
    )
    .unwrap();
    assert!(out.metrics.is_none());
}

#[test]
fn test_progress_reaches_total() {
    let progress = SimulationProgress::default();
    let out = simulation::simulate_with_progress(
        &goal_due_in(12),
        &MarketAssumptions::default(),
        &seeded(777, 8),
        now(),
        &progress,
    )
    .unwrap();

    assert_eq!(out.outcomes.len(), 777);
    assert_eq!(progress.total(), 777);
    assert_eq!(progress.completed(), 777);
}

#[test]
fn test_cancelled_run_returns_error() {
    let progress = SimulationProgress::new(0);
    progress.cancel();
    let err = simulation::simulate_with_progress(
        &goal_due_in(12),
        &MarketAssumptions::default(),
        &seeded(1_000, 8),
        now(),
        &progress,
    )
    .unwrap_err();

    assert!(matches!(err, GoalError::Cancelled));
    assert!(progress.is_cancelled());
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let assumptions = MarketAssumptions::default();
    let err = simulate(&sample_goal(), &assumptions, &seeded(0, 1), now()).unwrap_err();
    assert!(matches!(err, GoalError::InvalidSimulationCount(0)));

    let bad_goal = Goal {
        target_amount: -1.0,
        ..sample_goal()
    };
    let err = simulate(&bad_goal, &assumptions, &seeded(10, 1), now()).unwrap_err();
    assert!(matches!(err, GoalError::InvalidTargetAmount(_)));
}
