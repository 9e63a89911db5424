//! Analytics orchestrator
//!
//! Validates a goal once, then runs the projection, Monte Carlo, stress and
//! scenario stages and folds them into an [`AnalyticsResult`]. Nothing is
//! computed for invalid input, so callers never see a partial result.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::date_math;
use crate::error::Result;
use crate::model::{
    AnalyticsResult, CompletionEstimates, ConfidenceInterval, Goal, GoalId, MarketAssumptions,
    Recommendation, ScenarioAnalysis, ScenarioOutcome, VolatilityMetrics,
};
use crate::percentiles::{self, standard};
use crate::planning::{self, Milestone};
use crate::projection::{self, Projection};
use crate::recommendations::{self, RecommendationContext};
use crate::scenarios::{self, MacroScenario, ScenarioProjection};
use crate::simulation::{self, MonteCarloOutcome};
use crate::stress;

/// Sortino denominator as a fraction of total volatility
const DOWNSIDE_VOLATILITY_SHARE: f64 = 0.8;

/// Risk figures from sorted Monte Carlo outcomes and the goal's return and
/// volatility assumptions.
pub fn volatility_metrics(
    outcomes: &MonteCarloOutcome,
    annual_return: f64,
    volatility: f64,
    risk_free_rate: f64,
) -> VolatilityMetrics {
    let sorted = &outcomes.outcomes;
    let set = outcomes.percentiles();

    let standard_deviation = if sorted.is_empty() {
        0.0
    } else {
        let ss: f64 = sorted.iter().map(|v| (v - set.p50).powi(2)).sum();
        (ss / sorted.len() as f64).sqrt()
    };

    let excess = annual_return - risk_free_rate;
    let ratio = |denominator: f64| {
        if denominator > 0.0 {
            excess / denominator
        } else {
            0.0
        }
    };

    VolatilityMetrics {
        standard_deviation,
        sharpe_ratio: ratio(volatility),
        sortino_ratio: ratio(volatility * DOWNSIDE_VOLATILITY_SHARE),
        max_drawdown: if set.p50 > 0.0 {
            (set.p90 - set.p10) / set.p50
        } else {
            0.0
        },
        value_at_risk_95: set.p10,
        conditional_var: percentiles::tail_mean(sorted, standard::TAIL_5),
    }
}

fn outcome(projection: &ScenarioProjection) -> ScenarioOutcome {
    ScenarioOutcome {
        completion: projection.completion_date,
        probability: projection.likelihood,
        final_amount: projection.projected_amount,
    }
}

/// Optimistic / realistic / pessimistic view: the table's highest and lowest
/// return multipliers around an unscaled baseline.
fn scenario_analysis(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    table: &[ScenarioProjection],
    macro_scenarios: &[MacroScenario],
    now: Date,
) -> ScenarioAnalysis {
    let by_multiplier = |pick_max: bool| {
        macro_scenarios
            .iter()
            .zip(table)
            .reduce(|best, cur| {
                let better = if pick_max {
                    cur.0.return_multiplier > best.0.return_multiplier
                } else {
                    cur.0.return_multiplier < best.0.return_multiplier
                };
                if better { cur } else { best }
            })
            .map(|(_, p)| p.clone())
    };

    let optimistic = by_multiplier(true).unwrap_or_else(|| {
        scenarios::project_scenario(goal, assumptions, &MacroScenario::bull(), now)
    });
    let pessimistic = by_multiplier(false).unwrap_or_else(|| {
        scenarios::project_scenario(goal, assumptions, &MacroScenario::bear(), now)
    });
    let realistic = scenarios::project_scenario(goal, assumptions, &MacroScenario::baseline(), now);

    ScenarioAnalysis {
        optimistic: outcome(&optimistic),
        realistic: outcome(&realistic),
        pessimistic: outcome(&pessimistic),
    }
}

fn completion_estimates(now: Date, months: u32) -> CompletionEstimates {
    let m = f64::from(months);
    CompletionEstimates {
        best_case: date_math::add_fractional_months(now, m * 0.75),
        median: date_math::add_months(now, months),
        worst_case: date_math::add_fractional_months(now, m * 1.5),
    }
}

/// Projected growth as a percentage of everything contributed
fn efficiency_score(goal: &Goal, projection: &Projection) -> f64 {
    let contributed =
        goal.current_amount + goal.monthly_contribution * f64::from(projection.months_remaining);
    if contributed > 0.0 {
        (projection.projected_value - contributed) / contributed * 100.0
    } else {
        0.0
    }
}

fn analyze_detailed(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    config: &EngineConfig,
    now: Date,
) -> Result<(AnalyticsResult, Vec<ScenarioProjection>)> {
    goal.validate()?;
    assumptions.validate()?;
    config.validate()?;

    let _span = tracing::debug_span!("analyze", goal = %goal.id).entered();

    let projection = projection::project(goal, assumptions, now);
    let mc = simulation::simulate(goal, assumptions, &config.monte_carlo, now)?;
    let set = mc.percentiles();
    let volatility = assumptions.volatility(goal.risk_tolerance);

    let stress_test_results =
        stress::stress_test(goal, assumptions, &config.stress_scenarios, now)?;
    let scenario_table =
        scenarios::analyze_scenarios(goal, assumptions, &config.macro_scenarios, now)?;
    let scenario_analysis =
        scenario_analysis(goal, assumptions, &scenario_table, &config.macro_scenarios, now);

    let result = AnalyticsResult {
        success_probability: projection.success_probability,
        monte_carlo_probability: mc.probability(),
        confidence_interval: ConfidenceInterval {
            lower: set.p10,
            upper: set.p90,
        },
        median_outcome: set.p50,
        mean_outcome: mc.mean(),
        required_monthly_contribution: projection.required_monthly_contribution,
        compound_growth_projection: projection.growth,
        volatility_metrics: volatility_metrics(
            &mc,
            projection.expected_annual_return,
            volatility,
            assumptions.risk_free_rate,
        ),
        stress_test_results,
        scenario_analysis,
        completion_estimates: completion_estimates(now, projection.months_remaining),
        months_remaining: projection.months_remaining,
        expected_return: projection.expected_annual_return,
        real_return: projection.expected_annual_return - assumptions.inflation_rate,
        efficiency_score: efficiency_score(goal, &projection),
        seed: mc.seed,
    };

    tracing::debug!(
        success = result.success_probability,
        monte_carlo = result.monte_carlo_probability,
        "analysis complete"
    );

    Ok((result, scenario_table))
}

/// Compute the full analytics for one goal as of `now`.
pub fn analyze(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    config: &EngineConfig,
    now: Date,
) -> Result<AnalyticsResult> {
    analyze_detailed(goal, assumptions, config, now).map(|(result, _)| result)
}

/// [`analyze`] as of today's date.
pub fn analyze_now(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    config: &EngineConfig,
) -> Result<AnalyticsResult> {
    analyze(goal, assumptions, config, date_math::today())
}

/// Analytics plus everything derived from them for one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalReport {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub analytics: AnalyticsResult,
    pub scenarios: Vec<ScenarioProjection>,
    pub recommendations: Vec<Recommendation>,
    pub milestones: Vec<Milestone>,
}

/// Analyze a goal and derive its recommendations and milestones.
///
/// `peer_goals` are the user's other goals and may include `goal` itself.
pub fn report(
    goal: &Goal,
    peer_goals: &[Goal],
    assumptions: &MarketAssumptions,
    config: &EngineConfig,
    portfolio_value: f64,
    now: Date,
) -> Result<GoalReport> {
    let (analytics, scenarios) = analyze_detailed(goal, assumptions, config, now)?;

    let ctx = RecommendationContext::new(goal, assumptions)
        .with_analytics(&analytics)
        .with_peers(peer_goals)
        .with_portfolio_value(portfolio_value);
    let recommendations = recommendations::recommend(&ctx, &config.recommendations);
    let milestones = planning::generate_milestones(goal, now);

    Ok(GoalReport {
        goal_id: goal.id,
        goal_name: goal.name.clone(),
        analytics,
        scenarios,
        recommendations,
        milestones,
    })
}
