//! Analytics output types

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::stress::StressTestReport;

/// P10 / P90 band of simulated terminal values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Deterministic portfolio value at fixed horizons
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub year1: f64,
    pub year3: f64,
    pub year5: f64,
    pub year10: f64,
    pub year15: f64,
    pub year20: f64,
    /// Value at the goal's target date
    #[serde(rename = "final")]
    pub final_value: f64,
}

impl GrowthProjection {
    /// Horizon values in increasing horizon order, `final` excluded
    pub fn yearly(&self) -> [(u32, f64); 6] {
        [
            (1, self.year1),
            (3, self.year3),
            (5, self.year5),
            (10, self.year10),
            (15, self.year15),
            (20, self.year20),
        ]
    }
}

/// Dispersion and risk-adjusted return figures derived from simulated outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    /// Root-mean-square deviation from the median outcome
    pub standard_deviation: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// `(P90 - P10) / median`, a spread measure rather than a path drawdown
    pub max_drawdown: f64,
    /// P10 terminal value
    pub value_at_risk_95: f64,
    /// Mean of the worst 5% of terminal values
    pub conditional_var: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub completion: Date,
    pub probability: f64,
    pub final_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub optimistic: ScenarioOutcome,
    pub realistic: ScenarioOutcome,
    pub pessimistic: ScenarioOutcome,
}

/// Heuristic completion dates: 0.75x, 1x and 1.5x the remaining horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionEstimates {
    pub best_case: Date,
    pub median: Date,
    pub worst_case: Date,
}

/// Full analytics for one goal. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// Deterministic projection against the target, in `[0, 1]`
    pub success_probability: f64,
    /// Fraction of simulated paths reaching the target, in `[0, 1]`
    pub monte_carlo_probability: f64,
    pub confidence_interval: ConfidenceInterval,
    pub median_outcome: f64,
    pub mean_outcome: f64,
    pub required_monthly_contribution: f64,
    pub compound_growth_projection: GrowthProjection,
    pub volatility_metrics: VolatilityMetrics,
    pub stress_test_results: StressTestReport,
    pub scenario_analysis: ScenarioAnalysis,
    pub completion_estimates: CompletionEstimates,
    pub months_remaining: u32,
    /// Annual expected return used for the projection
    pub expected_return: f64,
    /// Expected return less inflation
    pub real_return: f64,
    /// Projected growth as a percentage of total money put in
    pub efficiency_score: f64,
    /// Seed the Monte Carlo run used
    pub seed: u64,
}
