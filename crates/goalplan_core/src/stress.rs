//! Deterministic stress tests
//!
//! Each scenario applies an immediate haircut to current savings, then grows
//! the remainder with a return that ramps linearly from zero back to the
//! base rate over the recovery period. Contributions stay flat for the whole
//! horizon; unlike the Monte Carlo paths they are never escalated.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::{GoalError, Result};
use crate::model::{Goal, MarketAssumptions};

/// A named market shock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Fraction of current savings lost up front
    pub market_decline: f64,
    /// Years for returns to ramp back to the base rate
    pub recovery_years: f64,
    /// Inflation drift during the scenario, used for real values only
    #[serde(default)]
    pub inflation_adjustment: f64,
}

impl StressScenario {
    pub fn new(
        name: impl Into<String>,
        market_decline: f64,
        recovery_years: f64,
        inflation_adjustment: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            market_decline,
            recovery_years,
            inflation_adjustment,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn recession() -> Self {
        Self::new("recession", 0.40, 3.0, 0.02)
            .describe("Severe economic downturn similar to 2008")
    }

    pub fn stagflation() -> Self {
        Self::new("stagflation", 0.15, 5.0, 0.08)
            .describe("High inflation with economic stagnation")
    }

    pub fn correction() -> Self {
        Self::new("correction", 0.20, 1.5, 0.04).describe("Standard market correction")
    }

    pub fn depression() -> Self {
        Self::new("depression", 0.60, 8.0, -0.02)
            .describe("Extreme economic collapse similar to 1929")
    }

    /// The four standard scenarios in reporting order
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::recession(),
            Self::stagflation(),
            Self::correction(),
            Self::depression(),
        ]
    }

    pub fn recovery_months(&self) -> f64 {
        self.recovery_years * 12.0
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &'static str| -> Result<()> {
            Err(GoalError::InvalidScenario {
                name: self.name.clone(),
                reason,
            })
        };
        if self.name.trim().is_empty() {
            return invalid("name must not be empty");
        }
        if !(0.0..=1.0).contains(&self.market_decline) {
            return invalid("market decline must be within [0, 1]");
        }
        if !(self.recovery_years.is_finite() && self.recovery_years >= 0.0) {
            return invalid("recovery years must be non-negative and finite");
        }
        if !self.inflation_adjustment.is_finite() {
            return invalid("inflation adjustment must be finite");
        }
        Ok(())
    }
}

/// Outcome of one stress scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressResult {
    pub scenario: String,
    pub final_value: f64,
    /// `final_value` deflated by the scenario's inflation adjustment
    pub real_final_value: f64,
    /// 100 when the target is still reached, otherwise 0
    pub success_probability: f64,
    /// Extra months of contributions needed to close the gap. `None` when
    /// there is a gap but no contribution to close it with.
    pub delay_months: Option<u32>,
    pub additional_contribution_needed: f64,
}

impl StressResult {
    pub fn succeeded(&self) -> bool {
        self.success_probability >= 100.0
    }
}

/// Stress results in scenario table order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StressTestReport {
    pub results: Vec<StressResult>,
}

impl StressTestReport {
    pub fn get(&self, scenario: &str) -> Option<&StressResult> {
        self.results.iter().find(|r| r.scenario == scenario)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StressResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Scenarios the goal survives
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }
}

/// Base monthly rate for stress paths: the strategy return compounded
/// down to a monthly figure.
pub fn stress_base_rate(goal: &Goal, assumptions: &MarketAssumptions) -> f64 {
    (1.0 + assumptions.strategy_return(goal.investment_strategy)).powf(1.0 / 12.0) - 1.0
}

/// Run one scenario for a goal with `months` left and the given base rate.
pub fn evaluate_scenario(
    goal: &Goal,
    scenario: &StressScenario,
    base_rate: f64,
    months: u32,
) -> StressResult {
    let deflate = |value: f64| {
        value / (1.0 + scenario.inflation_adjustment).powf(f64::from(months) / 12.0)
    };

    if goal.is_met() {
        return StressResult {
            scenario: scenario.name.clone(),
            final_value: goal.current_amount,
            real_final_value: deflate(goal.current_amount),
            success_probability: 100.0,
            delay_months: Some(0),
            additional_contribution_needed: 0.0,
        };
    }

    let recovery_months = scenario.recovery_months();
    let mut value = goal.current_amount * (1.0 - scenario.market_decline);
    for month in 0..months {
        let m = f64::from(month);
        let rate = if m < recovery_months {
            base_rate * (m / recovery_months)
        } else {
            base_rate
        };
        value = value * (1.0 + rate) + goal.monthly_contribution;
    }

    let shortfall = goal.target_amount - value;
    let delay_months = if shortfall <= 0.0 {
        Some(0)
    } else if goal.monthly_contribution > 0.0 {
        let per_month = goal.monthly_contribution * (1.0 + base_rate);
        Some((shortfall / per_month).ceil() as u32)
    } else {
        None
    };

    StressResult {
        scenario: scenario.name.clone(),
        final_value: value,
        real_final_value: deflate(value),
        success_probability: if value >= goal.target_amount { 100.0 } else { 0.0 },
        delay_months,
        additional_contribution_needed: shortfall.max(0.0),
    }
}

/// Run every scenario in `scenarios` for a goal at `now`.
pub fn stress_test(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    scenarios: &[StressScenario],
    now: Date,
) -> Result<StressTestReport> {
    goal.validate()?;
    for scenario in scenarios {
        scenario.validate()?;
    }

    let months = goal.months_remaining(now);
    let base_rate = stress_base_rate(goal, assumptions);

    let results = scenarios
        .iter()
        .map(|s| evaluate_scenario(goal, s, base_rate, months))
        .collect();

    Ok(StressTestReport { results })
}
