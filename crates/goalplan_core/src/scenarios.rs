//! Macro-economic scenario analysis
//!
//! Each scenario scales the goal's strategy return (and optionally its
//! volatility, inflation and contribution growth), projects the value at the
//! target date and searches month by month for the date the target is
//! first reached.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;
use crate::error::{GoalError, Result};
use crate::model::{Goal, MarketAssumptions};
use crate::projection::future_value;

/// Completion search gives up after 50 years
pub const MAX_COMPLETION_MONTHS: u32 = 600;

/// A named macro scenario applied on top of the strategy return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroScenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Multiplier on the strategy's annual return
    pub return_multiplier: f64,
    /// Multiplier on the goal's risk volatility
    #[serde(default = "one")]
    pub volatility_multiplier: f64,
    /// Overrides the assumption table's inflation rate when set
    #[serde(default)]
    pub inflation_override: Option<f64>,
    /// Annual contribution growth reported for the scenario
    #[serde(default)]
    pub contribution_growth: Option<f64>,
    /// Relative weight of the scenario, in `[0, 1]`
    pub likelihood: f64,
}

fn one() -> f64 {
    1.0
}

impl MacroScenario {
    pub fn new(name: impl Into<String>, return_multiplier: f64, likelihood: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            return_multiplier,
            volatility_multiplier: 1.0,
            inflation_override: None,
            contribution_growth: None,
            likelihood,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn volatility(mut self, multiplier: f64) -> Self {
        self.volatility_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn inflation(mut self, rate: f64) -> Self {
        self.inflation_override = Some(rate);
        self
    }

    #[must_use]
    pub fn contribution_growth(mut self, rate: f64) -> Self {
        self.contribution_growth = Some(rate);
        self
    }

    pub fn bull() -> Self {
        Self::new("bull", 1.4, 0.25)
            .volatility(0.8)
            .describe("Strong economic growth with rising markets")
    }

    pub fn baseline() -> Self {
        Self::new("baseline", 1.0, 0.5).describe("Assumptions play out as expected")
    }

    pub fn bear() -> Self {
        Self::new("bear", 0.3, 0.15)
            .volatility(1.5)
            .describe("Extended market decline with high volatility")
    }

    pub fn stagflation() -> Self {
        Self::new("stagflation", 0.6, 0.20)
            .inflation(0.08)
            .contribution_growth(0.05)
            .describe("High inflation with slow growth")
    }

    /// The standard scenario table in reporting order
    pub fn defaults() -> Vec<Self> {
        vec![Self::bull(), Self::bear(), Self::stagflation()]
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
        if !self.return_multiplier.is_finite() || !self.volatility_multiplier.is_finite() {
            return invalid("multipliers must be finite");
        }
        if !(0.0..=1.0).contains(&self.likelihood) {
            return invalid("likelihood must be within [0, 1]");
        }
        if self.inflation_override.is_some_and(|r| !r.is_finite()) {
            return invalid("inflation override must be finite");
        }
        Ok(())
    }
}

/// Projection of a goal under one macro scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub scenario: String,
    pub annual_return: f64,
    pub volatility: f64,
    pub inflation_rate: f64,
    pub contribution_growth: f64,
    pub likelihood: f64,
    /// Value at the target date
    pub projected_amount: f64,
    /// `projected_amount` deflated by the scenario inflation
    pub real_projected_amount: f64,
    /// Months until the target is first reached, capped
    pub completion_months: u32,
    pub completion_date: Date,
    /// False when the search hit the cap without reaching the target
    pub reached_target: bool,
}

/// Months until `value` first reaches `target`, stepping with a constant
/// monthly rate and contribution. Returns the cap when never reached.
pub fn months_to_target(
    start: f64,
    contribution: f64,
    monthly_rate: f64,
    target: f64,
    cap: u32,
) -> (u32, bool) {
    let mut value = start;
    let mut months = 0;
    while value < target && months < cap {
        value = value * (1.0 + monthly_rate) + contribution;
        months += 1;
    }
    (months, value >= target)
}

/// Project a goal under a single scenario.
pub fn project_scenario(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    scenario: &MacroScenario,
    now: Date,
) -> ScenarioProjection {
    let months = goal.months_remaining(now);
    let annual_return = assumptions.strategy_return(goal.investment_strategy)
        * scenario.return_multiplier;
    let monthly_rate = annual_return / 12.0;
    let inflation_rate = scenario
        .inflation_override
        .unwrap_or(assumptions.inflation_rate);

    let projected_amount = future_value(
        goal.current_amount,
        goal.monthly_contribution,
        monthly_rate,
        months,
    );
    let (completion_months, reached_target) = months_to_target(
        goal.current_amount,
        goal.monthly_contribution,
        monthly_rate,
        goal.target_amount,
        MAX_COMPLETION_MONTHS,
    );

    ScenarioProjection {
        scenario: scenario.name.clone(),
        annual_return,
        volatility: assumptions.volatility(goal.risk_tolerance) * scenario.volatility_multiplier,
        inflation_rate,
        contribution_growth: scenario.contribution_growth.unwrap_or(0.0),
        likelihood: scenario.likelihood,
        projected_amount,
        real_projected_amount: projected_amount
            / (1.0 + inflation_rate).powf(f64::from(months) / 12.0),
        completion_months,
        completion_date: date_math::add_months(now, completion_months),
        reached_target,
    }
}

/// Project a goal under every scenario in the table.
pub fn analyze_scenarios(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    scenarios: &[MacroScenario],
    now: Date,
) -> Result<Vec<ScenarioProjection>> {
    goal.validate()?;
    for scenario in scenarios {
        scenario.validate()?;
    }
    Ok(scenarios
        .iter()
        .map(|s| project_scenario(goal, assumptions, s, now))
        .collect())
}
