//! Goal Builder DSL
//!
//! Fluent construction of [`Goal`] snapshots with per-category presets.
//!
//! ```ignore
//! let fund = GoalBuilder::emergency_fund("Rainy day")
//!     .target(15_000.0)
//!     .monthly(500.0)
//!     .by(2026, 12, 31)
//!     .build()?;
//! ```

use jiff::civil::Date;

use crate::date_math;
use crate::error::Result;
use crate::model::{
    Goal, GoalCategory, GoalId, GoalStatus, InvestmentStrategy, Priority, RiskTolerance,
};

/// Builder for [`Goal`]
#[derive(Debug, Clone)]
pub struct GoalBuilder {
    goal: Goal,
}

impl GoalBuilder {
    // =========================================================================
    // Category presets
    // =========================================================================

    /// Blank goal in `category`, due 12 months from today
    #[must_use]
    pub fn new(name: impl Into<String>, category: GoalCategory) -> Self {
        Self {
            goal: Goal {
                id: GoalId(0),
                name: name.into(),
                category,
                target_amount: 0.0,
                current_amount: 0.0,
                target_date: date_math::add_months(date_math::today(), 12),
                monthly_contribution: 0.0,
                automatic_contribution: false,
                investment_strategy: InvestmentStrategy::default(),
                risk_tolerance: RiskTolerance::default(),
                priority: Priority::default(),
                status: GoalStatus::default(),
            },
        }
    }

    /// Long-horizon retirement savings in index funds
    #[must_use]
    pub fn retirement(name: impl Into<String>) -> Self {
        Self::new(name, GoalCategory::Retirement)
            .strategy(InvestmentStrategy::IndexFunds)
            .priority(Priority::High)
    }

    /// Emergency reserve held in conservative bonds
    #[must_use]
    pub fn emergency_fund(name: impl Into<String>) -> Self {
        Self::new(name, GoalCategory::EmergencyFund)
            .strategy(InvestmentStrategy::ConservativeBonds)
            .risk(RiskTolerance::Conservative)
            .priority(Priority::Critical)
    }

    /// Down payment savings
    #[must_use]
    pub fn home_purchase(name: impl Into<String>) -> Self {
        Self::new(name, GoalCategory::HomePurchase)
            .strategy(InvestmentStrategy::BalancedPortfolio)
            .priority(Priority::High)
    }

    #[must_use]
    pub fn education(name: impl Into<String>) -> Self {
        Self::new(name, GoalCategory::Education).strategy(InvestmentStrategy::IndexFunds)
    }

    #[must_use]
    pub fn vacation(name: impl Into<String>) -> Self {
        Self::new(name, GoalCategory::Vacation)
            .strategy(InvestmentStrategy::ConservativeBonds)
            .risk(RiskTolerance::Conservative)
            .priority(Priority::Low)
    }

    #[must_use]
    pub fn wealth_building(name: impl Into<String>) -> Self {
        Self::new(name, GoalCategory::WealthBuilding)
            .strategy(InvestmentStrategy::GrowthStocks)
            .risk(RiskTolerance::Aggressive)
    }

    // =========================================================================
    // Field setters
    // =========================================================================

    #[must_use]
    pub fn id(mut self, id: u32) -> Self {
        self.goal.id = GoalId(id);
        self
    }

    #[must_use]
    pub fn target(mut self, amount: f64) -> Self {
        self.goal.target_amount = amount;
        self
    }

    #[must_use]
    pub fn current(mut self, amount: f64) -> Self {
        self.goal.current_amount = amount;
        self
    }

    #[must_use]
    pub fn monthly(mut self, amount: f64) -> Self {
        self.goal.monthly_contribution = amount;
        self
    }

    #[must_use]
    pub fn automatic(mut self) -> Self {
        self.goal.automatic_contribution = true;
        self
    }

    /// Target date from calendar components
    ///
    /// # Panics
    ///
    /// Panics if the components do not form a valid date.
    #[must_use]
    pub fn by(mut self, year: i16, month: i8, day: i8) -> Self {
        self.goal.target_date = jiff::civil::date(year, month, day);
        self
    }

    #[must_use]
    pub fn target_date(mut self, date: Date) -> Self {
        self.goal.target_date = date;
        self
    }

    /// Target date `months` 30-day months after `now`
    #[must_use]
    pub fn months_from(mut self, now: Date, months: u32) -> Self {
        self.goal.target_date = date_math::add_months(now, months);
        self
    }

    #[must_use]
    pub fn strategy(mut self, strategy: InvestmentStrategy) -> Self {
        self.goal.investment_strategy = strategy;
        self
    }

    #[must_use]
    pub fn risk(mut self, risk: RiskTolerance) -> Self {
        self.goal.risk_tolerance = risk;
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.goal.priority = priority;
        self
    }

    #[must_use]
    pub fn status(mut self, status: GoalStatus) -> Self {
        self.goal.status = status;
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Validate and return the goal
    pub fn build(self) -> Result<Goal> {
        self.goal.validate()?;
        Ok(self.goal)
    }
}
