//! Integration tests for the goal analytics engine
//!
//! Tests are organized by topic:
//! - `projection` - Closed-form growth and required contribution
//! - `monte_carlo` - Stochastic paths, seeding and percentiles
//! - `stress` - Deterministic shock scenarios
//! - `scenarios` - Macro scenario projections and completion search
//! - `recommendations` - Individual rules, ordering and the cap
//! - `analytics` - End-to-end orchestration
//! - `planning` - Milestones, conflicts and budget allocation

mod monte_carlo;
mod planning;
mod recommendations;

use jiff::civil::{Date, date};

use crate::date_math;
use crate::model::{
    Goal, GoalCategory, GoalId, GoalStatus, InvestmentStrategy, Priority, RiskTolerance,
};

/// Fixed "now" shared by the tests
pub(crate) fn now() -> Date {
    date(2025, 1, 1)
}

/// 25 000 target, 8 500 saved, 1 200 a month, due in 365 days
pub(crate) fn sample_goal() -> Goal {
    Goal {
        id: GoalId(1),
        name: "Emergency cushion".into(),
        category: GoalCategory::Vacation,
        target_amount: 25_000.0,
        current_amount: 8_500.0,
        target_date: date_math::add_days(now(), 365),
        monthly_contribution: 1_200.0,
        automatic_contribution: false,
        investment_strategy: InvestmentStrategy::ConservativeBonds,
        risk_tolerance: RiskTolerance::Moderate,
        priority: Priority::Medium,
        status: GoalStatus::OnTrack,
    }
}

/// Goal due `months` 30-day months from [`now`]
pub(crate) fn goal_due_in(months: u32) -> Goal {
    Goal {
        target_date: date_math::add_months(now(), months),
        ..sample_goal()
    }
}
