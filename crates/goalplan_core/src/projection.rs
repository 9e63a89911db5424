//! Closed-form compound-interest projections
//!
//! All rates are monthly and compounding is monthly, with contributions
//! credited at the end of each month.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;
use crate::model::{Goal, GrowthProjection, MarketAssumptions};

/// Rates below this magnitude are treated as zero to avoid dividing by ~0
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Horizons (in months) reported by [`growth_projection`]
pub const PROJECTION_HORIZONS: [u32; 6] = [12, 36, 60, 120, 180, 240];

/// Future value of `principal` plus a level monthly contribution.
///
/// `FV = P(1+r)^n + c((1+r)^n - 1)/r`, or `P + c*n` when `r == 0`.
pub fn future_value(principal: f64, contribution: f64, monthly_rate: f64, months: u32) -> f64 {
    let n = months as f64;
    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        return principal + contribution * n;
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * growth + contribution * ((growth - 1.0) / monthly_rate)
}

/// Level monthly contribution that grows from zero to `remaining` over
/// `months` at `monthly_rate`.
///
/// Non-positive `remaining` needs nothing. With no positive rate or no time
/// left, the amount is simply spread over `max(months, 1)` months, so a zero
/// horizon makes the full remainder due at once.
pub fn required_monthly_contribution(remaining: f64, monthly_rate: f64, months: u32) -> f64 {
    if remaining <= 0.0 {
        return 0.0;
    }
    if monthly_rate > 0.0 && months > 0 {
        let factor = ((1.0 + monthly_rate).powi(months as i32) - 1.0) / monthly_rate;
        if factor > 0.0 {
            return remaining / factor;
        }
    }
    remaining / months.max(1) as f64
}

/// Deterministic success ratio `min(1, FV / target)`, exactly 1 once met.
pub fn deterministic_success(goal: &Goal, monthly_rate: f64, months: u32) -> f64 {
    if goal.is_met() {
        return 1.0;
    }
    let fv = future_value(
        goal.current_amount,
        goal.monthly_contribution,
        monthly_rate,
        months,
    );
    (fv / goal.target_amount).clamp(0.0, 1.0)
}

/// Portfolio value at 1, 3, 5, 10, 15 and 20 years and at the target date
pub fn growth_projection(goal: &Goal, monthly_rate: f64, months: u32) -> GrowthProjection {
    let fv = |n| future_value(goal.current_amount, goal.monthly_contribution, monthly_rate, n);
    let [y1, y3, y5, y10, y15, y20] = PROJECTION_HORIZONS;
    GrowthProjection {
        year1: fv(y1),
        year3: fv(y3),
        year5: fv(y5),
        year10: fv(y10),
        year15: fv(y15),
        year20: fv(y20),
        final_value: fv(months),
    }
}

/// Deterministic projection summary for one goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub months_remaining: u32,
    pub expected_annual_return: f64,
    pub monthly_rate: f64,
    pub projected_value: f64,
    pub success_probability: f64,
    pub required_monthly_contribution: f64,
    pub growth: GrowthProjection,
}

/// Run every closed-form calculation for a goal at `now`.
pub fn project(goal: &Goal, assumptions: &MarketAssumptions, now: Date) -> Projection {
    let months = goal.months_remaining(now);
    let annual = assumptions.expected_annual_return(goal);
    let monthly_rate = annual / 12.0;

    Projection {
        months_remaining: months,
        expected_annual_return: annual,
        monthly_rate,
        projected_value: future_value(
            goal.current_amount,
            goal.monthly_contribution,
            monthly_rate,
            months,
        ),
        success_probability: deterministic_success(goal, monthly_rate, months),
        required_monthly_contribution: required_monthly_contribution(
            goal.remaining_amount(),
            monthly_rate,
            months,
        ),
        growth: growth_projection(goal, monthly_rate, months),
    }
}

/// One sample of a goal's projected path, for charting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub month: u32,
    pub date: Date,
    /// Savings with contributions only, no growth
    pub linear: f64,
    /// Savings with monthly compounding
    pub compound: f64,
    /// Straight line from the current amount to the target
    pub target: f64,
}

/// Sample the linear, compound and target paths every `step_months`
/// months. The final month is always included.
pub fn trajectory(
    goal: &Goal,
    assumptions: &MarketAssumptions,
    now: Date,
    step_months: u32,
) -> Vec<TrajectoryPoint> {
    let months = goal.months_remaining(now);
    let monthly_rate = assumptions.effective_monthly_rate(goal);
    let step = step_months.max(1) as usize;

    let point = |month: u32| {
        let target = if months == 0 {
            goal.target_amount
        } else {
            goal.current_amount
                + (goal.target_amount - goal.current_amount) * month as f64 / months as f64
        };
        TrajectoryPoint {
            month,
            date: date_math::add_months(now, month),
            linear: goal.current_amount + goal.monthly_contribution * month as f64,
            compound: future_value(
                goal.current_amount,
                goal.monthly_contribution,
                monthly_rate,
                month,
            ),
            target,
        }
    };

    let mut points: Vec<_> = (0..=months).step_by(step).map(point).collect();
    if points.last().is_some_and(|p| p.month != months) {
        points.push(point(months));
    }
    points
}
