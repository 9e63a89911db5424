//! Multi-goal planning helpers
//!
//! Milestone schedules, conflict detection between goals, a heuristic split
//! of a monthly savings budget across goals and an aggregate progress
//! summary.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;
use crate::model::{
    Goal, GoalCategory, GoalId, GoalStatus, MarketAssumptions, Priority, RiskTolerance,
};

/// Share of monthly income treated as the savings budget
pub const SAVINGS_RATE_CAP: f64 = 0.30;
/// Budget used when income is unknown
pub const FALLBACK_MONTHLY_BUDGET: f64 = 5_000.0;
/// Critical goals whose target dates fall within this many months conflict
const TIMELINE_CONFLICT_MONTHS: f64 = 6.0;

// ============================================================================
// Milestones
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub name: String,
    /// Percentage of the target, 0-100
    pub percentage: u8,
    pub target_amount: f64,
    pub target_date: Date,
    pub completed: bool,
    pub reward: String,
}

/// Milestone percentages used for a category
pub fn milestone_percentages(category: GoalCategory) -> &'static [u8] {
    match category {
        GoalCategory::EmergencyFund => &[33, 66, 100],
        GoalCategory::Retirement => &[10, 25, 50, 75, 90],
        GoalCategory::HomePurchase => &[20, 40, 70, 85, 100],
        GoalCategory::Education => &[25, 50, 75, 90],
        GoalCategory::DebtPayoff => &[25, 50, 75, 100],
        GoalCategory::InvestmentMilestone => &[15, 35, 60, 80, 95],
        _ => &[25, 50, 75, 90],
    }
}

fn reward(percentage: u8) -> &'static str {
    match percentage {
        100.. => "Goal Achieved",
        75.. => "Almost There",
        50.. => "Halfway Hero",
        _ => "Great Start",
    }
}

/// Milestones spaced proportionally between `now` and the target date.
pub fn generate_milestones(goal: &Goal, now: Date) -> Vec<Milestone> {
    let days = date_math::days_between(now, goal.target_date).max(0);

    milestone_percentages(goal.category)
        .iter()
        .map(|&pct| {
            let fraction = f64::from(pct) / 100.0;
            let target_amount = goal.target_amount * fraction;
            Milestone {
                id: format!("{}-milestone-{pct}", goal.id),
                name: if pct == 100 {
                    "Goal Completed".to_string()
                } else {
                    format!("{pct}% Milestone")
                },
                percentage: pct,
                target_amount,
                target_date: date_math::add_days(now, (f64::from(days) * fraction).round() as i32),
                completed: goal.current_amount >= target_amount,
                reward: reward(pct).to_string(),
            }
        })
        .collect()
}

// ============================================================================
// Conflict detection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    /// Two critical goals due within six months of each other
    Timeline,
    /// Total contributions exceed the savings budget
    Resources,
    /// Two critical goals in the same category
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictSeverity {
    Conflict,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConflict {
    pub kind: ConflictKind,
    pub severity: ConflictSeverity,
    pub goal_id: Option<GoalId>,
    pub message: String,
}

/// Check a candidate goal against existing goals.
///
/// `monthly_income` enables the resource check; pass `None` when unknown.
pub fn check_goal_conflicts(
    candidate: &Goal,
    existing: &[Goal],
    monthly_income: Option<f64>,
) -> Vec<GoalConflict> {
    let mut conflicts = Vec::new();
    let others = existing.iter().filter(|g| g.id != candidate.id);

    for other in others.clone() {
        let both_critical =
            candidate.priority == Priority::Critical && other.priority == Priority::Critical;
        if !both_critical {
            continue;
        }

        let months_apart = f64::from(
            date_math::days_between(candidate.target_date, other.target_date).abs(),
        ) / f64::from(date_math::DAYS_PER_MONTH);
        if months_apart < TIMELINE_CONFLICT_MONTHS {
            conflicts.push(GoalConflict {
                kind: ConflictKind::Timeline,
                severity: ConflictSeverity::Conflict,
                goal_id: Some(other.id),
                message: format!(
                    "critical timeline conflict with \"{}\": both target similar dates",
                    other.name
                ),
            });
        }

        if candidate.category == other.category {
            conflicts.push(GoalConflict {
                kind: ConflictKind::Priority,
                severity: ConflictSeverity::Warning,
                goal_id: Some(other.id),
                message: format!(
                    "multiple critical {} goals may compete for resources",
                    candidate.category
                ),
            });
        }
    }

    let total = candidate.monthly_contribution
        + others.map(|g| g.monthly_contribution).sum::<f64>();
    conflicts.extend(commitment_warning(total, monthly_income));

    conflicts
}

/// Warning when the combined contributions of `goals` exceed the savings
/// budget. `None` when income is unknown.
pub fn resource_conflict(goals: &[Goal], monthly_income: Option<f64>) -> Option<GoalConflict> {
    commitment_warning(
        goals.iter().map(|g| g.monthly_contribution).sum(),
        monthly_income,
    )
}

fn commitment_warning(total: f64, monthly_income: Option<f64>) -> Option<GoalConflict> {
    let income = monthly_income.filter(|i| *i > 0.0)?;
    (total > income * SAVINGS_RATE_CAP).then(|| GoalConflict {
        kind: ConflictKind::Resources,
        severity: ConflictSeverity::Warning,
        goal_id: None,
        message: format!(
            "high savings commitment ({:.0}% of income), consider adjusting contributions",
            total / income * 100.0
        ),
    })
}

// ============================================================================
// Budget allocation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub goal_id: GoalId,
    pub current: f64,
    pub suggested: f64,
    pub score: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub total_budget: f64,
    pub current_utilization: f64,
    pub allocations: Vec<Allocation>,
    pub advice: Vec<String>,
}

fn priority_weight(priority: Priority) -> f64 {
    f64::from(priority.rank())
}

fn risk_adjustment(risk: RiskTolerance) -> f64 {
    match risk {
        RiskTolerance::UltraConservative => 0.8,
        RiskTolerance::Conservative => 0.9,
        RiskTolerance::Moderate | RiskTolerance::Unknown => 1.0,
        RiskTolerance::Aggressive => 1.15,
        RiskTolerance::UltraAggressive => 1.3,
    }
}

/// Weight of a goal in the budget split: priority, urgency, strategy return
/// and risk appetite multiplied together.
pub fn allocation_score(goal: &Goal, assumptions: &MarketAssumptions, now: Date) -> f64 {
    let months = goal.months_remaining(now).max(1);
    let urgency = (1.0 / f64::from(months)).max(0.1);
    priority_weight(goal.priority)
        * urgency
        * assumptions.strategy_return(goal.investment_strategy)
        * risk_adjustment(goal.risk_tolerance)
}

fn rationale(goal: &Goal, months: u32) -> &'static str {
    if goal.priority == Priority::Critical && months < 12 {
        "critical priority with a short timeline takes the largest share"
    } else if goal.risk_tolerance == RiskTolerance::Aggressive && months > 60 {
        "long timeline supports an aggressive growth strategy"
    } else if goal.category == GoalCategory::EmergencyFund {
        "emergency fund comes first for financial security"
    } else {
        "balanced share based on priority and timeline"
    }
}

fn global_advice(goals: &[Goal]) -> Vec<String> {
    let mut advice = Vec::new();
    if !goals.iter().any(|g| g.category == GoalCategory::EmergencyFund) {
        advice.push("Create an emergency fund goal for financial security".to_string());
    }
    if !goals.is_empty() && !goals.iter().any(|g| g.category == GoalCategory::Retirement) {
        advice.push("Add a retirement goal for long-term wealth building".to_string());
    }
    let urgent = goals
        .iter()
        .filter(|g| matches!(g.priority, Priority::Critical | Priority::High))
        .count();
    if urgent > 3 {
        advice.push("Reduce the number of high-priority goals to keep focus".to_string());
    }
    advice
}

/// Split the monthly savings budget across goals in proportion to
/// [`allocation_score`]. Suggested amounts are rounded to whole units.
pub fn allocate_budget(
    goals: &[Goal],
    monthly_income: Option<f64>,
    assumptions: &MarketAssumptions,
    now: Date,
) -> BudgetPlan {
    let total_budget = monthly_income
        .filter(|i| *i > 0.0)
        .map_or(FALLBACK_MONTHLY_BUDGET, |i| i * SAVINGS_RATE_CAP);

    let scores: Vec<f64> = goals
        .iter()
        .map(|g| allocation_score(g, assumptions, now).max(0.0))
        .collect();
    let total_score: f64 = scores.iter().sum();

    let allocations = goals
        .iter()
        .zip(&scores)
        .map(|(goal, &score)| {
            let share = if total_score > 0.0 {
                score / total_score
            } else {
                1.0 / goals.len() as f64
            };
            Allocation {
                goal_id: goal.id,
                current: goal.monthly_contribution,
                suggested: (share * total_budget).round(),
                score,
                rationale: rationale(goal, goal.months_remaining(now)).to_string(),
            }
        })
        .collect();

    BudgetPlan {
        total_budget,
        current_utilization: goals.iter().map(|g| g.monthly_contribution).sum(),
        allocations,
        advice: global_advice(goals),
    }
}

// ============================================================================
// Progress summary
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub on_track_goals: usize,
    pub total_target: f64,
    pub total_current: f64,
    pub total_monthly_contributions: f64,
    /// Saved as a percentage of all targets
    pub overall_progress: f64,
}

pub fn summarize(goals: &[Goal]) -> ProgressSummary {
    let total_target: f64 = goals.iter().map(|g| g.target_amount).sum();
    let total_current: f64 = goals.iter().map(|g| g.current_amount).sum();

    ProgressSummary {
        total_goals: goals.len(),
        completed_goals: goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count(),
        on_track_goals: goals
            .iter()
            .filter(|g| matches!(g.status, GoalStatus::OnTrack | GoalStatus::Ahead))
            .count(),
        total_target,
        total_current,
        total_monthly_contributions: goals.iter().map(|g| g.monthly_contribution).sum(),
        overall_progress: if total_target > 0.0 {
            total_current / total_target * 100.0
        } else {
            0.0
        },
    }
}
