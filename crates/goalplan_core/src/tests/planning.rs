//! Multi-goal planning tests

use super::{goal_due_in, now, sample_goal};
use crate::date_math;
use crate::model::{Goal, GoalCategory, GoalId, GoalStatus, MarketAssumptions, Priority};
use crate::planning::{
    self, ConflictKind, ConflictSeverity, FALLBACK_MONTHLY_BUDGET, allocate_budget,
    check_goal_conflicts, resource_conflict, summarize,
};

fn critical(id: u32, category: GoalCategory, months: u32) -> Goal {
    Goal {
        id: GoalId(id),
        category,
        priority: Priority::Critical,
        ..goal_due_in(months)
    }
}

#[test]
fn test_emergency_fund_milestones() {
    let goal = Goal {
        category: GoalCategory::EmergencyFund,
        target_amount: 9_000.0,
        current_amount: 3_000.0,
        target_date: date_math::add_days(now(), 300),
        ..sample_goal()
    };
    let milestones = planning::generate_milestones(&goal, now());

    let pct: Vec<u8> = milestones.iter().map(|m| m.percentage).collect();
    assert_eq!(pct, [33, 66, 100]);
    assert!((milestones[0].target_amount - 2_970.0).abs() < 1e-9);
    assert!(milestones[0].completed);
    assert!(!milestones[1].completed);
    assert_eq!(milestones[0].target_date, date_math::add_days(now(), 99));
    assert_eq!(milestones[2].target_date, goal.target_date);
    assert_eq!(milestones[2].name, "Goal Completed");
    assert_eq!(milestones[2].reward, "Goal Achieved");
    assert_eq!(milestones[0].id, "1-milestone-33");
}

#[test]
fn test_past_goal_milestones_land_on_now() {
    let goal = Goal {
        target_date: jiff::civil::date(2024, 1, 1),
        ..sample_goal()
    };
    assert!(
        planning::generate_milestones(&goal, now())
            .iter()
            .all(|m| m.target_date == now())
    );
}

#[test]
fn test_critical_goals_close_together_conflict() {
    let candidate = critical(1, GoalCategory::HomePurchase, 24);
    let existing = [
        critical(2, GoalCategory::Education, 27),
        critical(3, GoalCategory::Vacation, 40),
    ];
    let conflicts = check_goal_conflicts(&candidate, &existing, None);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Timeline);
    assert_eq!(conflicts[0].severity, ConflictSeverity::Conflict);
    assert_eq!(conflicts[0].goal_id, Some(GoalId(2)));
}

#[test]
fn test_same_category_critical_goals_warn() {
    let candidate = critical(1, GoalCategory::Retirement, 24);
    let existing = [critical(2, GoalCategory::Retirement, 120)];
    let conflicts = check_goal_conflicts(&candidate, &existing, None);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Priority);
    assert_eq!(conflicts[0].severity, ConflictSeverity::Warning);
}

#[test]
fn test_non_critical_goals_do_not_conflict() {
    let candidate = Goal {
        priority: Priority::High,
        ..critical(1, GoalCategory::Retirement, 24)
    };
    let existing = [critical(2, GoalCategory::Retirement, 24)];
    assert!(check_goal_conflicts(&candidate, &existing, None).is_empty());
}

#[test]
fn test_resource_warning_needs_income() {
    let candidate = sample_goal();
    let existing = [Goal {
        id: GoalId(2),
        ..sample_goal()
    }];

    // 2 400 of contributions against a 30% cap
    assert!(check_goal_conflicts(&candidate, &existing, None).is_empty());
    assert!(check_goal_conflicts(&candidate, &existing, Some(10_000.0)).is_empty());

    let conflicts = check_goal_conflicts(&candidate, &existing, Some(6_000.0));
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Resources);
    assert_eq!(conflicts[0].goal_id, None);
    assert!(conflicts[0].message.contains("40%"));
}

#[test]
fn test_plan_wide_resource_check() {
    let goals = [
        sample_goal(),
        Goal {
            id: GoalId(2),
            ..sample_goal()
        },
    ];
    assert!(resource_conflict(&goals, None).is_none());
    assert!(resource_conflict(&goals, Some(0.0)).is_none());
    assert!(resource_conflict(&goals, Some(9_000.0)).is_none());

    let warning = resource_conflict(&goals, Some(7_000.0)).unwrap();
    assert_eq!(warning.kind, ConflictKind::Resources);
    assert_eq!(warning.severity, ConflictSeverity::Warning);
}

#[test]
fn test_budget_split_favours_urgent_critical_goals() {
    let goals = [
        critical(1, GoalCategory::EmergencyFund, 6),
        Goal {
            id: GoalId(2),
            priority: Priority::Low,
            category: GoalCategory::Vacation,
            ..goal_due_in(120)
        },
    ];
    let plan = allocate_budget(&goals, Some(10_000.0), &MarketAssumptions::default(), now());

    assert_eq!(plan.total_budget, 3_000.0);
    assert_eq!(plan.current_utilization, 2_400.0);
    assert_eq!(plan.allocations.len(), 2);
    assert!(plan.allocations[0].suggested > plan.allocations[1].suggested);

    let total: f64 = plan.allocations.iter().map(|a| a.suggested).sum();
    assert!((total - 3_000.0).abs() <= 1.0);
    assert_eq!(
        plan.allocations[0].rationale,
        "critical priority with a short timeline takes the largest share"
    );
    assert!(
        plan.advice
            .iter()
            .any(|a| a.contains("retirement goal"))
    );
}

#[test]
fn test_budget_falls_back_without_income() {
    let plan = allocate_budget(
        &[sample_goal()],
        None,
        &MarketAssumptions::default(),
        now(),
    );
    assert_eq!(plan.total_budget, FALLBACK_MONTHLY_BUDGET);
    assert_eq!(plan.allocations[0].suggested, FALLBACK_MONTHLY_BUDGET);
    assert!(
        plan.advice
            .iter()
            .any(|a| a.contains("emergency fund"))
    );
}

#[test]
fn test_empty_plan() {
    let plan = allocate_budget(&[], Some(4_000.0), &MarketAssumptions::default(), now());
    assert!(plan.allocations.is_empty());
    assert_eq!(plan.current_utilization, 0.0);
}

#[test]
fn test_summary_counts() {
    let goals = [
        sample_goal(),
        Goal {
            id: GoalId(2),
            status: GoalStatus::Completed,
            current_amount: 25_000.0,
            ..sample_goal()
        },
        Goal {
            id: GoalId(3),
            status: GoalStatus::Ahead,
            ..sample_goal()
        },
        Goal {
            id: GoalId(4),
            status: GoalStatus::Behind,
            ..sample_goal()
        },
    ];
    let summary = summarize(&goals);

    assert_eq!(summary.total_goals, 4);
    assert_eq!(summary.completed_goals, 1);
    assert_eq!(summary.on_track_goals, 2);
    assert_eq!(summary.total_target, 100_000.0);
    assert_eq!(summary.total_current, 50_500.0);
    assert_eq!(summary.total_monthly_contributions, 4_800.0);
    assert!((summary.overall_progress - 50.5).abs() < 1e-9);

    assert_eq!(summarize(&[]).overall_progress, 0.0);
}
