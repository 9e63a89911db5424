//! Plan assembly and rendering

use std::fmt::{self, Write};

use clap::ValueEnum;
use color_eyre::eyre::eyre;
use goalplan_core::analytics::{self, GoalReport};
use goalplan_core::model::GoalId;
use goalplan_core::planning::{self, BudgetPlan, GoalConflict, ProgressSummary};
use jiff::civil::Date;
use serde::Serialize;

use crate::format::{
    format_compact_currency, format_currency, format_currency_short, format_delay,
    format_percentage,
};
use crate::input::GoalFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Conflicts found for one goal against the rest of the plan
#[derive(Debug, Clone, Serialize)]
pub struct GoalConflicts {
    pub goal_id: GoalId,
    pub conflicts: Vec<GoalConflict>,
}

/// Everything printed for one run
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub as_of: Date,
    pub goals: Vec<GoalReport>,
    pub conflicts: Vec<GoalConflicts>,
    pub resource_warning: Option<GoalConflict>,
    pub budget: BudgetPlan,
    pub summary: ProgressSummary,
}

/// Analyze the selected goals and the plan as a whole.
///
/// Budget, summary and conflict checks always consider every goal in the
/// file, even when `only` narrows the per-goal analysis.
pub fn build_report(
    file: &GoalFile,
    only: Option<GoalId>,
    now: Date,
) -> color_eyre::Result<PlanReport> {
    let selected = file.select(only)?;

    let mut goals = Vec::with_capacity(selected.len());
    for goal in &selected {
        let report = analytics::report(
            goal,
            &file.goals,
            &file.assumptions,
            &file.config,
            file.portfolio_value,
            now,
        )?;
        tracing::info!(
            goal = %goal.id,
            success = report.analytics.monte_carlo_probability,
            recommendations = report.recommendations.len(),
            "goal analyzed"
        );
        goals.push(report);
    }

    let conflicts = selected
        .iter()
        .map(|goal| GoalConflicts {
            goal_id: goal.id,
            conflicts: planning::check_goal_conflicts(goal, &file.goals, None),
        })
        .filter(|c| !c.conflicts.is_empty())
        .collect();

    let resource_warning = planning::resource_conflict(&file.goals, file.monthly_income);
    if let Some(warning) = &resource_warning {
        tracing::warn!("{}", warning.message);
    }

    Ok(PlanReport {
        as_of: now,
        goals,
        conflicts,
        resource_warning,
        budget: planning::allocate_budget(
            &file.goals,
            file.monthly_income,
            &file.assumptions,
            now,
        ),
        summary: planning::summarize(&file.goals),
    })
}

pub fn render(report: &PlanReport, format: OutputFormat) -> color_eyre::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Yaml => serde_saphyr::to_string(report)
            .map_err(|e| eyre!("failed to serialize report: {e}")),
    }
}

fn render_text(report: &PlanReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Goal plan as of {}", report.as_of)?;

    for goal in &report.goals {
        writeln!(out)?;
        write_goal(&mut out, goal)?;
    }

    if !report.conflicts.is_empty() || report.resource_warning.is_some() {
        writeln!(out)?;
        writeln!(out, "Conflicts")?;
        for entry in &report.conflicts {
            for c in &entry.conflicts {
                writeln!(out, "  goal {}: [{:?}] {}", entry.goal_id, c.severity, c.message)?;
            }
        }
        if let Some(w) = &report.resource_warning {
            writeln!(out, "  plan: [{:?}] {}", w.severity, w.message)?;
        }
    }

    let budget = &report.budget;
    writeln!(out)?;
    writeln!(
        out,
        "Monthly budget {} (currently committed {})",
        format_currency_short(budget.total_budget),
        format_currency_short(budget.current_utilization)
    )?;
    for a in &budget.allocations {
        writeln!(
            out,
            "  goal {:<4} {:>10} -> {:>10}  {}",
            a.goal_id,
            format_currency_short(a.current),
            format_currency_short(a.suggested),
            a.rationale
        )?;
    }
    for advice in &budget.advice {
        writeln!(out, "  * {advice}")?;
    }

    let s = &report.summary;
    writeln!(out)?;
    writeln!(
        out,
        "Summary: {} goals, {} completed, {} on track, {} of {} saved ({})",
        s.total_goals,
        s.completed_goals,
        s.on_track_goals,
        format_currency_short(s.total_current),
        format_currency_short(s.total_target),
        format_percentage(s.overall_progress / 100.0)
    )?;

    Ok(out)
}

fn write_goal(out: &mut String, report: &GoalReport) -> fmt::Result {
    let a = &report.analytics;
    writeln!(out, "Goal {}: {}", report.goal_id, report.goal_name)?;
    writeln!(
        out,
        "  Success       {} deterministic, {} Monte Carlo (seed {})",
        format_percentage(a.success_probability),
        format_percentage(a.monte_carlo_probability),
        a.seed
    )?;
    writeln!(
        out,
        "  Horizon       {} months, expected return {} ({} real)",
        a.months_remaining,
        format_percentage(a.expected_return),
        format_percentage(a.real_return)
    )?;
    writeln!(
        out,
        "  Required      {} / month",
        format_currency(a.required_monthly_contribution)
    )?;
    writeln!(
        out,
        "  Outcomes      P10 {}  median {}  P90 {}  mean {}",
        format_currency_short(a.confidence_interval.lower),
        format_currency_short(a.median_outcome),
        format_currency_short(a.confidence_interval.upper),
        format_currency_short(a.mean_outcome)
    )?;

    let v = &a.volatility_metrics;
    writeln!(
        out,
        "  Risk          sharpe {:.2}  sortino {:.2}  VaR95 {}  CVaR {}",
        v.sharpe_ratio,
        v.sortino_ratio,
        format_currency_short(v.value_at_risk_95),
        format_currency_short(v.conditional_var)
    )?;

    write!(out, "  Growth       ")?;
    for (years, value) in a.compound_growth_projection.yearly() {
        write!(out, " {years}y {}", format_compact_currency(value))?;
    }
    writeln!(
        out,
        "  final {}",
        format_compact_currency(a.compound_growth_projection.final_value)
    )?;

    let c = &a.completion_estimates;
    writeln!(
        out,
        "  Completion    best {}  median {}  worst {}",
        c.best_case, c.median, c.worst_case
    )?;

    writeln!(out, "  Stress tests")?;
    for r in a.stress_test_results.iter() {
        writeln!(
            out,
            "    {:<12} {:>12} {:>12}  {:<4} {}",
            r.scenario,
            format_currency_short(r.final_value),
            format_currency_short(r.real_final_value),
            if r.succeeded() { "pass" } else { "fail" },
            format_delay(r.delay_months)
        )?;
    }

    writeln!(out, "  Scenarios")?;
    for p in &report.scenarios {
        let completion = if p.reached_target {
            p.completion_date.to_string()
        } else {
            "not reached".to_string()
        };
        writeln!(
            out,
            "    {:<12} return {:>7}  {:>12}  completes {}",
            p.scenario,
            format_percentage(p.annual_return),
            format_currency_short(p.projected_amount),
            completion
        )?;
    }

    if !report.recommendations.is_empty() {
        writeln!(out, "  Recommendations")?;
        for r in &report.recommendations {
            writeln!(out, "    [{}] {}", r.priority, r.title)?;
            writeln!(out, "        {}", r.description)?;
        }
    }

    writeln!(out, "  Milestones")?;
    for m in &report.milestones {
        writeln!(
            out,
            "    [{}] {:<16} {:>12} by {}",
            if m.completed { "x" } else { " " },
            m.name,
            format_currency_short(m.target_amount),
            m.target_date
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalplan_core::config::EngineConfig;
    use goalplan_core::model::{Goal, GoalCategory};
    use goalplan_core::GoalBuilder;

    fn now() -> Date {
        jiff::civil::date(2025, 1, 1)
    }

    fn plan() -> GoalFile {
        let fund = GoalBuilder::emergency_fund("Rainy day")
            .id(1)
            .target(15_000.0)
            .current(6_000.0)
            .monthly(500.0)
            .months_from(now(), 18)
            .build()
            .unwrap();
        let house = GoalBuilder::home_purchase("House deposit")
            .id(2)
            .target(80_000.0)
            .current(12_000.0)
            .monthly(1_200.0)
            .months_from(now(), 48)
            .build()
            .unwrap();
        GoalFile {
            goals: vec![fund, house],
            config: EngineConfig::seeded(300, 11),
            monthly_income: Some(5_000.0),
            ..GoalFile::default()
        }
    }

    #[test]
    fn test_report_covers_every_goal() {
        let report = build_report(&plan(), None, now()).unwrap();

        assert_eq!(report.goals.len(), 2);
        assert_eq!(report.budget.allocations.len(), 2);
        assert_eq!(report.summary.total_goals, 2);
        // 1 700 committed against a 1 500 budget
        assert!(report.resource_warning.is_some());
        assert!(report.goals.iter().all(|g| g.analytics.seed == 11));
    }

    #[test]
    fn test_goal_filter_keeps_plan_totals() {
        let report = build_report(&plan(), Some(GoalId(2)), now()).unwrap();

        assert_eq!(report.goals.len(), 1);
        assert_eq!(report.goals[0].goal_name, "House deposit");
        assert_eq!(report.summary.total_goals, 2);

        assert!(build_report(&plan(), Some(GoalId(5)), now()).is_err());
    }

    #[test]
    fn test_same_category_critical_goals_are_flagged() {
        let mut file = plan();
        let second_fund = Goal {
            id: GoalId(3),
            name: "Car repairs".into(),
            ..file.goals[0].clone()
        };
        assert_eq!(second_fund.category, GoalCategory::EmergencyFund);
        file.goals.push(second_fund);

        let report = build_report(&file, Some(GoalId(1)), now()).unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].goal_id, GoalId(1));
        // same date and same category
        assert_eq!(report.conflicts[0].conflicts.len(), 2);
    }

    #[test]
    fn test_text_rendering() {
        let report = build_report(&plan(), None, now()).unwrap();
        let text = render(&report, OutputFormat::Text).unwrap();

        assert!(text.starts_with("Goal plan as of 2025-01-01"));
        assert!(text.contains("Goal 1: Rainy day"));
        assert!(text.contains("Goal 2: House deposit"));
        assert!(text.contains("Stress tests"));
        assert!(text.contains("depression"));
        assert!(text.contains("Monthly budget $1,500"));
        assert!(text.contains("Summary: 2 goals"));
    }

    #[test]
    fn test_structured_rendering() {
        let report = build_report(&plan(), Some(GoalId(1)), now()).unwrap();

        let json = render(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["as_of"], "2025-01-01");
        assert_eq!(value["goals"][0]["goal_id"], 1);
        assert_eq!(
            value["goals"][0]["analytics"]["stress_test_results"]
                .as_array()
                .map(Vec::len),
            Some(4)
        );

        let yaml = render(&report, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("as_of"));
        assert!(yaml.contains("Rainy day"));
    }
}
