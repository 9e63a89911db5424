//! Recommendation rule tests

use super::{goal_due_in, now, sample_goal};
use crate::model::{
    AnalyticsResult, CompletionEstimates, ConfidenceInterval, Goal, GoalCategory, GoalId,
    GoalStatus, GrowthProjection, InvestmentStrategy, MarketAssumptions, Priority,
    RecommendationKind, RiskTolerance, ScenarioAnalysis, ScenarioOutcome, VolatilityMetrics,
};
use crate::recommendations::{
    RecommendationContext, RecommendationMode, RecommendationOptions, Rule, recommend,
};
use crate::stress::StressTestReport;

/// Analytics with the three fields the rules read set explicitly
fn analytics(success: f64, required: f64, months: u32) -> AnalyticsResult {
    let outcome = ScenarioOutcome {
        completion: now(),
        probability: 0.5,
        final_amount: 0.0,
    };
    AnalyticsResult {
        success_probability: success,
        monte_carlo_probability: success,
        confidence_interval: ConfidenceInterval {
            lower: 0.0,
            upper: 0.0,
        },
        median_outcome: 0.0,
        mean_outcome: 0.0,
        required_monthly_contribution: required,
        compound_growth_projection: GrowthProjection::default(),
        volatility_metrics: VolatilityMetrics::default(),
        stress_test_results: StressTestReport::default(),
        scenario_analysis: ScenarioAnalysis {
            optimistic: outcome,
            realistic: outcome,
            pessimistic: outcome,
        },
        completion_estimates: CompletionEstimates {
            best_case: now(),
            median: now(),
            worst_case: now(),
        },
        months_remaining: months,
        expected_return: 0.07,
        real_return: 0.04,
        efficiency_score: 0.0,
        seed: 0,
    }
}

/// Goal that trips no analytics-free rule
fn quiet_goal() -> Goal {
    Goal {
        automatic_contribution: true,
        category: GoalCategory::EmergencyFund,
        ..sample_goal()
    }
}

fn fires(
    rule: Rule,
    goal: &Goal,
    a: Option<&AnalyticsResult>,
    peers: &[Goal],
    portfolio: f64,
) -> bool {
    let assumptions = MarketAssumptions::default();
    let mut ctx = RecommendationContext::new(goal, &assumptions)
        .with_peers(peers)
        .with_portfolio_value(portfolio);
    if let Some(a) = a {
        ctx = ctx.with_analytics(a);
    }
    rule.evaluate(&ctx).is_some()
}

#[test]
fn test_quiet_goal_gets_nothing() {
    let goal = quiet_goal();
    let a = analytics(0.8, 1_000.0, 13);
    let assumptions = MarketAssumptions::default();
    let ctx = RecommendationContext::new(&goal, &assumptions).with_analytics(&a);
    assert!(recommend(&ctx, &RecommendationOptions::default()).is_empty());
}

#[test]
fn test_contribution_shortfall() {
    let goal = quiet_goal();
    let assumptions = MarketAssumptions::default();

    // within 15% of the current 1 200
    let a = analytics(0.5, 1_300.0, 13);
    assert!(!fires(Rule::ContributionShortfall, &goal, Some(&a), &[], 0.0));

    let a = analytics(0.5, 1_500.0, 13);
    let ctx = RecommendationContext::new(&goal, &assumptions).with_analytics(&a);
    let rec = Rule::ContributionShortfall.evaluate(&ctx).unwrap();
    assert_eq!(rec.priority, Priority::Critical);
    assert!(rec.action_required);
    assert!(!rec.dismissible);
    assert_eq!(rec.kind, RecommendationKind::ContributionIncrease);
    assert_eq!(rec.id, "1-contribution-shortfall");

    let a = analytics(0.7, 1_500.0, 13);
    let ctx = RecommendationContext::new(&goal, &assumptions).with_analytics(&a);
    let rec = Rule::ContributionShortfall.evaluate(&ctx).unwrap();
    assert_eq!(rec.priority, Priority::High);
    assert!(!rec.action_required);

    assert!(!fires(Rule::ContributionShortfall, &goal, None, &[], 0.0));
}

#[test]
fn test_strategy_upgrade() {
    let goal = Goal {
        category: GoalCategory::Retirement,
        investment_strategy: InvestmentStrategy::ConservativeBonds,
        ..goal_due_in(240)
    };
    assert!(fires(Rule::StrategyUpgrade, &goal, Some(&analytics(0.8, 0.0, 240)), &[], 0.0));
    assert!(!fires(Rule::StrategyUpgrade, &goal, Some(&analytics(0.8, 0.0, 100)), &[], 0.0));
    assert!(!fires(Rule::StrategyUpgrade, &goal, None, &[], 0.0));

    let growth = Goal {
        investment_strategy: InvestmentStrategy::GrowthStocks,
        ..goal
    };
    assert!(!fires(Rule::StrategyUpgrade, &growth, Some(&analytics(0.8, 0.0, 240)), &[], 0.0));
}

#[test]
fn test_tax_optimization_estimates_savings() {
    let goal = Goal {
        category: GoalCategory::Retirement,
        monthly_contribution: 1_500.0,
        ..sample_goal()
    };
    let assumptions = MarketAssumptions::default();
    let ctx = RecommendationContext::new(&goal, &assumptions);
    let rec = Rule::TaxOptimization.evaluate(&ctx).unwrap();

    assert!((rec.estimated_impact.cost_savings - 3_960.0).abs() < 1e-9);
    assert!(rec.action_required);
    assert_eq!(rec.priority, Priority::High);

    let small = Goal {
        monthly_contribution: 1_000.0,
        ..goal
    };
    assert!(!fires(Rule::TaxOptimization, &small, None, &[], 0.0));
}

#[test]
fn test_automation() {
    let manual = Goal {
        automatic_contribution: false,
        ..quiet_goal()
    };
    assert!(fires(Rule::Automation, &manual, None, &[], 0.0));
    assert!(!fires(Rule::Automation, &quiet_goal(), None, &[], 0.0));

    let idle = Goal {
        monthly_contribution: 0.0,
        ..manual
    };
    assert!(!fires(Rule::Automation, &idle, None, &[], 0.0));
}

#[test]
fn test_emergency_fund_checks_peers() {
    let goal = Goal {
        category: GoalCategory::Vacation,
        ..quiet_goal()
    };
    let fund = |current: f64| Goal {
        id: GoalId(2),
        category: GoalCategory::EmergencyFund,
        target_amount: 10_000.0,
        current_amount: current,
        ..sample_goal()
    };

    assert!(fires(Rule::EmergencyFund, &goal, None, &[], 0.0));
    assert!(fires(Rule::EmergencyFund, &goal, None, &[fund(4_000.0)], 0.0));
    assert!(!fires(Rule::EmergencyFund, &goal, None, &[fund(6_000.0)], 0.0));
    assert!(!fires(Rule::EmergencyFund, &quiet_goal(), None, &[], 0.0));

    let assumptions = MarketAssumptions::default();
    let rec = Rule::EmergencyFund
        .evaluate(&RecommendationContext::new(&goal, &assumptions))
        .unwrap();
    assert_eq!(rec.kind, RecommendationKind::RiskAdjustment);
    assert_eq!(rec.priority, Priority::Critical);
}

#[test]
fn test_timeline_extension() {
    let goal = quiet_goal();
    let assumptions = MarketAssumptions::default();
    let a = analytics(0.5, 1_000.0, 30);
    let ctx = RecommendationContext::new(&goal, &assumptions).with_analytics(&a);
    let rec = Rule::TimelineExtension.evaluate(&ctx).unwrap();

    assert_eq!(rec.estimated_impact.time_reduction, -6.0);
    assert!(rec.description.contains("36-month"));

    assert!(!fires(Rule::TimelineExtension, &goal, Some(&analytics(0.5, 0.0, 12)), &[], 0.0));
    assert!(!fires(Rule::TimelineExtension, &goal, Some(&analytics(0.8, 0.0, 30)), &[], 0.0));
}

#[test]
fn test_yield_opportunity() {
    let goal = Goal {
        risk_tolerance: RiskTolerance::Aggressive,
        investment_strategy: InvestmentStrategy::IndexFunds,
        ..quiet_goal()
    };
    assert!(fires(Rule::YieldOpportunity, &goal, None, &[], 60_000.0));
    assert!(!fires(Rule::YieldOpportunity, &goal, None, &[], 40_000.0));

    let crypto = Goal {
        investment_strategy: InvestmentStrategy::CryptoDiversified,
        ..goal.clone()
    };
    assert!(!fires(Rule::YieldOpportunity, &crypto, None, &[], 60_000.0));

    let moderate = Goal {
        risk_tolerance: RiskTolerance::Moderate,
        ..goal
    };
    assert!(!fires(Rule::YieldOpportunity, &moderate, None, &[], 60_000.0));
}

#[test]
fn test_consolidation_lists_related_goals() {
    let goal = quiet_goal();
    let twin = Goal {
        id: GoalId(7),
        ..quiet_goal()
    };
    let paused = Goal {
        id: GoalId(8),
        status: GoalStatus::Paused,
        ..quiet_goal()
    };
    let assumptions = MarketAssumptions::default();

    // the goal itself in the peer list is ignored
    let alone = [goal.clone(), paused.clone()];
    assert!(!fires(Rule::Consolidation, &goal, None, &alone, 0.0));

    let peers = [goal.clone(), twin, paused];
    let ctx = RecommendationContext::new(&goal, &assumptions).with_peers(&peers);
    let rec = Rule::Consolidation.evaluate(&ctx).unwrap();
    assert_eq!(rec.related_goals, [GoalId(7)]);
    assert_eq!(rec.kind, RecommendationKind::TaxOptimization);
    assert_eq!(rec.priority, Priority::Low);
}

#[test]
fn test_de_risking() {
    let near = Goal {
        current_amount: 22_000.0,
        ..quiet_goal()
    };
    assert!(fires(Rule::DeRisking, &near, Some(&analytics(0.9, 0.0, 13)), &[], 0.0));
    assert!(!fires(Rule::DeRisking, &near, Some(&analytics(0.8, 0.0, 13)), &[], 0.0));
    assert!(!fires(Rule::DeRisking, &quiet_goal(), Some(&analytics(0.9, 0.0, 13)), &[], 0.0));
    assert!(!fires(Rule::DeRisking, &near, None, &[], 0.0));
}

#[test]
fn test_high_net_worth_referral() {
    let big = Goal {
        target_amount: 600_000.0,
        ..quiet_goal()
    };
    assert!(fires(Rule::HighNetWorthReferral, &big, None, &[], 0.0));
    assert!(fires(Rule::HighNetWorthReferral, &quiet_goal(), None, &[], 1_500_000.0));
    assert!(!fires(Rule::HighNetWorthReferral, &quiet_goal(), None, &[], 900_000.0));
}

/// Retirement goal that trips every rule except de-risking and consolidation
fn busy_goal() -> Goal {
    Goal {
        category: GoalCategory::Retirement,
        target_amount: 900_000.0,
        current_amount: 10_000.0,
        monthly_contribution: 1_500.0,
        automatic_contribution: false,
        investment_strategy: InvestmentStrategy::ConservativeBonds,
        risk_tolerance: RiskTolerance::Aggressive,
        ..goal_due_in(240)
    }
}

#[test]
fn test_results_are_capped_and_ordered() {
    let goal = busy_goal();
    let assumptions = MarketAssumptions::default();
    let a = analytics(0.3, 5_000.0, 240);
    let ctx = RecommendationContext::new(&goal, &assumptions)
        .with_analytics(&a)
        .with_portfolio_value(80_000.0);

    let fired = Rule::ALL.iter().filter(|r| r.evaluate(&ctx).is_some()).count();
    assert_eq!(fired, 8);

    let recs = recommend(&ctx, &RecommendationOptions::default());
    assert_eq!(recs.len(), 6);
    assert!(recs.windows(2).all(|w| w[0].priority.rank() >= w[1].priority.rank()));
    // no low-priority rule survives the cap
    assert!(recs.iter().all(|r| r.priority != Priority::Low));
}

#[test]
fn test_equal_priorities_keep_rule_order() {
    let goal = busy_goal();
    let assumptions = MarketAssumptions::default();
    let a = analytics(0.3, 5_000.0, 240);
    let ctx = RecommendationContext::new(&goal, &assumptions)
        .with_analytics(&a)
        .with_portfolio_value(80_000.0);
    let options = RecommendationOptions {
        max_recommendations: 20,
        ..RecommendationOptions::default()
    };

    let ids: Vec<_> = recommend(&ctx, &options).into_iter().map(|r| r.id).collect();
    assert_eq!(
        ids,
        [
            "1-contribution-shortfall",
            "1-emergency-fund",
            "1-strategy-upgrade",
            "1-tax-optimization",
            "1-automation",
            "1-timeline-extension",
            "1-wealth-consultation",
            "1-yield-opportunity",
        ]
    );
}

#[test]
fn test_static_fallback() {
    let goal = busy_goal();
    let assumptions = MarketAssumptions::default();
    let a = analytics(0.3, 5_000.0, 240);

    let fallback = RecommendationOptions {
        mode: RecommendationMode::StaticFallback,
        ..RecommendationOptions::default()
    };
    let ctx = RecommendationContext::new(&goal, &assumptions).with_analytics(&a);
    let recs = recommend(&ctx, &fallback);
    let ids: Vec<_> = recs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["1-contribution-review", "1-diversification"]);

    // live mode without analytics degrades to the same advice
    let bare = RecommendationContext::new(&goal, &assumptions);
    assert_eq!(recommend(&bare, &RecommendationOptions::default()), recs);
}
