//! Rule-based advisory recommendations
//!
//! Every [`Rule`] inspects the goal, its analytics and its sibling goals
//! independently. Results are stably sorted by priority, so rules of equal
//! priority keep their declaration order, and then truncated.

use serde::{Deserialize, Serialize};

use crate::model::{
    AnalyticsResult, EstimatedImpact, Goal, GoalCategory, GoalId, GoalStatus, InvestmentStrategy,
    MarketAssumptions, Priority, Recommendation, RecommendationKind, RiskTolerance,
};

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 6;

/// Ratio of required to actual contribution that triggers a shortfall
const SHORTFALL_TOLERANCE: f64 = 1.15;
/// Marginal tax rate assumed for tax-advantaged savings estimates
const ASSUMED_TAX_RATE: f64 = 0.22;
/// Horizon multiplier proposed by the timeline rule
const TIMELINE_EXTENSION: f64 = 1.2;

/// Whether recommendations are derived from analytics or a fixed fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationMode {
    #[default]
    Live,
    /// Generic advice for when analytics are unavailable
    StaticFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationOptions {
    pub mode: RecommendationMode,
    pub max_recommendations: usize,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            mode: RecommendationMode::Live,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

/// Everything the rules may look at
#[derive(Debug, Clone, Copy)]
pub struct RecommendationContext<'a> {
    pub goal: &'a Goal,
    pub assumptions: &'a MarketAssumptions,
    pub analytics: Option<&'a AnalyticsResult>,
    /// Other goals owned by the same user. May include `goal` itself.
    pub peer_goals: &'a [Goal],
    /// Total value of the user's portfolio, 0 when unknown
    pub portfolio_value: f64,
}

impl<'a> RecommendationContext<'a> {
    pub fn new(goal: &'a Goal, assumptions: &'a MarketAssumptions) -> Self {
        Self {
            goal,
            assumptions,
            analytics: None,
            peer_goals: &[],
            portfolio_value: 0.0,
        }
    }

    #[must_use]
    pub fn with_analytics(mut self, analytics: &'a AnalyticsResult) -> Self {
        self.analytics = Some(analytics);
        self
    }

    #[must_use]
    pub fn with_peers(mut self, peer_goals: &'a [Goal]) -> Self {
        self.peer_goals = peer_goals;
        self
    }

    #[must_use]
    pub fn with_portfolio_value(mut self, value: f64) -> Self {
        self.portfolio_value = value;
        self
    }

    fn peers(&self) -> impl Iterator<Item = &'a Goal> + '_ {
        let id = self.goal.id;
        self.peer_goals.iter().filter(move |g| g.id != id)
    }
}

/// Recommendation rules in declaration (tie-break) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    ContributionShortfall,
    StrategyUpgrade,
    TaxOptimization,
    Automation,
    EmergencyFund,
    TimelineExtension,
    YieldOpportunity,
    Consolidation,
    DeRisking,
    HighNetWorthReferral,
}

impl Rule {
    pub const ALL: [Rule; 10] = [
        Rule::ContributionShortfall,
        Rule::StrategyUpgrade,
        Rule::TaxOptimization,
        Rule::Automation,
        Rule::EmergencyFund,
        Rule::TimelineExtension,
        Rule::YieldOpportunity,
        Rule::Consolidation,
        Rule::DeRisking,
        Rule::HighNetWorthReferral,
    ];

    /// Identifier suffix shared by every recommendation this rule emits
    pub fn slug(self) -> &'static str {
        match self {
            Rule::ContributionShortfall => "contribution-shortfall",
            Rule::StrategyUpgrade => "strategy-upgrade",
            Rule::TaxOptimization => "tax-optimization",
            Rule::Automation => "automation",
            Rule::EmergencyFund => "emergency-fund",
            Rule::TimelineExtension => "timeline-extension",
            Rule::YieldOpportunity => "yield-opportunity",
            Rule::Consolidation => "consolidation",
            Rule::DeRisking => "de-risking",
            Rule::HighNetWorthReferral => "wealth-consultation",
        }
    }

    /// Evaluate the rule. Rules that need analytics never fire without them.
    pub fn evaluate(self, ctx: &RecommendationContext<'_>) -> Option<Recommendation> {
        let goal = ctx.goal;
        let months = ctx.analytics.map(|a| a.months_remaining);
        let draft = Draft::new(goal, self);

        match self {
            Rule::ContributionShortfall => {
                let a = ctx.analytics?;
                let required = a.required_monthly_contribution;
                if required <= goal.monthly_contribution * SHORTFALL_TOLERANCE {
                    return None;
                }
                let shortfall = required - goal.monthly_contribution;
                let critical = a.success_probability < 0.6;
                Some(
                    draft
                        .kind(RecommendationKind::ContributionIncrease)
                        .priority(if critical { Priority::Critical } else { Priority::High })
                        .title("Contribution Optimization Required")
                        .description(format!(
                            "Increase your monthly contribution by {shortfall:.2} to {required:.2} \
                             to reach the target on time."
                        ))
                        .confidence(0.92)
                        .action_required(critical)
                        .dismissible(false)
                        .impact(EstimatedImpact {
                            time_reduction: (f64::from(a.months_remaining) * 0.25).round(),
                            probability_increase: 0.25,
                            ..Default::default()
                        })
                        .steps(&[
                            "Review the current monthly budget",
                            "Identify extra income or expenses to cut",
                            "Schedule the higher contribution",
                            "Check progress and adjust each quarter",
                        ])
                        .build(),
                )
            }
            Rule::StrategyUpgrade => {
                let strategy_return = ctx.assumptions.strategy_return(goal.investment_strategy);
                let eligible = goal.category == GoalCategory::Retirement
                    && strategy_return < 0.08
                    && months? > 120;
                eligible.then(|| {
                    draft
                        .kind(RecommendationKind::PortfolioAdjustment)
                        .priority(Priority::High)
                        .title("Enhanced Investment Strategy")
                        .description(
                            "A retirement horizon over ten years can carry a growth-oriented \
                             strategy with a higher expected return.",
                        )
                        .confidence(0.85)
                        .impact(EstimatedImpact {
                            cost_savings: goal.monthly_contribution * 60.0,
                            additional_return: 0.08 - strategy_return,
                            ..Default::default()
                        })
                        .steps(&[
                            "Reassess risk tolerance against the timeline",
                            "Compare growth-oriented allocations",
                            "Shift the allocation gradually",
                            "Rebalance quarterly",
                        ])
                        .build()
                })
            }
            Rule::TaxOptimization => {
                let eligible =
                    goal.category == GoalCategory::Retirement && goal.monthly_contribution > 1000.0;
                eligible.then(|| {
                    let savings = goal.monthly_contribution * 12.0 * ASSUMED_TAX_RATE;
                    draft
                        .kind(RecommendationKind::TaxOptimization)
                        .priority(Priority::High)
                        .title("Maximize Tax-Advantaged Accounts")
                        .description(format!(
                            "Routing contributions through tax-advantaged accounts could save \
                             about {savings:.0} a year."
                        ))
                        .confidence(0.95)
                        .action_required(true)
                        .dismissible(false)
                        .impact(EstimatedImpact {
                            cost_savings: savings,
                            ..Default::default()
                        })
                        .steps(&[
                            "Review current tax-advantaged account usage",
                            "Split contributions between pre-tax and post-tax accounts",
                            "Capture any employer match",
                            "Automate the tax-advantaged contributions",
                        ])
                        .build()
                })
            }
            Rule::Automation => {
                let eligible = !goal.automatic_contribution && goal.monthly_contribution > 0.0;
                eligible.then(|| {
                    draft
                        .kind(RecommendationKind::Automation)
                        .priority(Priority::Medium)
                        .title("Enable Automated Investing")
                        .description(
                            "Schedule the monthly contribution automatically so no month is \
                             missed.",
                        )
                        .confidence(0.88)
                        .impact(EstimatedImpact {
                            probability_increase: 0.23,
                            ..Default::default()
                        })
                        .steps(&[
                            "Link a funding account",
                            "Create a recurring monthly transfer",
                            "Set the investment allocation for new money",
                            "Enable alerts for failed transfers",
                        ])
                        .build()
                })
            }
            Rule::EmergencyFund => {
                if goal.category == GoalCategory::EmergencyFund {
                    return None;
                }
                let funded = ctx
                    .peers()
                    .any(|g| g.category == GoalCategory::EmergencyFund && g.progress() >= 0.5);
                (!funded).then(|| {
                    draft
                        .kind(RecommendationKind::RiskAdjustment)
                        .priority(Priority::Critical)
                        .title("Prioritize Emergency Fund")
                        .description(
                            "Build an emergency fund first so an unexpected expense does not \
                             force selling investments.",
                        )
                        .confidence(0.95)
                        .action_required(true)
                        .dismissible(false)
                        .impact(EstimatedImpact {
                            probability_increase: 0.30,
                            ..Default::default()
                        })
                        .steps(&[
                            "Total three to six months of essential expenses",
                            "Open a high-yield savings account",
                            "Automate contributions to it",
                            "Fund it before other goals",
                        ])
                        .build()
                })
            }
            Rule::TimelineExtension => {
                let a = ctx.analytics?;
                let months = a.months_remaining;
                if !(a.success_probability < 0.75 && months > 12) {
                    return None;
                }
                let extended = (f64::from(months) * TIMELINE_EXTENSION).ceil() as u32;
                let extra = extended - months;
                let relief =
                    ((a.required_monthly_contribution - goal.monthly_contribution) * 0.6).max(0.0);
                Some(
                    draft
                        .kind(RecommendationKind::TimelineExtension)
                        .priority(Priority::Medium)
                        .title("Timeline Optimization")
                        .description(format!(
                            "Extending the target date by {extra} months to a {extended}-month \
                             horizon lowers the required contribution."
                        ))
                        .confidence(0.80)
                        .impact(EstimatedImpact {
                            time_reduction: -f64::from(extra),
                            cost_savings: relief * 12.0,
                            probability_increase: 0.20,
                            ..Default::default()
                        })
                        .steps(&[
                            "Check whether the current date is feasible",
                            "Recalculate the required contribution",
                            "Move the target date",
                            "Update the contribution schedule",
                        ])
                        .build(),
                )
            }
            Rule::YieldOpportunity => {
                let eligible = ctx.portfolio_value > 50_000.0
                    && goal.risk_tolerance == RiskTolerance::Aggressive
                    && goal.investment_strategy != InvestmentStrategy::CryptoDiversified;
                eligible.then(|| {
                    draft
                        .kind(RecommendationKind::Opportunity)
                        .priority(Priority::Low)
                        .title("Yield Enhancement")
                        .description(
                            "A 5-15% allocation to diversified yield strategies may lift \
                             returns for an aggressive profile.",
                        )
                        .confidence(0.65)
                        .impact(EstimatedImpact {
                            additional_return: 0.03,
                            ..Default::default()
                        })
                        .steps(&[
                            "Research established yield protocols",
                            "Size the allocation against risk tolerance",
                            "Start with 2-5%",
                            "Scale up gradually",
                        ])
                        .build()
                })
            }
            Rule::Consolidation => {
                let similar: Vec<_> = ctx
                    .peers()
                    .filter(|g| g.category == goal.category && g.status == GoalStatus::OnTrack)
                    .map(|g| g.id)
                    .collect();
                if similar.is_empty() {
                    return None;
                }
                let count = similar.len() + 1;
                Some(
                    draft
                        .kind(RecommendationKind::TaxOptimization)
                        .priority(Priority::Low)
                        .title("Goal Consolidation Opportunity")
                        .description(format!(
                            "You have {count} {} goals. Consolidating them simplifies tracking \
                             and may lower fees.",
                            goal.category
                        ))
                        .confidence(0.70)
                        .impact(EstimatedImpact {
                            cost_savings: 500.0,
                            ..Default::default()
                        })
                        .steps(&[
                            "List goals in the same category",
                            "Compare their timelines and priorities",
                            "Weigh savings against flexibility",
                            "Merge compatible goals",
                        ])
                        .related(similar)
                        .build(),
                )
            }
            Rule::DeRisking => {
                let a = ctx.analytics?;
                let eligible = a.success_probability > 0.85
                    && goal.current_amount > goal.target_amount * 0.8;
                eligible.then(|| {
                    draft
                        .kind(RecommendationKind::Rebalancing)
                        .priority(Priority::Medium)
                        .title("Portfolio De-risking Opportunity")
                        .description(
                            "You are close to the target. Shift gradually toward conservative \
                             holdings to protect gains.",
                        )
                        .confidence(0.85)
                        .impact(EstimatedImpact {
                            probability_increase: 0.10,
                            ..Default::default()
                        })
                        .steps(&[
                            "Review the current allocation",
                            "Plan a glide path to the target date",
                            "Move from growth to income holdings in steps",
                            "Revisit after large market moves",
                        ])
                        .build()
                })
            }
            Rule::HighNetWorthReferral => {
                let eligible =
                    goal.target_amount > 500_000.0 || ctx.portfolio_value > 1_000_000.0;
                eligible.then(|| {
                    draft
                        .kind(RecommendationKind::Opportunity)
                        .priority(Priority::Medium)
                        .title("Wealth Management Consultation")
                        .description(
                            "Goals of this size benefit from a personalised review of tax, \
                             estate and allocation strategy.",
                        )
                        .confidence(0.90)
                        .impact(EstimatedImpact {
                            cost_savings: 10_000.0,
                            ..Default::default()
                        })
                        .steps(&[
                            "Summarise current holdings and goals",
                            "Book an initial consultation",
                            "Discuss advanced strategies",
                            "Apply the agreed changes",
                        ])
                        .build()
                })
            }
        }
    }
}

/// Produce up to `options.max_recommendations` recommendations, most
/// urgent first.
///
/// Live mode without analytics degrades to the static fallback.
pub fn recommend(
    ctx: &RecommendationContext<'_>,
    options: &RecommendationOptions,
) -> Vec<Recommendation> {
    let mut recs = match (options.mode, ctx.analytics) {
        (RecommendationMode::Live, Some(_)) => Rule::ALL
            .iter()
            .filter_map(|rule| rule.evaluate(ctx))
            .collect(),
        _ => static_fallback(ctx.goal),
    };

    recs.sort_by_key(|r| r.priority);
    recs.truncate(options.max_recommendations);

    tracing::debug!(goal = %ctx.goal.id, count = recs.len(), "recommendations generated");
    recs
}

/// Generic advice that does not depend on analytics
pub fn static_fallback(goal: &Goal) -> Vec<Recommendation> {
    vec![
        Draft::with_slug(goal, "contribution-review")
            .kind(RecommendationKind::ContributionIncrease)
            .priority(Priority::High)
            .title("Review Your Contribution")
            .description("Check that the monthly contribution still matches the target date.")
            .confidence(0.75)
            .steps(&[
                "Compare the contribution with the remaining amount",
                "Adjust the amount or the date",
            ])
            .build(),
        Draft::with_slug(goal, "diversification")
            .kind(RecommendationKind::PortfolioAdjustment)
            .priority(Priority::Medium)
            .title("Diversify Your Strategy")
            .description("Spreading savings across strategies reduces exposure to one market.")
            .confidence(0.70)
            .steps(&[
                "Review the current strategy mix",
                "Add an uncorrelated strategy",
            ])
            .build(),
    ]
}

// ============================================================================
// Recommendation assembly
// ============================================================================

struct Draft {
    rec: Recommendation,
}

impl Draft {
    fn new(goal: &Goal, rule: Rule) -> Self {
        Self::with_slug(goal, rule.slug())
    }

    fn with_slug(goal: &Goal, slug: &str) -> Self {
        Self {
            rec: Recommendation {
                id: format!("{}-{slug}", goal.id),
                kind: RecommendationKind::Opportunity,
                priority: Priority::Medium,
                title: String::new(),
                description: String::new(),
                confidence: 0.5,
                action_required: false,
                dismissible: true,
                estimated_impact: EstimatedImpact::default(),
                implementation_steps: Vec::new(),
                related_goals: Vec::new(),
            },
        }
    }

    fn kind(mut self, kind: RecommendationKind) -> Self {
        self.rec.kind = kind;
        self
    }

    fn priority(mut self, priority: Priority) -> Self {
        self.rec.priority = priority;
        self
    }

    fn title(mut self, title: impl Into<String>) -> Self {
        self.rec.title = title.into();
        self
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.rec.description = description.into();
        self
    }

    fn confidence(mut self, confidence: f64) -> Self {
        self.rec.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    fn action_required(mut self, required: bool) -> Self {
        self.rec.action_required = required;
        self
    }

    fn dismissible(mut self, dismissible: bool) -> Self {
        self.rec.dismissible = dismissible;
        self
    }

    fn impact(mut self, impact: EstimatedImpact) -> Self {
        self.rec.estimated_impact = impact;
        self
    }

    fn steps(mut self, steps: &[&str]) -> Self {
        self.rec.implementation_steps = steps.iter().map(|s| (*s).to_string()).collect();
        self
    }

    fn related(mut self, goals: Vec<GoalId>) -> Self {
        self.rec.related_goals = goals;
        self
    }

    fn build(self) -> Recommendation {
        self.rec
    }
}
