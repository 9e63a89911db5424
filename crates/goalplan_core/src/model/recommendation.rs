use serde::{Deserialize, Serialize};

use super::{GoalId, Priority};

/// Category of advice carried by a [`Recommendation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    ContributionIncrease,
    PortfolioAdjustment,
    TaxOptimization,
    Automation,
    RiskAdjustment,
    TimelineExtension,
    Rebalancing,
    Opportunity,
}

impl RecommendationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationKind::ContributionIncrease => "contribution-increase",
            RecommendationKind::PortfolioAdjustment => "portfolio-adjustment",
            RecommendationKind::TaxOptimization => "tax-optimization",
            RecommendationKind::Automation => "automation",
            RecommendationKind::RiskAdjustment => "risk-adjustment",
            RecommendationKind::TimelineExtension => "timeline-extension",
            RecommendationKind::Rebalancing => "rebalancing",
            RecommendationKind::Opportunity => "opportunity",
        }
    }
}

/// Expected effect of following a recommendation. Unset fields are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedImpact {
    /// Months saved on the goal timeline (negative when the timeline grows)
    pub time_reduction: f64,
    /// Currency saved per year
    pub cost_savings: f64,
    /// Change in success probability, as a fraction
    pub probability_increase: f64,
    /// Additional annual return, as a fraction
    pub additional_return: f64,
}

/// A derived piece of advice. Regenerated on every call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub action_required: bool,
    pub dismissible: bool,
    pub estimated_impact: EstimatedImpact,
    pub implementation_steps: Vec<String>,
    pub related_goals: Vec<GoalId>,
}
