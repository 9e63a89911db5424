mod goal;
mod ids;
mod market;
mod recommendation;
mod results;

pub use goal::{Goal, GoalCategory, GoalStatus, InvestmentStrategy, Priority, RiskTolerance};
pub use ids::GoalId;
pub use market::{
    DEFAULT_INFLATION_RATE, DEFAULT_RISK_FREE_RATE, DEFAULT_RISK_RETURN, DEFAULT_STRATEGY_RETURN,
    DEFAULT_VOLATILITY, MarketAssumptions,
};
pub use recommendation::{EstimatedImpact, Recommendation, RecommendationKind};
pub use results::{
    AnalyticsResult, CompletionEstimates, ConfidenceInterval, GrowthProjection, ScenarioAnalysis,
    ScenarioOutcome, VolatilityMetrics,
};
