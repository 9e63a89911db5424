//! Goal projection and Monte Carlo analytics
//!
//! Given a savings goal (target amount and date, current savings, monthly
//! contribution, strategy and risk tolerance) and a table of market
//! assumptions, this crate computes:
//! - Closed-form compound-growth projections and the contribution needed to
//!   hit the target
//! - A Monte Carlo success probability with percentile outcome bands
//! - Deterministic stress tests and macro-economic scenarios
//! - Prioritized advisory recommendations
//! - Milestones, conflict checks and budget allocation across goals
//!
//! Every call is request-scoped: inputs are borrowed, results are returned
//! fresh and no state survives between calls.
//!
//! ```ignore
//! use goalplan_core::{EngineConfig, GoalBuilder, MarketAssumptions, analyze};
//!
//! let goal = GoalBuilder::emergency_fund("Rainy day")
//!     .target(25_000.0)
//!     .current(8_500.0)
//!     .monthly(1_200.0)
//!     .by(2026, 12, 31)
//!     .build()?;
//!
//! let result = analyze(
//!     &goal,
//!     &MarketAssumptions::default(),
//!     &EngineConfig::seeded(10_000, 42),
//!     jiff::civil::date(2025, 12, 31),
//! )?;
//! println!("{:.0}% likely", result.monte_carlo_probability * 100.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analytics;
pub mod date_math;
pub mod error;
pub mod metrics;
pub mod percentiles;
pub mod planning;
pub mod projection;
pub mod recommendations;
pub mod scenarios;
pub mod simulation;
pub mod stress;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analytics::{GoalReport, analyze, analyze_now, report};
pub use config::{EngineConfig, GoalBuilder};
pub use error::GoalError;
pub use model::{
    AnalyticsResult, Goal, GoalCategory, GoalId, InvestmentStrategy, MarketAssumptions, Priority,
    Recommendation, RiskTolerance,
};
pub use recommendations::{RecommendationContext, RecommendationMode, recommend};
pub use simulation::{MonteCarloConfig, ReturnDistribution, simulate};
pub use stress::{StressScenario, StressTestReport, stress_test};
