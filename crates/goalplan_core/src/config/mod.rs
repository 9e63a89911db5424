//! Engine configuration
//!
//! `EngineConfig` gathers every caller-tunable knob: the Monte Carlo
//! settings, the stress and macro scenario tables and the recommendation
//! options. Every field has a default, so a partial YAML or JSON document
//! deserializes into a complete configuration.
//!
//! # Builder DSL
//!
//! Goals can be assembled with [`GoalBuilder`]:
//!
//! ```ignore
//! use goalplan_core::config::GoalBuilder;
//!
//! let goal = GoalBuilder::retirement("Retire at 60")
//!     .target(1_200_000.0)
//!     .current(85_000.0)
//!     .monthly(1_500.0)
//!     .by(2050, 1, 1)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::recommendations::RecommendationOptions;
use crate::scenarios::MacroScenario;
use crate::simulation::MonteCarloConfig;
use crate::stress::StressScenario;

pub mod goal_builder;

pub use goal_builder::GoalBuilder;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub monte_carlo: MonteCarloConfig,
    pub stress_scenarios: Vec<StressScenario>,
    pub macro_scenarios: Vec<MacroScenario>,
    pub recommendations: RecommendationOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            monte_carlo: MonteCarloConfig::default(),
            stress_scenarios: StressScenario::defaults(),
            macro_scenarios: MacroScenario::defaults(),
            recommendations: RecommendationOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Fixed simulation count and seed, for reproducible runs
    #[must_use]
    pub fn seeded(simulations: usize, seed: u64) -> Self {
        let mut config = Self::default();
        config.monte_carlo.simulations = simulations;
        config.monte_carlo.seed = Some(seed);
        config
    }

    #[must_use]
    pub fn with_stress_scenarios(mut self, scenarios: Vec<StressScenario>) -> Self {
        self.stress_scenarios = scenarios;
        self
    }

    #[must_use]
    pub fn with_macro_scenarios(mut self, scenarios: Vec<MacroScenario>) -> Self {
        self.macro_scenarios = scenarios;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.monte_carlo.validate()?;
        for scenario in &self.stress_scenarios {
            scenario.validate()?;
        }
        for scenario in &self.macro_scenarios {
            scenario.validate()?;
        }
        Ok(())
    }
}
