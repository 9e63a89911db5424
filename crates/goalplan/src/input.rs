//! Goal file loading
//!
//! A goal file is YAML:
//!
//! ```yaml
//! portfolio_value: 75000.0
//! monthly_income: 9000.0
//! config:
//!   monte_carlo:
//!     simulations: 5000
//!     seed: 42
//! goals:
//!   - id: 1
//!     name: Rainy day fund
//!     category: emergency-fund
//!     target_amount: 15000.0
//!     current_amount: 6000.0
//!     target_date: "2026-06-30"
//!     monthly_contribution: 500.0
//! ```
//!
//! Everything except `goals` is optional.

use std::fs;
use std::path::Path;

use goalplan_core::config::EngineConfig;
use goalplan_core::error::GoalError;
use goalplan_core::model::{Goal, GoalId, MarketAssumptions};
use serde::{Deserialize, Serialize};

/// Error types for goal file operations
#[derive(Debug)]
pub enum InputError {
    Io(String),
    Parse(String),
    NoGoals,
    UnknownGoal(GoalId),
    InvalidGoal { id: GoalId, source: GoalError },
    InvalidConfig(GoalError),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Io(msg) => write!(f, "IO error: {}", msg),
            InputError::Parse(msg) => write!(f, "Parse error: {}", msg),
            InputError::NoGoals => write!(f, "goal file contains no goals"),
            InputError::UnknownGoal(id) => write!(f, "no goal with id {}", id),
            InputError::InvalidGoal { id, source } => write!(f, "goal {}: {}", id, source),
            InputError::InvalidConfig(source) => write!(f, "invalid config: {}", source),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::InvalidGoal { source, .. } | InputError::InvalidConfig(source) => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Contents of a goal file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalFile {
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub assumptions: MarketAssumptions,
    #[serde(default)]
    pub config: EngineConfig,
    /// Total portfolio value, used by some recommendations
    #[serde(default)]
    pub portfolio_value: f64,
    /// Enables the savings-budget checks when present
    #[serde(default)]
    pub monthly_income: Option<f64>,
}

impl GoalFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Read and parse a goal file
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = fs::read_to_string(path)
            .map_err(|e| InputError::Io(format!("{}: {}", path.display(), e)))?;
        let file = Self::from_yaml(&content).map_err(|e| InputError::Parse(e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            goals = file.goals.len(),
            "goal file loaded"
        );
        Ok(file)
    }

    /// Check every goal and the engine config before any analysis runs
    pub fn validate(&self) -> Result<(), InputError> {
        if self.goals.is_empty() {
            return Err(InputError::NoGoals);
        }
        for goal in &self.goals {
            goal.validate()
                .map_err(|source| InputError::InvalidGoal { id: goal.id, source })?;
        }
        self.assumptions
            .validate()
            .map_err(InputError::InvalidConfig)?;
        self.config.validate().map_err(InputError::InvalidConfig)
    }

    /// All goals, or only the goal with id `only`
    pub fn select(&self, only: Option<GoalId>) -> Result<Vec<&Goal>, InputError> {
        match only {
            None => Ok(self.goals.iter().collect()),
            Some(id) => self
                .goals
                .iter()
                .find(|g| g.id == id)
                .map(|g| vec![g])
                .ok_or(InputError::UnknownGoal(id)),
        }
    }
}
