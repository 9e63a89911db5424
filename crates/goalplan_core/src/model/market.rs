//! Market assumption tables
//!
//! A single explicit value maps strategy and risk tags to annual returns and
//! risk tags to annual volatility. Lookups are total: a tag missing from a
//! table resolves to that table's default.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{Goal, InvestmentStrategy, RiskTolerance};
use crate::error::{GoalError, Result};

pub const DEFAULT_STRATEGY_RETURN: f64 = 0.07;
pub const DEFAULT_RISK_RETURN: f64 = 0.07;
pub const DEFAULT_VOLATILITY: f64 = 0.15;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;
pub const DEFAULT_INFLATION_RATE: f64 = 0.03;

/// Annual return and volatility assumptions used by every calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAssumptions {
    pub strategy_returns: FxHashMap<InvestmentStrategy, f64>,
    pub risk_returns: FxHashMap<RiskTolerance, f64>,
    pub risk_volatility: FxHashMap<RiskTolerance, f64>,
    pub default_strategy_return: f64,
    pub default_risk_return: f64,
    pub default_volatility: f64,
    /// Benchmark rate for Sharpe and Sortino ratios
    pub risk_free_rate: f64,
    /// Used for real (inflation-adjusted) return figures
    pub inflation_rate: f64,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        use InvestmentStrategy as S;
        use RiskTolerance as R;

        let strategy_returns = [
            (S::ConservativeBonds, 0.04),
            (S::DividendStocks, 0.08),
            (S::GrowthStocks, 0.12),
            (S::IndexFunds, 0.10),
            (S::CryptoDiversified, 0.15),
            (S::DefiYield, 0.18),
            (S::RealEstate, 0.09),
            (S::Commodities, 0.07),
            (S::BalancedPortfolio, 0.08),
        ]
        .into_iter()
        .collect();

        let risk_returns = [
            (R::UltraConservative, 0.03),
            (R::Conservative, 0.05),
            (R::Moderate, 0.07),
            (R::Aggressive, 0.10),
            (R::UltraAggressive, 0.12),
        ]
        .into_iter()
        .collect();

        let risk_volatility = [
            (R::UltraConservative, 0.05),
            (R::Conservative, 0.10),
            (R::Moderate, 0.15),
            (R::Aggressive, 0.20),
            (R::UltraAggressive, 0.25),
        ]
        .into_iter()
        .collect();

        Self {
            strategy_returns,
            risk_returns,
            risk_volatility,
            default_strategy_return: DEFAULT_STRATEGY_RETURN,
            default_risk_return: DEFAULT_RISK_RETURN,
            default_volatility: DEFAULT_VOLATILITY,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            inflation_rate: DEFAULT_INFLATION_RATE,
        }
    }
}

impl MarketAssumptions {
    /// Assumptions where every tag resolves to the same return and volatility.
    #[must_use]
    pub fn flat(annual_return: f64, volatility: f64) -> Self {
        Self {
            strategy_returns: FxHashMap::default(),
            risk_returns: FxHashMap::default(),
            risk_volatility: FxHashMap::default(),
            default_strategy_return: annual_return,
            default_risk_return: annual_return,
            default_volatility: volatility,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategy_return(mut self, strategy: InvestmentStrategy, rate: f64) -> Self {
        self.strategy_returns.insert(strategy, rate);
        self
    }

    #[must_use]
    pub fn with_risk_return(mut self, risk: RiskTolerance, rate: f64) -> Self {
        self.risk_returns.insert(risk, rate);
        self
    }

    #[must_use]
    pub fn with_volatility(mut self, risk: RiskTolerance, volatility: f64) -> Self {
        self.risk_volatility.insert(risk, volatility);
        self
    }

    /// Every rate must be finite and every volatility non-negative.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: String, value: f64| GoalError::InvalidAssumption { field, value };

        for (strategy, &rate) in &self.strategy_returns {
            if !rate.is_finite() {
                return Err(invalid(format!("strategy_returns.{strategy}"), rate));
            }
        }
        for (risk, &rate) in &self.risk_returns {
            if !rate.is_finite() {
                return Err(invalid(format!("risk_returns.{risk}"), rate));
            }
        }
        for (risk, &vol) in &self.risk_volatility {
            if !(vol.is_finite() && vol >= 0.0) {
                return Err(invalid(format!("risk_volatility.{risk}"), vol));
            }
        }

        let scalars = [
            ("default_strategy_return", self.default_strategy_return),
            ("default_risk_return", self.default_risk_return),
            ("risk_free_rate", self.risk_free_rate),
            ("inflation_rate", self.inflation_rate),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(field.to_string(), value));
            }
        }
        if !(self.default_volatility.is_finite() && self.default_volatility >= 0.0) {
            return Err(invalid(
                "default_volatility".to_string(),
                self.default_volatility,
            ));
        }
        Ok(())
    }

    pub fn strategy_return(&self, strategy: InvestmentStrategy) -> f64 {
        self.strategy_returns
            .get(&strategy)
            .copied()
            .unwrap_or(self.default_strategy_return)
    }

    pub fn risk_return(&self, risk: RiskTolerance) -> f64 {
        self.risk_returns
            .get(&risk)
            .copied()
            .unwrap_or(self.default_risk_return)
    }

    pub fn volatility(&self, risk: RiskTolerance) -> f64 {
        self.risk_volatility
            .get(&risk)
            .copied()
            .unwrap_or(self.default_volatility)
    }

    /// Expected annual return for a goal: the plain average of its strategy
    /// return and its risk-tolerance return.
    pub fn expected_annual_return(&self, goal: &Goal) -> f64 {
        (self.strategy_return(goal.investment_strategy) + self.risk_return(goal.risk_tolerance))
            / 2.0
    }

    /// [`expected_annual_return`](Self::expected_annual_return) divided by 12
    pub fn effective_monthly_rate(&self, goal: &Goal) -> f64 {
        self.expected_annual_return(goal) / 12.0
    }
}
