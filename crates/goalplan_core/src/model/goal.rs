//! Goal snapshot and its tag enumerations
//!
//! Tags serialize in kebab-case. Unrecognised strategy and risk tags
//! deserialize to `Unknown`, which resolves to the default rates in
//! [`MarketAssumptions`](super::MarketAssumptions). Unrecognised categories
//! become `Custom`.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::GoalId;
use crate::date_math;
use crate::error::{GoalError, Result};

/// What a goal is saving for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalCategory {
    Retirement,
    HomePurchase,
    Education,
    EmergencyFund,
    Vacation,
    BusinessInvestment,
    DebtPayoff,
    CarPurchase,
    Wedding,
    ChildBirth,
    Medical,
    InvestmentMilestone,
    WealthBuilding,
    PassiveIncome,
    PortfolioDiversification,
    #[default]
    #[serde(other)]
    Custom,
}

impl GoalCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalCategory::Retirement => "retirement",
            GoalCategory::HomePurchase => "home-purchase",
            GoalCategory::Education => "education",
            GoalCategory::EmergencyFund => "emergency-fund",
            GoalCategory::Vacation => "vacation",
            GoalCategory::BusinessInvestment => "business-investment",
            GoalCategory::DebtPayoff => "debt-payoff",
            GoalCategory::CarPurchase => "car-purchase",
            GoalCategory::Wedding => "wedding",
            GoalCategory::ChildBirth => "child-birth",
            GoalCategory::Medical => "medical",
            GoalCategory::InvestmentMilestone => "investment-milestone",
            GoalCategory::WealthBuilding => "wealth-building",
            GoalCategory::PassiveIncome => "passive-income",
            GoalCategory::PortfolioDiversification => "portfolio-diversification",
            GoalCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Investment strategy backing a goal's savings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentStrategy {
    ConservativeBonds,
    DividendStocks,
    GrowthStocks,
    IndexFunds,
    CryptoDiversified,
    DefiYield,
    RealEstate,
    Commodities,
    #[default]
    BalancedPortfolio,
    #[serde(other)]
    Unknown,
}

impl InvestmentStrategy {
    /// Every recognised strategy, excluding `Unknown`
    pub const KNOWN: [InvestmentStrategy; 9] = [
        InvestmentStrategy::ConservativeBonds,
        InvestmentStrategy::DividendStocks,
        InvestmentStrategy::GrowthStocks,
        InvestmentStrategy::IndexFunds,
        InvestmentStrategy::CryptoDiversified,
        InvestmentStrategy::DefiYield,
        InvestmentStrategy::RealEstate,
        InvestmentStrategy::Commodities,
        InvestmentStrategy::BalancedPortfolio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InvestmentStrategy::ConservativeBonds => "conservative-bonds",
            InvestmentStrategy::DividendStocks => "dividend-stocks",
            InvestmentStrategy::GrowthStocks => "growth-stocks",
            InvestmentStrategy::IndexFunds => "index-funds",
            InvestmentStrategy::CryptoDiversified => "crypto-diversified",
            InvestmentStrategy::DefiYield => "defi-yield",
            InvestmentStrategy::RealEstate => "real-estate",
            InvestmentStrategy::Commodities => "commodities",
            InvestmentStrategy::BalancedPortfolio => "balanced-portfolio",
            InvestmentStrategy::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InvestmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Investor's stated risk tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTolerance {
    UltraConservative,
    Conservative,
    #[default]
    Moderate,
    Aggressive,
    UltraAggressive,
    #[serde(other)]
    Unknown,
}

impl RiskTolerance {
    /// Every recognised tolerance from least to most aggressive
    pub const KNOWN: [RiskTolerance; 5] = [
        RiskTolerance::UltraConservative,
        RiskTolerance::Conservative,
        RiskTolerance::Moderate,
        RiskTolerance::Aggressive,
        RiskTolerance::UltraAggressive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTolerance::UltraConservative => "ultra-conservative",
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
            RiskTolerance::UltraAggressive => "ultra-aggressive",
            RiskTolerance::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority tag shared by goals and recommendations.
///
/// Variants are declared from most to least urgent, so the derived `Ord`
/// sorts `Critical` first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Numeric urgency, higher is more urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracking status maintained by the goal-management layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    NotStarted,
    #[default]
    OnTrack,
    Ahead,
    Behind,
    AtRisk,
    Paused,
    Completed,
    Archived,
}

/// Immutable snapshot of a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    #[serde(default)]
    pub category: GoalCategory,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub target_date: Date,
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default)]
    pub automatic_contribution: bool,
    #[serde(default)]
    pub investment_strategy: InvestmentStrategy,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: GoalStatus,
}

impl Goal {
    /// Reject inputs that would otherwise produce NaN or nonsense.
    pub fn validate(&self) -> Result<()> {
        if !(self.target_amount.is_finite() && self.target_amount > 0.0) {
            return Err(GoalError::InvalidTargetAmount(self.target_amount));
        }
        if !(self.current_amount.is_finite() && self.current_amount >= 0.0) {
            return Err(GoalError::InvalidCurrentAmount(self.current_amount));
        }
        if !(self.monthly_contribution.is_finite() && self.monthly_contribution >= 0.0) {
            return Err(GoalError::InvalidContribution(self.monthly_contribution));
        }
        Ok(())
    }

    /// Whole 30-day months between `now` and the target date, never negative
    pub fn months_remaining(&self, now: Date) -> u32 {
        date_math::months_between(now, self.target_date)
    }

    /// Amount still missing, zero once the goal is met
    pub fn remaining_amount(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    pub fn is_met(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Fraction of the target already saved; may exceed 1
    pub fn progress(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.current_amount / self.target_amount
        } else {
            0.0
        }
    }
}
