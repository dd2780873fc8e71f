//! Engine settings: strategy, tax reserve flags, IRS overrides, and status thresholds
//!
//! Passed explicitly into every engine call; nothing is read from global state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::Splits;
use crate::projection::{Strategy, DEFAULT_HORIZON_MONTHS};
use crate::tax::{QuarterLabel, TAX_RESERVE_RATE};

/// Default quarterly estimated-tax goal used for progress reporting
pub const DEFAULT_QUARTERLY_TAX_GOAL: f64 = 9566.0;

/// Configuration for every engine call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Extra-payment ordering strategy
    pub strategy: Strategy,

    /// When set, computed quarterly balances are reported as zero
    pub tax_reserve_paused: bool,

    /// Manually entered quarterly balances; these win over any computed figure
    pub irs_overrides: BTreeMap<QuarterLabel, f64>,

    /// Split percentages applied to income recorded with the default split
    pub default_splits: Splits,

    /// Flat rate applied to 1099-like income
    pub tax_rate: f64,

    /// Per-quarter tax goal, only used for percent-to-goal reporting
    pub quarterly_tax_goal: f64,

    /// Projection cap in months; reaching it means the debts never pay off
    pub horizon_months: u32,

    /// Good/warning/bad cut-offs for the status summary
    pub thresholds: StatusThresholds,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Snowball,
            tax_reserve_paused: false,
            irs_overrides: BTreeMap::new(),
            default_splits: Splits::default(),
            tax_rate: TAX_RESERVE_RATE,
            quarterly_tax_goal: DEFAULT_QUARTERLY_TAX_GOAL,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            thresholds: StatusThresholds::default(),
        }
    }
}

impl EngineSettings {
    /// Copy of these settings with a different strategy
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    /// Manual balance for a quarter, if one has been entered
    pub fn override_for(&self, quarter: &QuarterLabel) -> Option<f64> {
        self.irs_overrides.get(quarter).copied()
    }

    /// Enter a manual balance for a quarter, replacing any previous one
    pub fn set_override(&mut self, quarter: QuarterLabel, balance: f64) {
        self.irs_overrides.insert(quarter, balance);
    }

    /// Remove a manual balance so the computed figure applies again
    pub fn clear_override(&mut self, quarter: &QuarterLabel) -> Option<f64> {
        self.irs_overrides.remove(quarter)
    }
}

/// Cut-offs used to grade the headline figures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    /// Grade total debt by percent paid off instead of by dollar amount
    pub use_percentage: bool,

    /// Monthly interest at or above this is a warning
    pub interest_warning: f64,

    /// Monthly interest at or above this is bad
    pub interest_bad: f64,

    /// Total debt at or above this is a warning (dollar mode)
    pub debt_warning: f64,

    /// Total debt at or above this is bad (dollar mode)
    pub debt_bad: f64,

    /// Payoff horizon at or above this many months is a warning
    pub payoff_months_warning: u32,

    /// Payoff horizon at or above this many months is bad
    pub payoff_months_bad: u32,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            use_percentage: false,
            interest_warning: 500.0,
            interest_bad: 800.0,
            debt_warning: 30_000.0,
            debt_bad: 50_000.0,
            payoff_months_warning: 24,
            payoff_months_bad: 48,
        }
    }
}
