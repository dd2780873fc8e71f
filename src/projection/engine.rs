//! Core payoff simulator for monthly debt projections

use crate::ledger::Debt;
use super::ordering::Strategy;
use super::state::PayoffState;
use super::timeline::PayoffResult;

/// Simulation cap in months (30 years)
pub const DEFAULT_HORIZON_MONTHS: u32 = 360;

/// Configuration for a payoff run
#[derive(Debug, Clone)]
pub struct PayoffConfig {
    /// Maximum number of months to simulate
    pub horizon_months: u32,

    /// Whether to keep per-month rows
    pub detailed_output: bool,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            detailed_output: false,
        }
    }
}

/// Anything that can project a debt set to payoff.
///
/// The required-payment solver only needs this capability, which lets it be
/// exercised against a stand-in simulator.
pub trait Simulate {
    fn simulate(&self, debts: &[Debt], extra_payment: f64, target_debt: Option<u32>) -> PayoffResult;
}

/// Main payoff simulator
#[derive(Debug, Clone)]
pub struct PayoffSimulator {
    strategy: Strategy,
    base_payment: f64,
    config: PayoffConfig,
}

impl PayoffSimulator {
    /// Create a simulator spending `base_payment` a month under `strategy`
    pub fn new(strategy: Strategy, base_payment: f64) -> Self {
        Self::with_config(strategy, base_payment, PayoffConfig::default())
    }

    pub fn with_config(strategy: Strategy, base_payment: f64, config: PayoffConfig) -> Self {
        Self { strategy, base_payment, config }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn base_payment(&self) -> f64 {
        self.base_payment
    }

    pub fn config(&self) -> &PayoffConfig {
        &self.config
    }

    /// Run a payoff projection on a copy of `debts`.
    ///
    /// Each month spends `base_payment + extra_payment`. When the horizon is
    /// reached with debts still open the result is marked as not converged
    /// and its month count equals the horizon.
    pub fn project(&self, debts: &[Debt], extra_payment: f64, target_debt: Option<u32>) -> PayoffResult {
        let available = self.base_payment + extra_payment;
        let mut result = PayoffResult::new();
        let mut state = PayoffState::from_debts(debts);

        while state.has_open_debts() && state.month < self.config.horizon_months {
            let row = state.advance_month(available, self.strategy, target_debt);
            result.add_month(row, self.config.detailed_output);
        }

        result.converged = !state.has_open_debts();
        result.remaining_balance = state.total_balance();

        if result.converged {
            log::debug!(
                "{} payoff at {:.2}/month: {} months, {:.2} interest",
                self.strategy, available, result.months, result.total_interest
            );
        } else {
            log::warn!(
                "Debts not paid off within {} months at {:.2}/month ({:.2} remaining)",
                self.config.horizon_months, available, result.remaining_balance
            );
        }

        result
    }
}

impl Simulate for PayoffSimulator {
    fn simulate(&self, debts: &[Debt], extra_payment: f64, target_debt: Option<u32>) -> PayoffResult {
        self.project(debts, extra_payment, target_debt)
    }
}
