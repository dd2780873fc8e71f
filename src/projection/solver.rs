//! Required monthly payment for a target payoff date
//!
//! Bisection over the total monthly payment, using the payoff simulator as the
//! monotone oracle: paying more never takes longer.

use serde::{Deserialize, Serialize};

use crate::ledger::{total_balance, Debt};
use super::engine::Simulate;

/// Bisection stops once the bracket is this narrow (dollars)
const PAYMENT_TOLERANCE: f64 = 1.0;

/// Guard against brackets that never narrow (non-finite inputs)
const MAX_ITERATIONS: u32 = 200;

/// Outcome of solving for a payoff date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequiredPayment {
    /// Total monthly payment (minimums included) that meets the date
    Achievable { total_payment: f64 },
    /// No payment within the search range meets the date
    NotAchievable,
}

impl RequiredPayment {
    pub fn total_payment(&self) -> Option<f64> {
        match self {
            RequiredPayment::Achievable { total_payment } => Some(*total_payment),
            RequiredPayment::NotAchievable => None,
        }
    }
}

/// Find the smallest total monthly payment that clears `debts` within
/// `months_available`, to within a dollar.
///
/// The search runs between the sum of minimums and the total balance. Each
/// probe simulates with `probe - min_payments_total` as the extra payment.
/// A probe only succeeds if the simulation actually converged.
pub fn solve_for_date<S: Simulate + ?Sized>(
    simulator: &S,
    debts: &[Debt],
    min_payments_total: f64,
    months_available: f64,
) -> RequiredPayment {
    let mut low = min_payments_total;
    let mut high = total_balance(debts);
    let mut required = None;
    let mut iterations = 0;

    while high - low > PAYMENT_TOLERANCE && iterations < MAX_ITERATIONS {
        iterations += 1;
        let mid = (low + high) / 2.0;
        let result = simulator.simulate(debts, mid - min_payments_total, None);
        let meets = result.converged && result.months as f64 <= months_available;
        log::debug!("Probe {:.2}/month: {} months, meets date: {}", mid, result.months, meets);

        if meets {
            high = mid;
            required = Some(mid);
        } else {
            low = mid;
        }
    }

    match required {
        Some(total_payment) => {
            log::info!(
                "Paying {:.2}/month clears debts within {:.1} months ({} probes)",
                total_payment, months_available, iterations
            );
            RequiredPayment::Achievable { total_payment }
        }
        None => {
            log::info!("No payment up to {:.2}/month clears debts within {:.1} months", high, months_available);
            RequiredPayment::NotAchievable
        }
    }
}
