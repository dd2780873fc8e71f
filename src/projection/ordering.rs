//! Extra-payment ordering strategies

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::Debt;

/// Which debt receives payments beyond the minimums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Smallest balance first
    #[default]
    Snowball,
    /// Highest interest rate first
    Avalanche,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Snowball => "Snowball (smallest first)",
            Strategy::Avalanche => "Avalanche (highest rate first)",
        }
    }

    /// `Less` when `a` should be paid before `b`
    fn compare(&self, a: &Debt, b: &Debt) -> Ordering {
        match self {
            Strategy::Snowball => a.balance.total_cmp(&b.balance),
            Strategy::Avalanche => b.annual_rate.total_cmp(&a.annual_rate),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Snowball => write!(f, "snowball"),
            Strategy::Avalanche => write!(f, "avalanche"),
        }
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowball" => Ok(Strategy::Snowball),
            "avalanche" => Ok(Strategy::Avalanche),
            other => Err(EngineError::Validation(format!("unknown strategy: {}", other))),
        }
    }
}

/// Indices of debts with a positive balance, in payment priority order.
///
/// The sort is stable, so debts with equal keys keep their input order.
pub fn order_indices(debts: &[Debt], strategy: Strategy) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..debts.len())
        .filter(|&i| debts[i].balance > 0.0)
        .collect();
    indices.sort_by(|&a, &b| strategy.compare(&debts[a], &debts[b]));
    indices
}

/// Debts with a positive balance, in payment priority order
pub fn order(debts: &[Debt], strategy: Strategy) -> Vec<Debt> {
    order_indices(debts, strategy)
        .into_iter()
        .map(|i| debts[i].clone())
        .collect()
}

/// Index of the debt that should receive the next extra payment
pub fn priority_index(debts: &[Debt], strategy: Strategy) -> Option<usize> {
    debts
        .iter()
        .enumerate()
        .filter(|(_, d)| d.balance > 0.0)
        // min_by keeps the first of equal elements
        .min_by(|(_, a), (_, b)| strategy.compare(a, b))
        .map(|(i, _)| i)
}
