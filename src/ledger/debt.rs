//! Debt accounts and the payment operations that mutate them

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::projection::{order_indices, Strategy};

/// A single interest-bearing debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    /// Unique debt identifier
    pub id: u32,

    /// Display name; manual debt payments reference the debt by this name
    pub name: String,

    /// Outstanding balance, never negative
    pub balance: f64,

    /// Annual interest rate as a fraction (0.07 = 7%)
    pub annual_rate: f64,

    /// Required monthly minimum payment
    pub min_payment: f64,

    /// Balance when the debt was added; only a reset changes it
    #[serde(default)]
    pub original_balance: f64,
}

impl Debt {
    /// Create a new debt whose original balance is its current balance
    pub fn new(id: u32, name: impl Into<String>, balance: f64, annual_rate: f64, min_payment: f64) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            annual_rate,
            min_payment,
            original_balance: balance,
        }
    }

    /// Interest one month of accrual would add at the current balance
    pub fn monthly_interest(&self) -> f64 {
        self.balance * self.annual_rate / 12.0
    }

    /// Whether the debt still carries a balance
    pub fn is_active(&self) -> bool {
        self.balance > 0.0
    }

    /// Amount paid down since the debt was added
    pub fn paid_down(&self) -> f64 {
        (self.original_balance - self.balance).max(0.0)
    }

    /// Reduce the balance, clamping at zero. Returns the amount actually applied.
    pub fn pay(&mut self, amount: f64) -> f64 {
        let applied = amount.max(0.0).min(self.balance.max(0.0));
        self.balance = (self.balance - applied).max(0.0);
        applied
    }
}

/// Sum of outstanding balances
pub fn total_balance(debts: &[Debt]) -> f64 {
    debts.iter().map(|d| d.balance).sum()
}

/// Sum of monthly minimum payments
pub fn total_min_payments(debts: &[Debt]) -> f64 {
    debts.iter().map(|d| d.min_payment).sum()
}

/// Sum of one month of interest across all debts
pub fn total_monthly_interest(debts: &[Debt]) -> f64 {
    debts.iter().map(Debt::monthly_interest).sum()
}

/// Apply an income's debt allocation to the live debt set.
///
/// Debts are visited in strategy order. A debt's minimum is only paid when the
/// remaining amount covers it in full; whatever is left then goes to the first
/// debt in order that still has a balance. Paid-off debts are removed.
///
/// Returns the amount that could not be applied: whatever exceeds the minimums
/// paid plus the balance of the first open debt. Debts further down the order
/// do not receive it, so money can go unapplied while debts remain open.
pub fn apply_debt_payment(debts: &mut Vec<Debt>, amount: f64, strategy: Strategy) -> f64 {
    let order = order_indices(debts, strategy);
    let mut remaining = amount.max(0.0);

    for &idx in &order {
        let debt = &mut debts[idx];
        if remaining >= debt.min_payment && debt.balance > 0.0 {
            remaining -= debt.pay(debt.min_payment);
        }
    }

    if remaining > 0.0 {
        if let Some(&idx) = order.iter().find(|&&idx| debts[idx].balance > 0.0) {
            remaining -= debts[idx].pay(remaining);
        }
    }

    debts.retain(|d| d.balance.is_finite() && d.balance > 0.0);
    log::debug!("Applied debt allocation, {:.2} unallocated, {} debts open", remaining, debts.len());
    remaining
}

/// Apply a manual payment to one debt by id, removing it if paid off.
///
/// Returns the debt's remaining balance.
pub fn pay_debt(debts: &mut Vec<Debt>, id: u32, amount: f64) -> Result<f64> {
    let idx = debts
        .iter()
        .position(|d| d.id == id)
        .ok_or_else(|| EngineError::DebtNotFound(id.to_string()))?;

    debts[idx].pay(amount);
    let remaining = debts[idx].balance;
    if remaining == 0.0 {
        debts.remove(idx);
    }
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_debts() -> Vec<Debt> {
        vec![
            Debt::new(1, "Card", 2000.0, 0.24, 50.0),
            Debt::new(2, "Loan", 500.0, 0.05, 25.0),
        ]
    }

    #[test]
    fn test_monthly_interest() {
        let debt = Debt::new(1, "Card", 1200.0, 0.12, 25.0);
        assert_abs_diff_eq!(debt.monthly_interest(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pay_clamps_at_zero() {
        let mut debt = Debt::new(1, "Card", 100.0, 0.12, 25.0);
        let applied = debt.pay(150.0);
        assert_abs_diff_eq!(applied, 100.0, epsilon = 1e-9);
        assert_eq!(debt.balance, 0.0);
        assert!(!debt.is_active());
        assert_abs_diff_eq!(debt.paid_down(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_apply_pays_minimums_then_snowball_target() {
        let mut debts = two_debts();
        let left = apply_debt_payment(&mut debts, 175.0, Strategy::Snowball);

        assert_eq!(left, 0.0);
        // Minimums 50 + 25, then the remaining 100 goes to the smaller balance
        assert_abs_diff_eq!(debts[0].balance, 1950.0, epsilon = 1e-9);
        assert_abs_diff_eq!(debts[1].balance, 375.0, epsilon = 1e-9);
    }

    #[test]
    fn test_apply_skips_minimum_that_cannot_be_covered() {
        let mut debts = two_debts();
        // Avalanche visits the card first; 40 does not cover its 50 minimum,
        // but it does cover the loan's 25, and the 15 left goes to the card.
        apply_debt_payment(&mut debts, 40.0, Strategy::Avalanche);

        assert_abs_diff_eq!(debts[0].balance, 1985.0, epsilon = 1e-9);
        assert_abs_diff_eq!(debts[1].balance, 475.0, epsilon = 1e-9);
    }

    #[test]
    fn test_apply_removes_paid_off_debts() {
        let mut debts = two_debts();
        // Minimums 25 + 50, then only the loan (first in snowball order) takes the rest
        let left = apply_debt_payment(&mut debts, 3000.0, Strategy::Snowball);

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].id, 1);
        assert_abs_diff_eq!(debts[0].balance, 1950.0, epsilon = 1e-9);
        assert_abs_diff_eq!(left, 2450.0, epsilon = 1e-9);

        let leftover = apply_debt_payment(&mut debts, 10_000.0, Strategy::Snowball);
        assert!(debts.is_empty());
        assert_abs_diff_eq!(leftover, 8050.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pay_debt_by_id() {
        let mut debts = two_debts();
        let remaining = pay_debt(&mut debts, 2, 100.0).unwrap();
        assert_abs_diff_eq!(remaining, 400.0, epsilon = 1e-9);

        let remaining = pay_debt(&mut debts, 2, 1000.0).unwrap();
        assert_eq!(remaining, 0.0);
        assert_eq!(debts.len(), 1);

        let err = pay_debt(&mut debts, 99, 10.0).unwrap_err();
        assert!(matches!(err, EngineError::DebtNotFound(_)));
    }
}
