//! Working state for a single payoff simulation

use crate::ledger::{total_balance, Debt};
use super::ordering::{priority_index, Strategy};
use super::timeline::MonthRow;

/// Debt balances at a point in time during a simulation.
///
/// Owns a copy of the caller's debts; the originals are never touched.
#[derive(Debug, Clone)]
pub struct PayoffState {
    /// Months simulated so far
    pub month: u32,

    /// Open debts in their original relative order
    pub debts: Vec<Debt>,
}

impl PayoffState {
    /// Start from a copy of the given debts, dropping any already at zero
    pub fn from_debts(debts: &[Debt]) -> Self {
        Self {
            month: 0,
            debts: debts.iter().filter(|d| d.balance > 0.0).cloned().collect(),
        }
    }

    pub fn has_open_debts(&self) -> bool {
        !self.debts.is_empty()
    }

    pub fn total_balance(&self) -> f64 {
        total_balance(&self.debts)
    }

    /// Simulate one month with `available` to spend.
    ///
    /// Interest accrues on every open debt, minimums are paid in list order
    /// while money lasts, and any remainder goes to `target` if it is still
    /// open or to the strategy's priority debt otherwise. When an explicit
    /// target has already been paid off the remainder stays unallocated.
    pub fn advance_month(&mut self, available: f64, strategy: Strategy, target: Option<u32>) -> MonthRow {
        self.month += 1;
        let mut row = MonthRow::new(self.month);

        for debt in &mut self.debts {
            let accrued = debt.monthly_interest();
            debt.balance += accrued;
            row.interest += accrued;
        }

        let mut remaining = available.max(0.0);
        for debt in &mut self.debts {
            let paid = debt.pay(debt.min_payment.min(remaining));
            remaining -= paid;
            row.minimums_paid += paid;
        }

        if remaining > 0.0 {
            let recipient = match target {
                Some(id) => self.debts.iter().position(|d| d.id == id && d.balance > 0.0),
                None => priority_index(&self.debts, strategy),
            };
            if let Some(idx) = recipient {
                let paid = self.debts[idx].pay(remaining);
                remaining -= paid;
                row.extra_paid = paid;
                row.extra_target = Some(self.debts[idx].id);
            }
        }

        self.debts.retain(|d| d.balance > 0.0);

        row.unallocated = remaining;
        row.closing_balance = self.total_balance();
        row.open_debts = self.debts.len();
        row
    }
}

/// One month of simulation as a pure function
pub fn step(debts: &[Debt], available: f64, strategy: Strategy, target: Option<u32>) -> (Vec<Debt>, MonthRow) {
    let mut state = PayoffState::from_debts(debts);
    let row = state.advance_month(available, strategy, target);
    (state.debts, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn debts() -> Vec<Debt> {
        vec![
            Debt::new(1, "Card", 1200.0, 0.12, 50.0),
            Debt::new(2, "Loan", 600.0, 0.0, 20.0),
        ]
    }

    #[test]
    fn test_interest_minimums_then_extra() {
        let (after, row) = step(&debts(), 170.0, Strategy::Snowball, None);

        assert_abs_diff_eq!(row.interest, 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(row.minimums_paid, 70.0, epsilon = 1e-9);
        assert_abs_diff_eq!(row.extra_paid, 100.0, epsilon = 1e-9);
        assert_eq!(row.extra_target, Some(2));

        // Card: 1200 + 12 - 50; Loan: 600 - 20 - 100
        assert_abs_diff_eq!(after[0].balance, 1162.0, epsilon = 1e-9);
        assert_abs_diff_eq!(after[1].balance, 480.0, epsilon = 1e-9);
        assert_abs_diff_eq!(row.closing_balance, 1642.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minimums_limited_by_budget() {
        let (after, row) = step(&debts(), 30.0, Strategy::Snowball, None);
        // Card (first in list) takes all 30, nothing reaches the loan
        assert_abs_diff_eq!(row.minimums_paid, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(after[0].balance, 1182.0, epsilon = 1e-9);
        assert_abs_diff_eq!(after[1].balance, 600.0, epsilon = 1e-9);
        assert_eq!(row.extra_target, None);
    }

    #[test]
    fn test_explicit_target_overrides_strategy() {
        let (after, row) = step(&debts(), 170.0, Strategy::Snowball, Some(1));
        assert_eq!(row.extra_target, Some(1));
        assert_abs_diff_eq!(after[0].balance, 1062.0, epsilon = 1e-9);
    }

    #[test]
    fn test_paid_off_target_leaves_extra_unallocated() {
        let (_, row) = step(&debts(), 170.0, Strategy::Snowball, Some(9));
        assert_eq!(row.extra_target, None);
        assert_abs_diff_eq!(row.unallocated, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_paid_off_debts_are_removed() {
        let (after, row) = step(&debts(), 700.0, Strategy::Snowball, None);
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, 1);
        assert_eq!(row.open_debts, 1);
        // 700 - 50 - 20 = 630, of which 580 clears the loan
        assert_abs_diff_eq!(row.extra_paid, 580.0, epsilon = 1e-9);
        assert_abs_diff_eq!(row.unallocated, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_balances_are_never_negative() {
        let mut state = PayoffState::from_debts(&debts());
        while state.has_open_debts() {
            state.advance_month(10_000.0, Strategy::Avalanche, None);
            assert!(state.debts.iter().all(|d| d.balance > 0.0));
        }
        // Only one debt receives the extra each month
        assert_eq!(state.month, 2);
    }

    #[test]
    fn test_input_debts_untouched() {
        let input = debts();
        let _ = step(&input, 500.0, Strategy::Avalanche, None);
        assert_eq!(input, debts());
    }
}
