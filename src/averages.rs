//! Income-derived monthly averages
//!
//! Entry counts are converted to elapsed months by assuming four income events a
//! month. This is an approximation with no calendar basis, not a true calendar average.

use crate::ledger::IncomeEntry;

/// Assumed number of income events per month
pub const ENTRIES_PER_MONTH: f64 = 4.0;

/// Monthly income shown for previews when there is no history yet
pub const PREVIEW_MONTHLY_INCOME: f64 = 2000.0;

/// Months of history represented by `count` entries, never less than one
pub fn elapsed_months(count: usize) -> f64 {
    (count as f64 / ENTRIES_PER_MONTH).max(1.0)
}

/// Average monthly debt allocation, the simulator's baseline payment.
///
/// Entries whose debt share was overridden are left out entirely, both from the
/// total and from the entry count.
pub fn average_monthly_debt_payment(history: &[IncomeEntry]) -> f64 {
    let (count, total) = history
        .iter()
        .filter(|e| e.counts_toward_debt())
        .fold((0usize, 0.0), |(count, total), e| (count + 1, total + e.debt));

    if count == 0 {
        return 0.0;
    }
    total / elapsed_months(count)
}

/// Average monthly income, or the preview placeholder when there is no history.
///
/// Only for display; liability calculations never use this.
pub fn average_monthly_income(history: &[IncomeEntry]) -> f64 {
    if history.is_empty() {
        return PREVIEW_MONTHLY_INCOME;
    }
    let total: f64 = history.iter().map(|e| e.amount).sum();
    total / elapsed_months(history.len())
}

/// Debt share of entries kept out of automatic debt payment
pub fn excluded_debt_allocation(history: &[IncomeEntry]) -> (usize, f64) {
    history
        .iter()
        .filter(|e| !e.counts_toward_debt())
        .fold((0, 0.0), |(count, total), e| (count + 1, total + e.debt))
}
