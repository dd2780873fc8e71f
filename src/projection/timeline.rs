//! Payoff timeline output structures

use serde::{Deserialize, Serialize};

/// A single row of payoff output for one simulated month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    /// Simulated month (1-indexed)
    pub month: u32,

    /// Interest accrued across all open debts this month
    pub interest: f64,

    /// Amount paid toward minimums
    pub minimums_paid: f64,

    /// Amount paid beyond minimums
    pub extra_paid: f64,

    /// Debt that received the extra payment, if any
    pub extra_target: Option<u32>,

    /// Payment budget left unspent this month
    pub unallocated: f64,

    /// Total balance at end of month
    pub closing_balance: f64,

    /// Debts still open at end of month
    pub open_debts: usize,
}

impl MonthRow {
    pub fn new(month: u32) -> Self {
        Self {
            month,
            ..Default::default()
        }
    }

    /// Total applied to balances this month
    pub fn total_paid(&self) -> f64 {
        self.minimums_paid + self.extra_paid
    }
}

/// How a payoff simulation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffOutcome {
    /// Every debt reached zero after this many months
    DebtFree { months: u32 },
    /// Debts remained at the horizon
    Never,
}

/// Complete payoff simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    /// Months simulated; equals the horizon when the debts never cleared
    pub months: u32,

    /// Interest accrued over all simulated months
    pub total_interest: f64,

    /// Whether every debt was paid off within the horizon
    pub converged: bool,

    /// Balance still owed at the end of the simulation
    pub remaining_balance: f64,

    /// Per-month rows, only populated for detailed runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<MonthRow>,
}

impl PayoffResult {
    pub fn new() -> Self {
        Self {
            months: 0,
            total_interest: 0.0,
            converged: true,
            remaining_balance: 0.0,
            rows: Vec::new(),
        }
    }

    /// Fold one simulated month into the totals
    pub fn add_month(&mut self, row: MonthRow, keep_row: bool) {
        self.months = row.month;
        self.total_interest += row.interest;
        self.remaining_balance = row.closing_balance;
        if keep_row {
            self.rows.push(row);
        }
    }

    pub fn outcome(&self) -> PayoffOutcome {
        if self.converged {
            PayoffOutcome::DebtFree { months: self.months }
        } else {
            PayoffOutcome::Never
        }
    }

    /// Months to debt freedom, `None` when the horizon was reached first
    pub fn payoff_months(&self) -> Option<u32> {
        match self.outcome() {
            PayoffOutcome::DebtFree { months } => Some(months),
            PayoffOutcome::Never => None,
        }
    }
}

impl Default for PayoffResult {
    fn default() -> Self {
        Self::new()
    }
}
