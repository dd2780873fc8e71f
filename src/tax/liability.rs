//! Quarterly estimated-tax liability on 1099-like income
//!
//! Liability for a quarter is a flat rate applied to the quarter's self-employment
//! income, less the tax reserve already split off those entries and any manual tax
//! payments credited to the quarter. A manual IRS override replaces the whole
//! calculation, and pausing the tax reserve reports zero.

use chrono::NaiveDate;
use serde::Serialize;

use super::quarter::QuarterLabel;
use crate::ledger::{IncomeEntry, IncomeType, Payment, Snapshot};
use crate::settings::EngineSettings;

/// Flat estimated-tax rate applied to 1099-like income
pub const TAX_RESERVE_RATE: f64 = 0.229;

/// Outstanding balance for one quarter.
///
/// Override first, then the paused flag, then the computed figure clamped at zero.
pub fn quarter_balance(
    quarter: &QuarterLabel,
    income: &[IncomeEntry],
    payments: &[Payment],
    settings: &EngineSettings,
) -> f64 {
    TaxCalculator::new(income, payments, settings).quarter_balance(quarter)
}

/// Tax already set aside or paid toward one quarter
pub fn quarter_payments(quarter: &QuarterLabel, income: &[IncomeEntry], payments: &[Payment]) -> f64 {
    let reserved: f64 = quarter_entries(quarter, income).map(|e| e.tax).sum();
    let paid: f64 = payments
        .iter()
        .filter(|p| p.is_tax_for(quarter))
        .map(|p| p.amount)
        .sum();
    reserved + paid
}

/// 1099-like entries dated inside a quarter
fn quarter_entries<'e>(
    quarter: &'e QuarterLabel,
    income: &'e [IncomeEntry],
) -> impl Iterator<Item = &'e IncomeEntry> + 'e {
    income
        .iter()
        .filter(move |e| e.income_type.is_self_employment() && quarter.contains(e.date))
}

/// Progress label for a quarter card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuarterState {
    Paid,
    Overdue,
    DueSoon,
    NotDue,
}

/// Everything shown for one quarter
#[derive(Debug, Clone, Serialize)]
pub struct QuarterStatus {
    pub quarter: QuarterLabel,
    pub due_date: NaiveDate,
    pub balance: f64,
    pub paid_to_date: f64,
    pub is_paid: bool,
    pub is_overdue: bool,
    pub is_current: bool,
    pub percent_to_goal: f64,
}

impl QuarterStatus {
    pub fn state(&self) -> QuarterState {
        if self.is_paid {
            QuarterState::Paid
        } else if self.is_overdue {
            QuarterState::Overdue
        } else if self.is_current {
            QuarterState::DueSoon
        } else {
            QuarterState::NotDue
        }
    }
}

/// One past-due quarter with a balance
#[derive(Debug, Clone, Serialize)]
pub struct OverdueQuarter {
    pub quarter: QuarterLabel,
    pub balance: f64,
    pub days_overdue: i64,
}

/// Past-due quarters of a year
#[derive(Debug, Clone, Default, Serialize)]
pub struct OverdueSummary {
    pub total_unpaid: f64,
    pub quarters: Vec<OverdueQuarter>,
}

/// Self-employment income totals for one category
#[derive(Debug, Clone, Serialize)]
pub struct SelfEmploymentBreakdown {
    pub income_type: IncomeType,
    pub total: f64,
    pub tax_reserved: f64,
    pub count: usize,
}

/// Quarterly tax views over one income/payment history
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    income: &'a [IncomeEntry],
    payments: &'a [Payment],
    settings: &'a EngineSettings,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(income: &'a [IncomeEntry], payments: &'a [Payment], settings: &'a EngineSettings) -> Self {
        Self {
            income,
            payments,
            settings,
        }
    }

    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        Self::new(&snapshot.income, &snapshot.payments, &snapshot.settings)
    }

    /// Gross 1099-like income dated inside a quarter
    pub fn self_employment_income(&self, quarter: &QuarterLabel) -> f64 {
        quarter_entries(quarter, self.income).map(|e| e.amount).sum()
    }

    /// Reserve split off the quarter's entries plus manual tax payments for it
    pub fn quarter_payments(&self, quarter: &QuarterLabel) -> f64 {
        quarter_payments(quarter, self.income, self.payments)
    }

    pub fn quarter_balance(&self, quarter: &QuarterLabel) -> f64 {
        if let Some(balance) = self.settings.override_for(quarter) {
            return balance;
        }

        if self.settings.tax_reserve_paused {
            return 0.0;
        }

        let liability = self.self_employment_income(quarter) * self.settings.tax_rate;
        (liability - self.quarter_payments(quarter)).max(0.0)
    }

    pub fn quarter_status(&self, quarter: QuarterLabel, today: NaiveDate) -> QuarterStatus {
        let due_date = quarter.due_date();
        let balance = self.quarter_balance(&quarter);
        let paid_to_date = self.quarter_payments(&quarter);
        let is_paid = balance <= 0.0;
        let goal = self.settings.quarterly_tax_goal;

        QuarterStatus {
            quarter,
            due_date,
            balance,
            paid_to_date,
            is_paid,
            is_overdue: due_date < today && !is_paid,
            is_current: QuarterLabel::containing(today) == quarter,
            percent_to_goal: if goal > 0.0 { paid_to_date / goal * 100.0 } else { 0.0 },
        }
    }

    /// Status for all four quarters of a year
    pub fn year_statuses(&self, year: i32, today: NaiveDate) -> Vec<QuarterStatus> {
        QuarterLabel::year_quarters(year)
            .into_iter()
            .map(|q| self.quarter_status(q, today))
            .collect()
    }

    /// Quarters of a year that are past due with a balance; empty while the reserve is paused
    pub fn overdue(&self, year: i32, today: NaiveDate) -> OverdueSummary {
        if self.settings.tax_reserve_paused {
            return OverdueSummary::default();
        }

        let quarters: Vec<OverdueQuarter> = QuarterLabel::year_quarters(year)
            .into_iter()
            .filter_map(|quarter| {
                let balance = self.quarter_balance(&quarter);
                let due = quarter.due_date();
                (balance > 0.0 && due < today).then(|| OverdueQuarter {
                    quarter,
                    balance,
                    days_overdue: (today - due).num_days(),
                })
            })
            .collect();

        if !quarters.is_empty() {
            log::warn!("{} quarter(s) of {} are overdue", quarters.len(), year);
        }

        OverdueSummary {
            total_unpaid: quarters.iter().map(|q| q.balance).sum(),
            quarters,
        }
    }

    /// Totals per self-employment category across the whole history
    pub fn breakdown(&self) -> Vec<SelfEmploymentBreakdown> {
        [IncomeType::Commission, IncomeType::Override, IncomeType::Other1099]
            .into_iter()
            .filter_map(|income_type| {
                let entries: Vec<&IncomeEntry> = self
                    .income
                    .iter()
                    .filter(|e| e.income_type == income_type)
                    .collect();
                (!entries.is_empty()).then(|| SelfEmploymentBreakdown {
                    income_type,
                    total: entries.iter().map(|e| e.amount).sum(),
                    tax_reserved: entries.iter().map(|e| e.tax).sum(),
                    count: entries.len(),
                })
            })
            .collect()
    }
}
