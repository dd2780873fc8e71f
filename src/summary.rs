//! Headline figures: debt totals, health grades, payoff dates, and the outlook
//!
//! Everything here is read-only over a snapshot or a finished projection.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::averages::{average_monthly_debt_payment, average_monthly_income, excluded_debt_allocation};
use crate::ledger::{total_balance, total_min_payments, total_monthly_interest, Debt, Snapshot};
use crate::projection::PayoffResult;
use crate::scenario::{Opportunity, ScenarioRunner};
use crate::settings::StatusThresholds;

/// Sentinel returned by the closed-form estimate when payments never outrun interest
pub const NAIVE_NEVER: u32 = 999;

/// Weeks per month used for the weekly interest figure
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Days per month used for the daily interest figure
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Three-way grade for a headline figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Good,
    Warning,
    Bad,
}

impl Health {
    /// Grade a figure where lower is better
    fn lower_is_better(value: f64, warning: f64, bad: f64) -> Self {
        if value < warning {
            Health::Good
        } else if value < bad {
            Health::Warning
        } else {
            Health::Bad
        }
    }
}

/// Totals across the debt set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtSummary {
    pub count: usize,
    pub total_balance: f64,
    pub original_total: f64,
    pub paid_off: f64,
    /// Percent of the original total paid off
    pub progress_percent: f64,
    /// Balance-weighted annual rate
    pub weighted_rate: f64,
    pub total_min_payments: f64,
    pub monthly_interest: f64,
    pub weekly_interest: f64,
    pub daily_interest: f64,
}

impl DebtSummary {
    pub fn from_debts(debts: &[Debt]) -> Self {
        let total = total_balance(debts);
        let original_total: f64 = debts
            .iter()
            .map(|d| if d.original_balance > 0.0 { d.original_balance } else { d.balance })
            .sum();
        let paid_off = (original_total - total).max(0.0);
        let weighted_rate = if total > 0.0 {
            debts.iter().map(|d| d.balance * d.annual_rate).sum::<f64>() / total
        } else {
            0.0
        };
        let monthly_interest = total_monthly_interest(debts);

        Self {
            count: debts.len(),
            total_balance: total,
            original_total,
            paid_off,
            progress_percent: if original_total > 0.0 { paid_off / original_total * 100.0 } else { 0.0 },
            weighted_rate,
            total_min_payments: total_min_payments(debts),
            monthly_interest,
            weekly_interest: monthly_interest / WEEKS_PER_MONTH,
            daily_interest: monthly_interest / DAYS_PER_MONTH,
        }
    }
}

/// Grades for the three headline figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderStatus {
    pub total_debt: Health,
    pub monthly_interest: Health,
    pub payoff: Health,
}

impl HeaderStatus {
    pub fn classify(summary: &DebtSummary, baseline: &PayoffResult, thresholds: &StatusThresholds) -> Self {
        let total_debt = if thresholds.use_percentage {
            match summary.progress_percent {
                p if p >= 50.0 => Health::Good,
                p if p >= 25.0 => Health::Warning,
                _ => Health::Bad,
            }
        } else {
            Health::lower_is_better(summary.total_balance, thresholds.debt_warning, thresholds.debt_bad)
        };

        Self {
            total_debt,
            monthly_interest: Health::lower_is_better(
                summary.monthly_interest,
                thresholds.interest_warning,
                thresholds.interest_bad,
            ),
            payoff: Health::lower_is_better(
                baseline.months as f64,
                thresholds.payoff_months_warning as f64,
                thresholds.payoff_months_bad as f64,
            ),
        }
    }
}

/// Calendar date `months` after today, or `None` when the debts never clear
pub fn payoff_date(today: NaiveDate, result: &PayoffResult) -> Option<NaiveDate> {
    let months = result.payoff_months()?;
    today.checked_add_months(Months::new(months))
}

/// "2 years 3 months", "1 year 0 months", "5 months", "1 month"
pub fn duration_text(months: u32) -> String {
    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("{} {}", n, unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    let (years, rest) = (months / 12, months % 12);
    if years > 0 {
        format!("{} {}", plural(years, "year"), plural(rest, "month"))
    } else {
        plural(rest, "month")
    }
}

/// Closed-form payoff estimate ignoring interest decline as balances fall.
///
/// Returns [`NAIVE_NEVER`] when the payment does not exceed the interest.
pub fn naive_payoff_months(total_debt: f64, monthly_payment: f64, monthly_interest: f64) -> u32 {
    if monthly_payment <= monthly_interest {
        return NAIVE_NEVER;
    }
    (total_debt / (monthly_payment - monthly_interest)).ceil() as u32
}

/// What the default debt split would achieve at the average monthly income.
///
/// A rough closed-form figure: interest is held at today's level for the whole
/// payoff, unlike the month-by-month projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsPreview {
    /// Debt percentage of the default split
    pub debt_percent: f64,
    pub monthly_debt_payment: f64,
    pub monthly_interest: f64,
    /// Monthly payment minus monthly interest
    pub net_payoff_rate: f64,
    /// [`NAIVE_NEVER`] when the payment does not outrun interest
    pub months: u32,
    pub duration: String,
    /// The tax share is going to flexible spending instead of the reserve
    pub tax_reserve_paused: bool,
    pub tax_percent: f64,
}

impl SettingsPreview {
    pub fn build(snapshot: &Snapshot) -> Self {
        let splits = &snapshot.settings.default_splits;
        let monthly_debt_payment = average_monthly_income(&snapshot.income) * splits.debt / 100.0;
        let monthly_interest = total_monthly_interest(&snapshot.debts);
        let months = naive_payoff_months(total_balance(&snapshot.debts), monthly_debt_payment, monthly_interest);

        Self {
            debt_percent: splits.debt,
            monthly_debt_payment,
            monthly_interest,
            net_payoff_rate: monthly_debt_payment - monthly_interest,
            months,
            duration: duration_text(months),
            tax_reserve_paused: snapshot.settings.tax_reserve_paused,
            tax_percent: splits.tax,
        }
    }

    /// Whether the payment reduces principal at all
    pub fn makes_progress(&self) -> bool {
        self.net_payoff_rate > 0.0
    }
}

/// Narrative figures for the household overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outlook {
    pub months_to_freedom: u32,
    pub debt_free: bool,
    pub duration: String,
    pub debt_free_by: Option<NaiveDate>,
    pub average_monthly_income: f64,
    pub average_monthly_debt_payment: f64,
    pub interest_next_three_months: f64,
    /// Average debt payment minus monthly interest; not positive means no principal progress
    pub net_payoff_rate: f64,
    pub excluded_entries: usize,
    pub excluded_debt_allocation: f64,
    pub opportunity: Option<Opportunity>,
}

impl Outlook {
    pub fn build(snapshot: &Snapshot, today: NaiveDate) -> Self {
        let runner = ScenarioRunner::from_snapshot(snapshot);
        let baseline = runner.baseline();
        let monthly_interest = total_monthly_interest(&snapshot.debts);
        let average_debt = average_monthly_debt_payment(&snapshot.income);
        let (excluded_entries, excluded_debt) = excluded_debt_allocation(&snapshot.income);

        Self {
            months_to_freedom: baseline.months,
            debt_free: baseline.converged,
            duration: duration_text(baseline.months),
            debt_free_by: payoff_date(today, &baseline),
            average_monthly_income: average_monthly_income(&snapshot.income),
            average_monthly_debt_payment: average_debt,
            interest_next_three_months: monthly_interest * 3.0,
            net_payoff_rate: average_debt - monthly_interest,
            excluded_entries,
            excluded_debt_allocation: excluded_debt,
            opportunity: runner.opportunity(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn result(months: u32, converged: bool) -> PayoffResult {
        PayoffResult {
            months,
            converged,
            ..PayoffResult::new()
        }
    }

    #[test]
    fn test_debt_summary() {
        let mut debts = vec![
            Debt::new(1, "Card", 3000.0, 0.24, 90.0),
            Debt::new(2, "Loan", 1000.0, 0.04, 30.0),
        ];
        debts[0].balance = 2000.0;
        let summary = DebtSummary::from_debts(&debts);

        assert_eq!(summary.count, 2);
        assert_abs_diff_eq!(summary.total_balance, 3000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.paid_off, 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.progress_percent, 25.0, epsilon = 1e-9);
        // (2000 * 0.24 + 1000 * 0.04) / 3000
        assert_abs_diff_eq!(summary.weighted_rate, 520.0 / 3000.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.monthly_interest, 520.0 / 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.weekly_interest, 520.0 / 12.0 / 4.33, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.daily_interest, 520.0 / 12.0 / 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = DebtSummary::from_debts(&[]);
        assert_eq!(summary.total_balance, 0.0);
        assert_eq!(summary.weighted_rate, 0.0);
        assert_eq!(summary.progress_percent, 0.0);
    }

    #[test]
    fn test_header_status_dollar_mode() {
        let thresholds = StatusThresholds::default();
        let debts = vec![Debt::new(1, "Card", 40_000.0, 0.12, 500.0)];
        let summary = DebtSummary::from_debts(&debts);
        let status = HeaderStatus::classify(&summary, &result(20, true), &thresholds);

        assert_eq!(status.total_debt, Health::Warning);
        // 400 a month of interest
        assert_eq!(status.monthly_interest, Health::Good);
        assert_eq!(status.payoff, Health::Good);

        let never = HeaderStatus::classify(&summary, &result(360, false), &thresholds);
        assert_eq!(never.payoff, Health::Bad);
    }

    #[test]
    fn test_header_status_percentage_mode() {
        let thresholds = StatusThresholds {
            use_percentage: true,
            ..Default::default()
        };
        let mut debts = vec![Debt::new(1, "Card", 100_000.0, 0.12, 500.0)];
        debts[0].balance = 50_000.0;
        let status = HeaderStatus::classify(&DebtSummary::from_debts(&debts), &result(30, true), &thresholds);

        assert_eq!(status.total_debt, Health::Good);
        assert_eq!(status.payoff, Health::Warning);
    }

    #[test]
    fn test_payoff_date() {
        let today = ymd(2025, 1, 31);
        assert_eq!(payoff_date(today, &result(1, true)), Some(ymd(2025, 2, 28)));
        assert_eq!(payoff_date(today, &result(12, true)), Some(ymd(2026, 1, 31)));
        assert_eq!(payoff_date(today, &result(360, false)), None);
    }

    #[test]
    fn test_duration_text() {
        assert_eq!(duration_text(0), "0 months");
        assert_eq!(duration_text(1), "1 month");
        assert_eq!(duration_text(12), "1 year 0 months");
        assert_eq!(duration_text(25), "2 years 1 month");
        assert_eq!(duration_text(38), "3 years 2 months");
    }

    #[test]
    fn test_naive_payoff_months() {
        assert_eq!(naive_payoff_months(10_000.0, 100.0, 100.0), NAIVE_NEVER);
        assert_eq!(naive_payoff_months(10_000.0, 50.0, 100.0), NAIVE_NEVER);
        assert_eq!(naive_payoff_months(10_000.0, 600.0, 100.0), 20);
        assert_eq!(naive_payoff_months(10_000.0, 700.0, 100.0), 17);
    }

    #[test]
    fn test_settings_preview_from_placeholder_income() {
        let mut snapshot = Snapshot::default();
        snapshot.debts = vec![Debt::new(1, "Card", 12_000.0, 0.06, 100.0)];
        let preview = SettingsPreview::build(&snapshot);

        // No history: 2000 placeholder income at the default 30% debt split
        assert_abs_diff_eq!(preview.monthly_debt_payment, 600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(preview.monthly_interest, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(preview.net_payoff_rate, 540.0, epsilon = 1e-9);
        assert!(preview.makes_progress());
        // 12000 / 540 = 22.2
        assert_eq!(preview.months, 23);
        assert_eq!(preview.duration, "1 year 11 months");
        assert!(!preview.tax_reserve_paused);
    }

    #[test]
    fn test_settings_preview_when_payment_only_covers_interest() {
        let mut snapshot = Snapshot::sample();
        snapshot.settings.tax_reserve_paused = true;
        let preview = SettingsPreview::build(&snapshot);

        // 600 a month against roughly 770 of interest on the sample debts
        assert!(preview.monthly_debt_payment <= preview.monthly_interest);
        assert!(!preview.makes_progress());
        assert_eq!(preview.months, NAIVE_NEVER);
        assert!(preview.tax_reserve_paused);
    }

    #[test]
    fn test_outlook_without_income_never_pays_off() {
        let snapshot = Snapshot::sample();
        let outlook = Outlook::build(&snapshot, ymd(2025, 1, 1));

        // No history means no baseline payment
        assert!(!outlook.debt_free);
        assert_eq!(outlook.debt_free_by, None);
        assert_eq!(outlook.average_monthly_income, crate::averages::PREVIEW_MONTHLY_INCOME);
        assert!(outlook.net_payoff_rate < 0.0);
        assert_eq!(outlook.excluded_entries, 0);
    }
}
