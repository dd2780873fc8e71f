//! Scenario runner for what-if and target-date projections
//!
//! Holds a copy of the debt set, the settings, and the baseline monthly payment,
//! then runs any number of simulations against them without touching the
//! household snapshot. Batch runs fan out across threads with rayon.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::averages::average_monthly_debt_payment;
use crate::ledger::{total_balance, total_min_payments, total_monthly_interest, Debt, Snapshot};
use crate::projection::{
    solve_for_date, PayoffConfig, PayoffResult, PayoffSimulator, RequiredPayment, Strategy,
};
use crate::settings::EngineSettings;
use crate::summary::payoff_date;

/// Smallest extra payment the opportunity suggestion will propose
pub const MIN_SUGGESTED_EXTRA: f64 = 100.0;

/// Share of monthly interest suggested as an extra payment
pub const SUGGESTED_INTEREST_SHARE: f64 = 0.5;

/// Baseline and adjusted projections side by side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIf {
    pub extra_payment: f64,
    pub target_debt: Option<u32>,
    pub baseline: PayoffResult,
    pub scenario: PayoffResult,
    /// Months sooner than baseline, never negative
    pub months_saved: u32,
    /// Baseline interest minus scenario interest
    pub interest_saved: f64,
}

impl WhatIf {
    fn new(extra_payment: f64, target_debt: Option<u32>, baseline: PayoffResult, scenario: PayoffResult) -> Self {
        Self {
            extra_payment,
            target_debt,
            months_saved: baseline.months.saturating_sub(scenario.months),
            interest_saved: baseline.total_interest - scenario.total_interest,
            baseline,
            scenario,
        }
    }
}

/// Payment needed to be debt-free by a date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateGoal {
    pub target_date: NaiveDate,
    /// Fractional months between today and the target, at least one
    pub months_available: f64,
    pub required: RequiredPayment,
    /// Required payment above the sum of minimums
    pub extra_needed: Option<f64>,
    /// Projection at the required payment
    pub projection: Option<PayoffResult>,
}

/// A suggested extra payment and what it would buy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub extra_payment: f64,
    pub months_saved: u32,
    pub debt_free_by: Option<NaiveDate>,
}

/// Result of one strategy in a strategy comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub result: PayoffResult,
}

/// Months between two dates, counting 30 days a month, never less than one
pub fn months_until(today: NaiveDate, target: NaiveDate) -> f64 {
    ((target - today).num_days() as f64 / 30.0).max(1.0)
}

/// Pre-loaded scenario runner for payoff projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_snapshot(&snapshot);
///
/// for extra in [100.0, 250.0, 500.0] {
///     let what_if = runner.compare(extra, None);
///     println!("{} months saved", what_if.months_saved);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    debts: Vec<Debt>,
    settings: EngineSettings,
    base_payment: f64,
}

impl ScenarioRunner {
    /// Create a runner spending `base_payment` a month before any extra
    pub fn new(debts: Vec<Debt>, settings: EngineSettings, base_payment: f64) -> Self {
        Self { debts, settings, base_payment }
    }

    /// Create a runner whose baseline is the snapshot's average monthly debt allocation
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let base_payment = average_monthly_debt_payment(&snapshot.income);
        log::debug!(
            "Scenario baseline {:.2}/month from {} income entries",
            base_payment,
            snapshot.income.len()
        );
        Self::new(snapshot.debts.clone(), snapshot.settings.clone(), base_payment)
    }

    /// Same debts and baseline under a different strategy
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            settings: self.settings.with_strategy(strategy),
            ..self.clone()
        }
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn base_payment(&self) -> f64 {
        self.base_payment
    }

    fn simulator(&self, detailed_output: bool) -> PayoffSimulator {
        let config = PayoffConfig {
            horizon_months: self.settings.horizon_months,
            detailed_output,
        };
        PayoffSimulator::with_config(self.settings.strategy, self.base_payment, config)
    }

    /// Run a single projection
    pub fn run(&self, extra_payment: f64, target_debt: Option<u32>) -> PayoffResult {
        self.simulator(false).project(&self.debts, extra_payment, target_debt)
    }

    /// Projection at the baseline payment
    pub fn baseline(&self) -> PayoffResult {
        self.run(0.0, None)
    }

    /// Projection with per-month rows
    pub fn timeline(&self, extra_payment: f64, target_debt: Option<u32>) -> PayoffResult {
        self.simulator(true).project(&self.debts, extra_payment, target_debt)
    }

    /// Remaining balance every `every` months over the first `months`,
    /// starting with today's balance as month 0
    pub fn balance_curve(&self, months: u32, every: u32) -> Vec<(u32, f64)> {
        let every = every.max(1);
        let timeline = self.timeline(0.0, None);
        let mut curve = vec![(0, total_balance(&self.debts))];
        curve.extend(
            timeline
                .rows
                .iter()
                .take_while(|row| row.month <= months)
                .filter(|row| row.month % every == 0)
                .map(|row| (row.month, row.closing_balance)),
        );
        curve
    }

    /// Compare an extra payment, optionally aimed at one debt, against the baseline
    pub fn compare(&self, extra_payment: f64, target_debt: Option<u32>) -> WhatIf {
        WhatIf::new(extra_payment, target_debt, self.baseline(), self.run(extra_payment, target_debt))
    }

    /// Compare many extra payment levels in parallel
    pub fn run_batch(&self, extras: &[f64]) -> Vec<WhatIf> {
        let baseline = self.baseline();
        extras
            .par_iter()
            .map(|&extra| WhatIf::new(extra, None, baseline.clone(), self.run(extra, None)))
            .collect()
    }

    /// Run the same extra payment under each ordering strategy
    pub fn compare_strategies(&self, extra_payment: f64) -> Vec<StrategyRun> {
        [Strategy::Snowball, Strategy::Avalanche]
            .par_iter()
            .map(|&strategy| StrategyRun {
                strategy,
                result: self.with_strategy(strategy).run(extra_payment, None),
            })
            .collect()
    }

    /// Total monthly payment needed to be debt-free by `target_date`
    pub fn solve_by_date(&self, today: NaiveDate, target_date: NaiveDate) -> DateGoal {
        let months_available = months_until(today, target_date);
        let minimums = total_min_payments(&self.debts);
        let simulator = self.simulator(false);
        let required = solve_for_date(&simulator, &self.debts, minimums, months_available);

        let (extra_needed, projection) = match required.total_payment() {
            Some(total) => {
                let extra = total - minimums;
                (Some(extra), Some(self.run(extra, None)))
            }
            None => (None, None),
        };

        DateGoal {
            target_date,
            months_available,
            required,
            extra_needed,
            projection,
        }
    }

    /// Suggested extra of half the monthly interest (at least 100), if it helps
    pub fn opportunity(&self, today: NaiveDate) -> Option<Opportunity> {
        let extra_payment = (total_monthly_interest(&self.debts) * SUGGESTED_INTEREST_SHARE).max(MIN_SUGGESTED_EXTRA);
        let what_if = self.compare(extra_payment, None);
        if what_if.months_saved == 0 {
            return None;
        }
        Some(Opportunity {
            extra_payment,
            months_saved: what_if.months_saved,
            debt_free_by: payoff_date(today, &what_if.scenario),
        })
    }
}
