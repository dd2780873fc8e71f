//! In-memory household snapshot and the operations that change it
//!
//! Projections only ever read a snapshot (or clone its debts). The `record_*`
//! methods here are the single-writer mutations: recording income applies its
//! debt share to the live balances, and manual payments reduce a named debt.
//! The remaining methods maintain the ledger itself: adding, editing, and
//! removing debts, deleting history entries, and clearing income history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::debt::{apply_debt_payment, pay_debt, Debt};
use super::income::{IncomeEntry, IncomeRequest};
use super::payment::{Payment, PaymentKind};
use crate::error::{EngineError, Result};
use crate::settings::EngineSettings;
use crate::tax::QuarterLabel;

/// Changes to an existing debt; `None` fields are left as they are
#[derive(Debug, Clone, Default)]
pub struct DebtUpdate {
    pub name: Option<String>,
    pub balance: Option<f64>,
    pub annual_rate: Option<f64>,
    pub min_payment: Option<f64>,
}

fn check_debt_figures(debt: &Debt) -> Result<()> {
    let finite = debt.balance.is_finite()
        && debt.annual_rate.is_finite()
        && debt.min_payment.is_finite();
    if !finite || debt.balance < 0.0 || debt.annual_rate < 0.0 || debt.min_payment < 0.0 {
        return Err(EngineError::Validation(format!(
            "debt '{}' has a negative or non-finite balance, rate, or minimum",
            debt.name
        )));
    }
    Ok(())
}

/// Debts, income history, payment history, and settings at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub debts: Vec<Debt>,
    /// Income events, newest first
    pub income: Vec<IncomeEntry>,
    /// Manual payments, newest first
    pub payments: Vec<Payment>,
    pub settings: EngineSettings,
}

impl Snapshot {
    /// The starting debt set the household plan ships with
    pub fn sample_debts() -> Vec<Debt> {
        vec![
            Debt::new(1, "IRS 2022", 10066.0, 0.07, 124.58),
            Debt::new(2, "IRS 2023", 13153.0, 0.07, 124.58),
            Debt::new(3, "IRS 2024", 33814.0, 0.07, 124.84),
            Debt::new(4, "Chase Card", 17968.0, 0.2924, 538.0),
        ]
    }

    /// Snapshot with the sample debts, no history, and default settings
    pub fn sample() -> Self {
        Self {
            debts: Self::sample_debts(),
            ..Self::default()
        }
    }

    /// Discard all history and settings and restore the sample debts,
    /// including their original balances
    pub fn reset_to_defaults(&mut self) {
        log::warn!("Resetting snapshot to defaults");
        *self = Self::sample();
    }

    /// Fill in fields older data may lack
    pub(crate) fn normalize(&mut self) {
        for debt in &mut self.debts {
            if debt.original_balance <= 0.0 {
                debt.original_balance = debt.balance;
            }
        }
    }

    /// Reject data the engine cannot project
    pub fn validate(&self) -> Result<()> {
        for (i, debt) in self.debts.iter().enumerate() {
            check_debt_figures(debt)?;
            if self.debts[..i].iter().any(|d| d.id == debt.id) {
                return Err(EngineError::Validation(format!(
                    "duplicate debt id {}",
                    debt.id
                )));
            }
        }

        for entry in &self.income {
            if !entry.amount.is_finite() {
                return Err(EngineError::Validation(format!(
                    "income entry {} has a non-finite amount",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    /// Next free identifier for income and payment events
    fn next_event_id(&self) -> u64 {
        let income_max = self.income.iter().map(|e| e.id).max().unwrap_or(0);
        let payment_max = self.payments.iter().map(|p| p.id).max().unwrap_or(0);
        income_max.max(payment_max) + 1
    }

    /// Record an income event and, unless it is overridden, apply its debt share
    pub fn record_income(&mut self, request: IncomeRequest) -> Result<&IncomeEntry> {
        let entry = IncomeEntry::record(self.next_event_id(), request, &self.settings)?;
        log::info!(
            "Recorded {} income of {:.2}{}",
            entry.income_type.label(),
            entry.amount,
            if entry.override_debt_reduction { " (debt override)" } else { "" }
        );

        if entry.counts_toward_debt() {
            apply_debt_payment(&mut self.debts, entry.debt, self.settings.strategy);
        }

        self.income.insert(0, entry);
        Ok(&self.income[0])
    }

    /// Record a manual payment against one debt. Returns its remaining balance.
    pub fn record_debt_payment(
        &mut self,
        debt_id: u32,
        date: NaiveDate,
        amount: f64,
        notes: &str,
    ) -> Result<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EngineError::Validation(format!(
                "payment amount must be positive, got {}",
                amount
            )));
        }

        let name = self
            .debts
            .iter()
            .find(|d| d.id == debt_id)
            .map(|d| d.name.clone())
            .ok_or_else(|| EngineError::DebtNotFound(debt_id.to_string()))?;

        let remaining = pay_debt(&mut self.debts, debt_id, amount)?;
        let payment = Payment::debt(self.next_event_id(), date, &name, amount).with_notes(notes);
        self.payments.insert(0, payment);

        log::info!("Debt payment of {:.2} applied to {}, {:.2} remaining", amount, name, remaining);
        Ok(remaining)
    }

    /// Record an estimated tax payment for a quarter
    pub fn record_tax_payment(
        &mut self,
        quarter: QuarterLabel,
        date: NaiveDate,
        amount: f64,
        notes: &str,
    ) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EngineError::Validation(format!(
                "payment amount must be positive, got {}",
                amount
            )));
        }

        let payment = Payment::tax(self.next_event_id(), date, quarter, amount).with_notes(notes);
        self.payments.insert(0, payment);
        log::info!("Tax payment of {:.2} recorded for {}", amount, quarter);
        Ok(())
    }

    /// Add a debt with the next free id. Its original balance is the opening balance.
    pub fn add_debt(
        &mut self,
        name: &str,
        balance: f64,
        annual_rate: f64,
        min_payment: f64,
    ) -> Result<u32> {
        if name.trim().is_empty() {
            return Err(EngineError::Validation("debt name must not be blank".into()));
        }
        let id = self.debts.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        let debt = Debt::new(id, name.trim(), balance, annual_rate, min_payment);
        check_debt_figures(&debt)?;
        if debt.balance == 0.0 {
            return Err(EngineError::Validation(format!(
                "debt '{}' needs a positive balance",
                debt.name
            )));
        }

        log::info!("Added debt {} '{}' with balance {:.2}", id, debt.name, debt.balance);
        self.debts.push(debt);
        Ok(id)
    }

    /// Edit a debt in place. The original balance is left untouched.
    pub fn update_debt(&mut self, id: u32, update: DebtUpdate) -> Result<&Debt> {
        let idx = self
            .debts
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| EngineError::DebtNotFound(id.to_string()))?;

        let mut debt = self.debts[idx].clone();
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(EngineError::Validation("debt name must not be blank".into()));
            }
            debt.name = name.trim().to_string();
        }
        debt.balance = update.balance.unwrap_or(debt.balance);
        debt.annual_rate = update.annual_rate.unwrap_or(debt.annual_rate);
        debt.min_payment = update.min_payment.unwrap_or(debt.min_payment);
        check_debt_figures(&debt)?;

        log::info!("Updated debt {} '{}', balance {:.2}", id, debt.name, debt.balance);
        self.debts[idx] = debt;
        Ok(&self.debts[idx])
    }

    /// Remove a debt and return it
    pub fn remove_debt(&mut self, id: u32) -> Result<Debt> {
        let idx = self
            .debts
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| EngineError::DebtNotFound(id.to_string()))?;
        let debt = self.debts.remove(idx);
        log::info!("Removed debt {} '{}' with {:.2} outstanding", id, debt.name, debt.balance);
        Ok(debt)
    }

    /// Delete an income entry.
    ///
    /// Its debt share stays applied; only the history changes. Quarterly tax
    /// figures are recomputed from history, so a deleted 1099 entry stops
    /// counting toward its quarter immediately.
    pub fn delete_income(&mut self, id: u64) -> Result<IncomeEntry> {
        let idx = self
            .income
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EngineError::Validation(format!("no income entry with id {}", id)))?;
        let entry = self.income.remove(idx);
        log::info!(
            "Deleted {} income entry {} of {:.2}{}",
            entry.income_type.label(),
            id,
            entry.amount,
            if entry.override_debt_reduction { " (was override)" } else { "" }
        );
        Ok(entry)
    }

    /// Delete a manual payment record. A deleted tax payment no longer counts
    /// toward its quarter; a deleted debt payment leaves the balance as it is.
    pub fn delete_payment(&mut self, id: u64) -> Result<Payment> {
        let idx = self
            .payments
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| EngineError::Validation(format!("no payment with id {}", id)))?;
        let payment = self.payments.remove(idx);
        log::info!(
            "Deleted {} payment {} of {:.2} ({})",
            if payment.kind == PaymentKind::Tax { "tax" } else { "debt" },
            id,
            payment.amount,
            payment.account
        );
        Ok(payment)
    }

    /// Clear all income history and put every remaining debt back at its
    /// original balance. Payments and settings are kept. Returns the number of
    /// entries cleared.
    pub fn clear_income_history(&mut self) -> usize {
        let cleared = self.income.len();
        let total: f64 = self.income.iter().map(|e| e.amount).sum();
        self.income.clear();
        for debt in &mut self.debts {
            if debt.original_balance > 0.0 {
                debt.balance = debt.original_balance;
            }
        }
        log::info!("Cleared {} income entries totaling {:.2}", cleared, total);
        cleared
    }
}
