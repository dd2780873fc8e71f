//! Manual payments recorded against a debt or a tax quarter

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tax::QuarterLabel;

/// What a manual payment was made toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Debt,
    Tax,
}

/// A manual payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    /// Debt name for debt payments, quarter label (`Q1 2025`) for tax payments
    pub account: String,
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
}

impl Payment {
    /// Estimated tax payment credited to a quarter
    pub fn tax(id: u64, date: NaiveDate, quarter: QuarterLabel, amount: f64) -> Self {
        Self {
            id,
            date,
            kind: PaymentKind::Tax,
            account: quarter.to_string(),
            amount,
            notes: String::new(),
        }
    }

    /// Manual payment against a named debt
    pub fn debt(id: u64, date: NaiveDate, debt_name: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            date,
            kind: PaymentKind::Debt,
            account: debt_name.into(),
            amount,
            notes: String::new(),
        }
    }

    /// Attach free-text notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Whether this is a tax payment credited to the given quarter
    pub fn is_tax_for(&self, quarter: &QuarterLabel) -> bool {
        self.kind == PaymentKind::Tax && self.account == quarter.to_string()
    }
}
