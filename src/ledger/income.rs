//! Income entries and split allocation
//!
//! Every income event is divided into tithe, tax reserve, debt, and flexible
//! portions at the moment it is recorded. The money fields are fixed from then on.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::settings::EngineSettings;

/// Tolerance when checking that split percentages total 100
const SPLIT_TOLERANCE: f64 = 0.01;

/// Category of an income event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeType {
    Salary,
    Commission,
    Override,
    Bonus,
    Distribution,
    #[serde(rename = "other-w2")]
    OtherW2,
    #[serde(rename = "other-1099")]
    Other1099,
    /// Fallback for missing or unrecognised categories
    #[serde(other)]
    Other,
}

impl IncomeType {
    /// All categories in display order
    pub const ALL: [IncomeType; 8] = [
        IncomeType::Salary,
        IncomeType::Override,
        IncomeType::Commission,
        IncomeType::Distribution,
        IncomeType::Bonus,
        IncomeType::OtherW2,
        IncomeType::Other1099,
        IncomeType::Other,
    ];

    /// 1099-like income, subject to quarterly estimated tax
    pub fn is_self_employment(&self) -> bool {
        matches!(
            self,
            IncomeType::Commission | IncomeType::Override | IncomeType::Other1099
        )
    }

    /// Income whose tax is handled at source, so no reserve is split off by default
    pub fn is_withheld(&self) -> bool {
        matches!(
            self,
            IncomeType::Salary | IncomeType::Bonus | IncomeType::OtherW2 | IncomeType::Distribution
        )
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            IncomeType::Salary => "Salary (W-2)",
            IncomeType::Commission => "Commission (1099)",
            IncomeType::Override => "Override (1099)",
            IncomeType::Bonus => "Bonus (W-2)",
            IncomeType::Distribution => "Distribution (K-1)",
            IncomeType::OtherW2 => "Other (W-2)",
            IncomeType::Other1099 => "Other (1099)",
            IncomeType::Other => "Other",
        }
    }
}

impl FromStr for IncomeType {
    type Err = EngineError;

    /// Parse a category key. Unlike stored data, typed input must name a known category.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "salary" => Ok(IncomeType::Salary),
            "commission" => Ok(IncomeType::Commission),
            "override" => Ok(IncomeType::Override),
            "bonus" => Ok(IncomeType::Bonus),
            "distribution" => Ok(IncomeType::Distribution),
            "other-w2" => Ok(IncomeType::OtherW2),
            "other-1099" => Ok(IncomeType::Other1099),
            "other" => Ok(IncomeType::Other),
            other => Err(EngineError::Validation(format!("unknown income type: {}", other))),
        }
    }
}

/// Percentages of an income event sent to each bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Splits {
    pub tithe: f64,
    pub tax: f64,
    pub debt: f64,
    pub flexible: f64,
}

impl Default for Splits {
    fn default() -> Self {
        Self {
            tithe: 10.0,
            tax: 22.9,
            debt: 30.0,
            flexible: 37.1,
        }
    }
}

impl Splits {
    pub fn total(&self) -> f64 {
        self.tithe + self.tax + self.debt + self.flexible
    }

    /// Reject percentages that do not add up to 100
    pub fn validate(&self) -> Result<()> {
        let total = self.total();
        if (total - 100.0).abs() > SPLIT_TOLERANCE {
            return Err(EngineError::InvalidSplits { total });
        }
        Ok(())
    }

    /// Move the tax share into flexible spending
    fn redirect_tax_to_flexible(&mut self) {
        self.flexible += self.tax;
        self.tax = 0.0;
    }
}

/// How the splits for a new income event are chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitChoice {
    /// The household default, adjusted for the income category
    Default,
    /// Explicit percentages, used as given
    Custom(Splits),
}

/// Everything needed to record one income event
#[derive(Debug, Clone)]
pub struct IncomeRequest {
    pub date: NaiveDate,
    pub amount: f64,
    pub income_type: IncomeType,
    pub split: SplitChoice,
    /// Move this entry's tax share to flexible (1099-like income only)
    pub defer_tax: bool,
    /// When present, the debt share is kept out of automatic debt payment
    pub override_reason: Option<String>,
    pub notes: String,
}

impl IncomeRequest {
    /// Default-split request with no overrides
    pub fn new(date: NaiveDate, amount: f64, income_type: IncomeType) -> Self {
        Self {
            date,
            amount,
            income_type,
            split: SplitChoice::Default,
            defer_tax: false,
            override_reason: None,
            notes: String::new(),
        }
    }
}

/// A recorded income event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: u64,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type", default = "default_income_type")]
    pub income_type: IncomeType,
    #[serde(default)]
    pub splits: Splits,
    pub tithe: f64,
    pub tax: f64,
    pub debt: f64,
    pub flexible: f64,
    /// Debt share excluded from automatic debt payment
    #[serde(default)]
    pub override_debt_reduction: bool,
    #[serde(default)]
    pub override_reason: String,
    #[serde(default)]
    pub notes: String,
}

fn default_income_type() -> IncomeType {
    IncomeType::Other
}

impl IncomeEntry {
    /// Build an entry from a request, computing the split amounts once
    pub fn record(id: u64, request: IncomeRequest, settings: &EngineSettings) -> Result<Self> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(EngineError::Validation(format!(
                "income amount must be positive, got {}",
                request.amount
            )));
        }

        let override_reason = match request.override_reason {
            Some(reason) if reason.trim().is_empty() => {
                return Err(EngineError::Validation(
                    "a reason is required when overriding debt reduction".into(),
                ));
            }
            other => other,
        };

        let self_employment = request.income_type.is_self_employment();
        let mut splits = match request.split {
            SplitChoice::Default => {
                let mut splits = settings.default_splits;
                if request.income_type.is_withheld()
                    || (settings.tax_reserve_paused && self_employment)
                {
                    splits.redirect_tax_to_flexible();
                }
                splits
            }
            SplitChoice::Custom(splits) => {
                splits.validate()?;
                splits
            }
        };

        if request.defer_tax && self_employment {
            splits.redirect_tax_to_flexible();
        }

        let amount = request.amount;
        Ok(Self {
            id,
            date: request.date,
            amount,
            income_type: request.income_type,
            splits,
            tithe: amount * splits.tithe / 100.0,
            tax: amount * splits.tax / 100.0,
            debt: amount * splits.debt / 100.0,
            flexible: amount * splits.flexible / 100.0,
            override_debt_reduction: override_reason.is_some(),
            override_reason: override_reason.unwrap_or_default(),
            notes: request.notes,
        })
    }

    /// Whether this entry's debt share feeds automatic debt payment
    pub fn counts_toward_debt(&self) -> bool {
        !self.override_debt_reduction
    }
}
