//! Calendar quarters and their estimated-tax due dates

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the four calendar quarters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Quarter containing a calendar month (1-12)
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn number(&self) -> u32 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }
}

/// A specific quarter of a specific year, written `Q1 2025`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuarterLabel {
    pub year: i32,
    pub quarter: Quarter,
}

impl QuarterLabel {
    pub fn new(year: i32, quarter: Quarter) -> Self {
        Self { year, quarter }
    }

    /// Quarter a date falls in, by calendar month of that date's year
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), Quarter::from_month(date.month()))
    }

    /// Whether a date falls in this quarter
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }

    /// The four quarters of a year, in order
    pub fn year_quarters(year: i32) -> [QuarterLabel; 4] {
        Quarter::ALL.map(|q| QuarterLabel::new(year, q))
    }

    /// Estimated payment due date: Apr 15, Jun 15, Sep 15, and Jan 15 of the next year
    pub fn due_date(&self) -> NaiveDate {
        let (year, month) = match self.quarter {
            Quarter::Q1 => (self.year, 4),
            Quarter::Q2 => (self.year, 6),
            Quarter::Q3 => (self.year, 9),
            Quarter::Q4 => (self.year + 1, 1),
        };
        // Years outside chrono's range saturate
        NaiveDate::from_ymd_opt(year, month, 15).unwrap_or(NaiveDate::MAX)
    }

    /// Days from `today` to the due date; negative once the date has passed
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date() - today).num_days()
    }
}

impl fmt::Display for QuarterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter.number(), self.year)
    }
}

impl FromStr for QuarterLabel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidQuarter(s.to_string());
        let mut parts = s.split_whitespace();
        let (Some(q), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let quarter = match q.to_ascii_uppercase().as_str() {
            "Q1" => Quarter::Q1,
            "Q2" => Quarter::Q2,
            "Q3" => Quarter::Q3,
            "Q4" => Quarter::Q4,
            _ => return Err(invalid()),
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Ok(Self::new(year, quarter))
    }
}

impl TryFrom<String> for QuarterLabel {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuarterLabel> for String {
    fn from(label: QuarterLabel) -> Self {
        label.to_string()
    }
}
