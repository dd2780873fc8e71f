//! Quarterly estimated-tax tracking for self-employment income

mod quarter;
mod liability;

pub use quarter::{Quarter, QuarterLabel};
pub use liability::{
    quarter_balance, quarter_payments, OverdueQuarter, OverdueSummary, QuarterState, QuarterStatus,
    SelfEmploymentBreakdown, TaxCalculator, TAX_RESERVE_RATE,
};
