//! Ledger data: debts, income events, manual payments, and snapshots

mod debt;
mod income;
mod payment;
mod snapshot;
pub mod loader;

pub use debt::{
    apply_debt_payment, pay_debt, total_balance, total_min_payments, total_monthly_interest, Debt,
};
pub use income::{IncomeEntry, IncomeRequest, IncomeType, SplitChoice, Splits};
pub use payment::{Payment, PaymentKind};
pub use snapshot::{DebtUpdate, Snapshot};
pub use loader::{load_snapshot, load_snapshot_from_reader, save_snapshot};
