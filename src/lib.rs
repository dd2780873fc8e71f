//! Payoff Engine - Debt payoff projections and quarterly tax liability for a household ledger
//!
//! This library provides:
//! - Snowball/avalanche debt ordering and month-by-month payoff simulation
//! - Required-payment solving for a target debt-free date
//! - What-if, batch, and strategy comparison runs
//! - Income recording with bucket splits and quarterly estimated-tax tracking
//! - Headline summaries with good/warning/bad grading

pub mod averages;
pub mod error;
pub mod ledger;
pub mod projection;
pub mod scenario;
pub mod settings;
pub mod summary;
pub mod tax;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use ledger::{Debt, IncomeEntry, IncomeRequest, IncomeType, Payment, Snapshot, SplitChoice, Splits};
pub use projection::{PayoffResult, PayoffSimulator, RequiredPayment, Simulate, Strategy};
pub use scenario::ScenarioRunner;
pub use settings::EngineSettings;
pub use tax::{QuarterLabel, TaxCalculator};
