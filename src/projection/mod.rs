//! Debt payoff projection: ordering, month-by-month simulation, and the
//! required-payment solver

mod engine;
mod ordering;
mod solver;
mod state;
mod timeline;

pub use engine::{PayoffConfig, PayoffSimulator, Simulate, DEFAULT_HORIZON_MONTHS};
pub use ordering::{order, order_indices, priority_index, Strategy};
pub use solver::{solve_for_date, RequiredPayment};
pub use state::{step, PayoffState};
pub use timeline::{MonthRow, PayoffOutcome, PayoffResult};
