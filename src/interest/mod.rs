pub mod accrual;
pub mod annuity;

pub use accrual::{unpaid_days, AccrualEngine, PeriodBudget};
pub use annuity::{solve, AnnuitySplit};
