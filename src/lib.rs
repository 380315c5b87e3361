pub mod config;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod recalc;
pub mod rows;
pub mod schedule;
pub mod storage;
pub mod types;

// re-export key types
pub use config::{LoanInput, LoanTerms};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use interest::{AccrualEngine, AnnuitySplit, PeriodBudget};
pub use recalc::{recalculate, recast, AllocationInput};
pub use rows::LedgerRow;
pub use schedule::{build, classify, generate, prepare_inserted_row, Classified};
pub use storage::{
    load_rows, row_from_cells, row_to_cells, save_rows, Cell, Column, MemoryStore, RowStore,
    COLUMN_COUNT,
};
pub use types::{DayCountMethod, DueSplit, LoanId, PaymentFrequency, RecalcSummary};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
