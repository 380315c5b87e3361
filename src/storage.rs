use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::rows::LedgerRow;

/// fixed wire layout of the schedule table: 17 columns, in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Column {
    Period = 0,
    PeriodEnd,
    DueDate,
    Days,
    PaidOn,
    TotalDue,
    TotalPaid,
    PrincipalDue,
    PrincipalPaid,
    InterestDue,
    InterestPaid,
    FeesDue,
    FeesPaid,
    InterestBalance,
    PrincipalBalance,
    TotalBalance,
    Notes,
}

pub const COLUMN_COUNT: usize = 17;

/// a single stored cell, as a tabular backend would hold it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl Cell {
    fn from_money(m: Money) -> Cell {
        if m.is_zero() {
            Cell::Empty
        } else {
            Cell::Number(m.as_decimal())
        }
    }

    fn from_opt_date(d: Option<NaiveDate>) -> Cell {
        d.map(Cell::Date).unwrap_or(Cell::Empty)
    }

    /// numeric view; text that parses as a number counts, anything else is absent
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Number(d) => Some(*d),
            Cell::Text(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    /// date view; malformed text degrades to absent rather than an error
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Money {
        self.as_number().map(Money::from_decimal).unwrap_or(Money::ZERO)
    }

    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(d) => d.to_string(),
            Cell::Date(d) => d.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// serialize a row into its 17-column wire form
pub fn row_to_cells(row: &LedgerRow) -> Vec<Cell> {
    vec![
        row.period.map(Cell::Number).unwrap_or(Cell::Empty),
        Cell::from_opt_date(row.period_end),
        Cell::from_opt_date(row.due_date),
        Cell::Number(Decimal::from(row.approx_days)),
        Cell::from_opt_date(row.paid_on),
        Cell::from_money(row.total_due),
        Cell::from_money(row.total_paid),
        Cell::from_money(row.principal_due),
        Cell::from_money(row.principal_paid),
        Cell::from_money(row.interest_due),
        Cell::from_money(row.interest_paid),
        Cell::from_money(row.fees_due),
        Cell::from_money(row.fees_paid),
        Cell::from_money(row.interest_balance),
        Cell::from_money(row.principal_balance),
        Cell::from_money(row.total_balance),
        if row.notes.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(row.notes.clone())
        },
    ]
}

/// deserialize a 17-column wire row; only a wrong arity is an error —
/// malformed cell contents degrade to blank/zero
pub fn row_from_cells(cells: &[Cell]) -> Result<LedgerRow> {
    if cells.len() != COLUMN_COUNT {
        return Err(LedgerError::WrongColumnCount {
            expected: COLUMN_COUNT,
            got: cells.len(),
        });
    }

    Ok(LedgerRow {
        period: cells[Column::Period as usize].as_number(),
        period_end: cells[Column::PeriodEnd as usize].as_date(),
        due_date: cells[Column::DueDate as usize].as_date(),
        approx_days: cells[Column::Days as usize]
            .as_number()
            .and_then(|d| d.to_i64())
            .unwrap_or(0),
        paid_on: cells[Column::PaidOn as usize].as_date(),
        total_due: cells[Column::TotalDue as usize].as_money(),
        total_paid: cells[Column::TotalPaid as usize].as_money(),
        principal_due: cells[Column::PrincipalDue as usize].as_money(),
        principal_paid: cells[Column::PrincipalPaid as usize].as_money(),
        interest_due: cells[Column::InterestDue as usize].as_money(),
        interest_paid: cells[Column::InterestPaid as usize].as_money(),
        fees_due: cells[Column::FeesDue as usize].as_money(),
        fees_paid: cells[Column::FeesPaid as usize].as_money(),
        interest_balance: cells[Column::InterestBalance as usize].as_money(),
        principal_balance: cells[Column::PrincipalBalance as usize].as_money(),
        total_balance: cells[Column::TotalBalance as usize].as_money(),
        notes: cells[Column::Notes as usize].as_text(),
        has_reamortized: false,
    })
}

/// tabular backend contract: bulk range read and write of cell matrices
pub trait RowStore {
    fn get_values(&self, start_row: usize, num_rows: usize) -> Vec<Vec<Cell>>;
    fn set_values(&mut self, start_row: usize, matrix: Vec<Vec<Cell>>);
    fn row_count(&self) -> usize;
}

/// read the entire table into typed rows
pub fn load_rows(store: &dyn RowStore) -> Result<Vec<LedgerRow>> {
    store
        .get_values(0, store.row_count())
        .iter()
        .map(|cells| row_from_cells(cells))
        .collect()
}

/// write typed rows back over the entire table
pub fn save_rows(store: &mut dyn RowStore, rows: &[LedgerRow]) {
    store.set_values(0, rows.iter().map(row_to_cells).collect());
}

/// in-memory backend used by tests and demo programs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cells: Vec<Vec<Cell>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: &[LedgerRow]) -> Self {
        Self {
            cells: rows.iter().map(row_to_cells).collect(),
        }
    }
}

impl RowStore for MemoryStore {
    fn get_values(&self, start_row: usize, num_rows: usize) -> Vec<Vec<Cell>> {
        let end = (start_row + num_rows).min(self.cells.len());
        self.cells
            .get(start_row..end)
            .map(|s| s.to_vec())
            .unwrap_or_default()
    }

    fn set_values(&mut self, start_row: usize, matrix: Vec<Vec<Cell>>) {
        let needed = start_row + matrix.len();
        if self.cells.len() < needed {
            self.cells.resize(needed, Vec::new());
        }
        for (offset, row) in matrix.into_iter().enumerate() {
            self.cells[start_row + offset] = row;
        }
    }

    fn row_count(&self) -> usize {
        self.cells.len()
    }
}
