use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("wrong column count: expected {expected}, got {got}")]
    WrongColumnCount { expected: usize, got: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount { amount: Money },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
