//! # Error Types Module
//!
//! Typed errors for the quote wizard. Input errors are recovered by
//! re-prompting the user, pricing errors abort a single quote, and admin
//! errors are reported back to the caller without touching the price table.

use thiserror::Error;

/// Rejected free-text input (area or price value)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("input is empty")]
    Empty,
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("value must be greater than zero: {0}")]
    NotPositive(f64),
    #[error("value must not be negative: {0}")]
    Negative(f64),
    #[error("value {value} exceeds the maximum of {max}")]
    TooLarge { value: f64, max: f64 },
}

/// Failure to price a completed selection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("service not found: {0}")]
    ServiceNotFound(String),
    #[error("service {0} is not a base cleaning type")]
    NotABaseService(String),
    #[error("service {0} is not an add-on")]
    NotAnAddon(String),
    #[error("no base cleaning type selected")]
    MissingBaseType,
}

/// Failure of an administrative price update
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("user {0} is not allowed to edit prices")]
    Unauthorized(i64),
    #[error("invalid price: {0}")]
    InvalidValue(#[from] InputError),
    #[error("price key not found: {0}")]
    UnknownKey(String),
    #[error("price table error: {0}")]
    Storage(#[from] anyhow::Error),
}
