//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`NotFound`] returned when an operation targets an unknown expense id.
//! - [`MalformedRecord`] returned when a fetched record misses required data.
//! - [`InvalidAmount`] and [`InvalidDate`] returned when user input or wire
//!   values cannot be converted.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`MalformedRecord`]: EngineError::MalformedRecord
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("\"{0}\" expense not found!")]
    NotFound(String),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
