//! Error types for document mutations.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for document mutations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur when mutating the document.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// A trading day already exists for the given date.
    #[error("a trading day already exists for {0}")]
    DuplicateDay(NaiveDate),

    /// No trading day with the given id.
    #[error("no trading day with id {0}")]
    DayNotFound(String),

    /// No entry with the given id in the given day.
    #[error("no entry with id {entry_id} in day {day_id}")]
    EntryNotFound {
        /// The day that was searched.
        day_id: String,
        /// The entry that was not found.
        entry_id: String,
    },

    /// No bill with the given id.
    #[error("no bill with id {0}")]
    BillNotFound(String),

    /// A monetary value must be strictly positive.
    #[error("value must be positive, got {0}")]
    NonPositiveValue(f64),
}
