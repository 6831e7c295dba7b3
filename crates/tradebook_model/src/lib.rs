//! # Tradebook Model
//!
//! The user-data document aggregate and its operations.
//!
//! A [`UserDataDocument`] holds everything a user owns: the account setup,
//! the trading days with their entries, deposits and withdrawals, the
//! derived operations log, and personal bills. The document is the **only
//! unit of synchronization** — no sub-entity is synchronized on its own,
//! and every mutation is followed by a whole-document write.
//!
//! ## Design Principles
//!
//! - One aggregate, serialized as one JSON value
//! - Field names match the wire shape other devices write (camelCase)
//! - Content identity is equality of canonical JSON text
//! - Mutations validate (duplicate dates, unknown ids) but derived
//!   figures never fail
//!
//! ## Example
//!
//! ```rust
//! use tradebook_model::UserDataDocument;
//!
//! let mut doc = UserDataDocument::default();
//! doc.configure(1000.0, 10.0, 5.0);
//! assert!(doc.setup.configured);
//! assert_eq!(doc.current_bank(), 1000.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod id;
mod types;

pub use document::canonical_json_of;
pub use error::{ModelError, ModelResult};
pub use id::generate_id;
pub use types::{
    Bill, BillCategory, BillStatus, CashMovement, DayEntry, Financial, MovementKind,
    OperationKind, OperationRecord, PaymentMethod, Period, Setup, TradeResult, TradingDay,
    UserDataDocument,
};
