//! # Tradebook Server
//!
//! In-process reference implementation of the remote document store.
//!
//! This crate provides:
//! - [`DocumentStore`] - anonymous identity issuance, keyed snapshot
//!   storage, per-identity change fan-out, outage injection
//! - [`LoopbackClient`] - the remote-tier adapter traits implemented
//!   directly against a shared store, no network involved
//!
//! The store mirrors the contract of the hosted document database the
//! production client talks to. Integration suites run the whole sync
//! stack against it; in a real deployment you would expose the same
//! operations behind HTTP endpoints.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod loopback;
mod store;

pub use error::{ServerError, ServerResult};
pub use loopback::LoopbackClient;
pub use store::DocumentStore;
