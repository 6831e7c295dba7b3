//! # Tradebook Sync
//!
//! The reconciliation engine: keeps the user-data document consistent
//! across in-memory state, the durable local slot, and the remote
//! multi-device store, under intermittent connectivity.
//!
//! This crate provides:
//! - [`AppState`] - the owned application state with a single mutation
//!   entry point (synchronous local save, revision signal for the engine)
//! - [`ConnectivityMonitor`] - online/offline gating for remote legs
//! - [`ReconcilePrompt`] - asynchronous user confirmation for conflicts
//!   and externally-applied changes
//! - [`ReconcileEngine`] - the phase machine orchestrating startup
//!   reconciliation, periodic re-push, and inbound change handling
//!
//! ## Architecture
//!
//! The engine moves through `Uninitialized → Authenticating →
//! {LocalOnly, Reconciling} → Steady`:
//! 1. Resolve the anonymous identity; failure degrades the whole session
//!    to local-only operation — never a fatal error
//! 2. Arm the change listener
//! 3. One-time migration/merge decision over (local present?, remote
//!    present?) — equal content reconciles silently, diverged content is
//!    a user-mediated whole-document choice
//! 4. Steady state: periodic full-document re-push plus passive
//!    listening, with content-equality suppressing self-notifications
//!
//! ## Key Invariants
//!
//! - The document is the only unit of synchronization
//! - Local writes are synchronous with the mutation that caused them;
//!   remote pushes are asynchronous and never block the user
//! - Offline means skip, not queue: the next push carries current state
//! - Whichever side loses a conflict is discarded wholesale — no
//!   field-level merging, ever
//! - No remote-tier failure crosses into the application layer

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod connectivity;
mod engine;
mod prompt;
mod session;

pub use config::SyncConfig;
pub use connectivity::ConnectivityMonitor;
pub use engine::{ReconcileEngine, SessionPhase, SyncStats};
pub use prompt::{ConflictChoice, ReconcilePrompt};
pub use session::AppState;
