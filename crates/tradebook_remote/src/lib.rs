//! # Tradebook Remote
//!
//! Contracts for the remote tier: anonymous identity issuance, the
//! keyed document store, and the change-subscription channel.
//!
//! The remote tier holds one snapshot per identity — the whole user-data
//! document plus last-updated and origin-device metadata. Adapters here
//! only move snapshots; deciding *when* to push, pull, or reconcile is
//! the sync engine's job.
//!
//! ## Key Invariants
//!
//! - Every remote operation is keyed by an [`Identity`]
//! - Push and pull move the full aggregate, never a fragment
//! - A pull that finds no record is `Ok(None)`; a pull that fails is
//!   `Err` — the two must never be conflated
//! - Change subscriptions deliver self-originated writes too; consumers
//!   de-duplicate by content
//! - Transport errors on a subscription are events, not termination

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod identity;
mod listener;
mod mock;
mod snapshot;
mod store;

pub use error::{RemoteError, RemoteResult};
pub use identity::{Identity, IdentityProvider};
pub use listener::{ChangeListener, ChangeStream, ListenerEvent, Subscription};
pub use mock::MockRemote;
pub use snapshot::{DeviceInfo, RemoteSnapshot};
pub use store::RemoteStore;
