//! # Tradebook Testkit
//!
//! Fixtures and test doubles shared by downstream test suites.
//!
//! Provides:
//! - Document fixtures with realistic trading history
//! - Pre-populated local stores
//! - Prompt doubles with fixed or scripted answers and call counters

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fixtures;
mod prompts;

pub use fixtures::{configured_document, populated_store, sample_document, scenarios};
pub use prompts::{AutoPrompt, ScriptedPrompt};
