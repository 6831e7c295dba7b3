//! User confirmation prompts.

use async_trait::async_trait;

/// The user's pick when local and remote documents diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Adopt the remote document; the local one is discarded wholesale.
    KeepRemote,
    /// Push the local document; the remote one is overwritten wholesale.
    KeepLocal,
}

/// Asynchronous confirmation dialogs the engine awaits.
///
/// The engine suspends the affected transition until the returned future
/// resolves; nothing blocks a thread while the user decides.
#[async_trait]
pub trait ReconcilePrompt: Send + Sync {
    /// Both a local and a remote document exist and their content
    /// differs. Whole-document replacement in the chosen direction is
    /// the only resolution — no merge is offered.
    async fn resolve_conflict(&self) -> ConflictChoice;

    /// Another device changed the remote document and the local slot has
    /// been overwritten to match. Returns whether to replace the running
    /// in-memory state now; declining keeps the session on the
    /// pre-change document until it restarts.
    async fn confirm_reload(&self) -> bool;
}
