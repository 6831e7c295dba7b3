//! Prompt doubles.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tradebook_sync::{ConflictChoice, ReconcilePrompt};

/// A prompt that always answers the same way, counting invocations.
#[derive(Debug)]
pub struct AutoPrompt {
    choice: ConflictChoice,
    accept_reload: bool,
    conflicts: AtomicU64,
    reloads: AtomicU64,
}

impl AutoPrompt {
    /// Always keeps the remote document and accepts reloads.
    pub fn keep_remote() -> Self {
        Self::new(ConflictChoice::KeepRemote, true)
    }

    /// Always keeps the local document and accepts reloads.
    pub fn keep_local() -> Self {
        Self::new(ConflictChoice::KeepLocal, true)
    }

    /// Fixed answers for both questions.
    pub fn new(choice: ConflictChoice, accept_reload: bool) -> Self {
        Self {
            choice,
            accept_reload,
            conflicts: AtomicU64::new(0),
            reloads: AtomicU64::new(0),
        }
    }

    /// How many conflicts were presented.
    pub fn conflicts_seen(&self) -> u64 {
        self.conflicts.load(Ordering::SeqCst)
    }

    /// How many reload prompts were presented.
    pub fn reloads_seen(&self) -> u64 {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReconcilePrompt for AutoPrompt {
    async fn resolve_conflict(&self) -> ConflictChoice {
        self.conflicts.fetch_add(1, Ordering::SeqCst);
        self.choice
    }

    async fn confirm_reload(&self) -> bool {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        self.accept_reload
    }
}

/// A prompt answering from pre-scripted queues.
///
/// When a queue runs dry the prompt falls back to keeping local and
/// declining reloads — the conservative answers.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    conflict_answers: Mutex<VecDeque<ConflictChoice>>,
    reload_answers: Mutex<VecDeque<bool>>,
    conflicts: AtomicU64,
    reloads: AtomicU64,
}

impl ScriptedPrompt {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a conflict answer.
    pub fn push_conflict_answer(&self, choice: ConflictChoice) {
        self.conflict_answers.lock().push_back(choice);
    }

    /// Queues a reload answer.
    pub fn push_reload_answer(&self, accept: bool) {
        self.reload_answers.lock().push_back(accept);
    }

    /// How many conflicts were presented.
    pub fn conflicts_seen(&self) -> u64 {
        self.conflicts.load(Ordering::SeqCst)
    }

    /// How many reload prompts were presented.
    pub fn reloads_seen(&self) -> u64 {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReconcilePrompt for ScriptedPrompt {
    async fn resolve_conflict(&self) -> ConflictChoice {
        self.conflicts.fetch_add(1, Ordering::SeqCst);
        self.conflict_answers
            .lock()
            .pop_front()
            .unwrap_or(ConflictChoice::KeepLocal)
    }

    async fn confirm_reload(&self) -> bool {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        self.reload_answers.lock().pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn auto_prompt_counts() {
        let prompt = AutoPrompt::keep_remote();
        assert_eq!(prompt.resolve_conflict().await, ConflictChoice::KeepRemote);
        assert!(prompt.confirm_reload().await);
        assert_eq!(prompt.conflicts_seen(), 1);
        assert_eq!(prompt.reloads_seen(), 1);
    }

    #[tokio::test]
    async fn scripted_prompt_drains_then_falls_back() {
        let prompt = ScriptedPrompt::new();
        prompt.push_conflict_answer(ConflictChoice::KeepRemote);
        prompt.push_reload_answer(true);

        assert_eq!(prompt.resolve_conflict().await, ConflictChoice::KeepRemote);
        assert_eq!(prompt.resolve_conflict().await, ConflictChoice::KeepLocal);
        assert!(prompt.confirm_reload().await);
        assert!(!prompt.confirm_reload().await);
        assert_eq!(prompt.conflicts_seen(), 2);
    }
}
