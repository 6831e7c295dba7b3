//! The reconciliation engine.

use crate::config::SyncConfig;
use crate::connectivity::ConnectivityMonitor;
use crate::prompt::{ConflictChoice, ReconcilePrompt};
use crate::session::AppState;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tradebook_model::UserDataDocument;
use tradebook_remote::{
    ChangeListener, ChangeStream, Identity, IdentityProvider, ListenerEvent, RemoteStore,
    Subscription,
};
use tradebook_store::LocalStore;

/// The engine's lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Process start; nothing has happened yet.
    Uninitialized,
    /// Awaiting identity resolution.
    Authenticating,
    /// Remote disabled for this session; every remote leg is a logged
    /// no-op. Not terminal — a future session re-attempts
    /// authentication.
    LocalOnly,
    /// Running the one-time startup migration/merge decision.
    Reconciling,
    /// Periodic re-push plus passive listening.
    Steady,
}

impl SessionPhase {
    /// Whether remote legs are currently allowed.
    pub fn remote_enabled(&self) -> bool {
        matches!(self, SessionPhase::Reconciling | SessionPhase::Steady)
    }
}

/// Counters describing what the engine has done so far.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Pushes handed to the remote store.
    pub pushes_attempted: u64,
    /// Pushes the remote store accepted.
    pub pushes_completed: u64,
    /// Pushes skipped because the session is offline.
    pub pushes_skipped_offline: u64,
    /// Pushes skipped because the session is local-only.
    pub pushes_skipped_local_only: u64,
    /// Startup conflicts resolved by the user.
    pub conflicts_resolved: u64,
    /// Externally-applied changes written to the local slot.
    pub remote_changes_applied: u64,
    /// Reload prompts shown.
    pub reload_prompts: u64,
    /// Listener transport errors observed (subscription kept).
    pub listener_errors: u64,
    /// Last remote failure, if any.
    pub last_error: Option<String>,
}

/// Orchestrates startup reconciliation and steady-state sync.
///
/// Generic over the local store, the remote tier (one type implementing
/// all three adapter traits), and the prompt. All remote failures are
/// contained here: they surface as warnings and stats, never as errors
/// to the application layer.
pub struct ReconcileEngine<S, R, P>
where
    S: LocalStore,
    R: IdentityProvider + RemoteStore + ChangeListener,
    P: ReconcilePrompt,
{
    config: SyncConfig,
    state: Arc<AppState<S>>,
    remote: Arc<R>,
    prompt: Arc<P>,
    connectivity: Arc<ConnectivityMonitor>,
    phase: RwLock<SessionPhase>,
    identity: RwLock<Option<Identity>>,
    stream: Mutex<Option<ChangeStream>>,
    subscription: Mutex<Option<Subscription>>,
    stats: RwLock<SyncStats>,
    shutdown: Notify,
}

impl<S, R, P> ReconcileEngine<S, R, P>
where
    S: LocalStore,
    R: IdentityProvider + RemoteStore + ChangeListener,
    P: ReconcilePrompt,
{
    /// Creates an engine. Nothing runs until [`initialize`] is called.
    ///
    /// [`initialize`]: ReconcileEngine::initialize
    pub fn new(
        config: SyncConfig,
        state: Arc<AppState<S>>,
        remote: Arc<R>,
        prompt: Arc<P>,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Self {
        Self {
            config,
            state,
            remote,
            prompt,
            connectivity,
            phase: RwLock::new(SessionPhase::Uninitialized),
            identity: RwLock::new(None),
            stream: Mutex::new(None),
            subscription: Mutex::new(None),
            stats: RwLock::new(SyncStats::default()),
            shutdown: Notify::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        *self.phase.read()
    }

    /// Current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// The resolved identity, if authentication succeeded.
    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    /// The application state this engine observes.
    pub fn state(&self) -> &Arc<AppState<S>> {
        &self.state
    }

    fn set_phase(&self, phase: SessionPhase) {
        debug!(?phase, "phase transition");
        *self.phase.write() = phase;
    }

    fn record_error(&self, err: impl ToString) {
        self.stats.write().last_error = Some(err.to_string());
    }

    /// Runs authentication, arms the listener, and performs the one-time
    /// startup reconciliation.
    ///
    /// Never fails: identity or listener trouble degrades the session to
    /// [`SessionPhase::LocalOnly`], and the application stays fully
    /// usable against the local tier. Returns the phase the session
    /// settled in (`Steady` or `LocalOnly`).
    pub async fn initialize(&self) -> SessionPhase {
        if self.phase() != SessionPhase::Uninitialized {
            warn!(phase = ?self.phase(), "initialize called twice, ignoring");
            return self.phase();
        }

        self.set_phase(SessionPhase::Authenticating);
        let identity = match self.remote.resolve_identity().await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(%err, "identity unavailable, continuing local-only");
                self.record_error(&err);
                self.set_phase(SessionPhase::LocalOnly);
                return SessionPhase::LocalOnly;
            }
        };
        info!(%identity, "authenticated");
        *self.identity.write() = Some(identity.clone());

        match self.remote.subscribe(&identity).await {
            Ok((stream, subscription)) => {
                *self.stream.lock() = Some(stream);
                *self.subscription.lock() = Some(subscription);
            }
            Err(err) => {
                warn!(%err, "change listener unavailable, continuing local-only");
                self.record_error(&err);
                self.set_phase(SessionPhase::LocalOnly);
                return SessionPhase::LocalOnly;
            }
        }

        self.set_phase(SessionPhase::Reconciling);
        self.reconcile(&identity).await;

        let phase = self.phase();
        if phase == SessionPhase::LocalOnly {
            // Reconciliation degraded the session; the armed listener
            // would only deliver changes we cannot act on coherently.
            self.cancel_subscription();
            *self.stream.lock() = None;
        }
        phase
    }

    /// The one-time migration/merge decision.
    async fn reconcile(&self, identity: &Identity) {
        let local = self.state.load_local();

        let remote = match RemoteStore::pull(self.remote.as_ref(), identity).await {
            Ok(remote) => remote,
            Err(err) => {
                // A failed pull is not an absent record. Guessing
                // "absent" here could migrate stale local data over a
                // remote document we never saw.
                warn!(%err, "pull failed during reconciliation, continuing local-only");
                self.record_error(&err);
                self.set_phase(SessionPhase::LocalOnly);
                return;
            }
        };

        match (local, remote) {
            (None, None) => {
                debug!("no local or remote document, starting fresh");
            }
            (Some(local_doc), None) => {
                info!("migrating local document to remote");
                self.push_document(identity, &local_doc).await;
            }
            (None, Some(snapshot)) => {
                info!("adopting remote document");
                self.state.replace(snapshot.user_data);
            }
            (Some(local_doc), Some(snapshot)) => {
                if local_doc.content_equals(&snapshot.user_data) {
                    debug!("local and remote already match");
                } else {
                    let choice = self.prompt.resolve_conflict().await;
                    self.stats.write().conflicts_resolved += 1;
                    info!(?choice, "reconciliation conflict resolved");
                    match choice {
                        ConflictChoice::KeepRemote => {
                            self.state.replace(snapshot.user_data);
                        }
                        ConflictChoice::KeepLocal => {
                            self.push_document(identity, &local_doc).await;
                        }
                    }
                }
            }
        }

        self.set_phase(SessionPhase::Steady);
    }

    /// Pushes the current document if the session allows it.
    ///
    /// Skips (without queueing or erroring) while local-only or offline.
    /// Returns whether a push reached the remote store.
    pub async fn push_current(&self) -> bool {
        if self.phase() != SessionPhase::Steady {
            warn!(phase = ?self.phase(), "remote disabled, skipping push");
            self.stats.write().pushes_skipped_local_only += 1;
            return false;
        }
        if !self.connectivity.is_online() {
            debug!("offline, skipping push");
            self.stats.write().pushes_skipped_offline += 1;
            return false;
        }
        let Some(identity) = self.identity() else {
            return false;
        };

        let doc = self.state.document();
        self.push_document(&identity, &doc).await
    }

    async fn push_document(&self, identity: &Identity, doc: &UserDataDocument) -> bool {
        self.stats.write().pushes_attempted += 1;
        match RemoteStore::push(self.remote.as_ref(), identity, doc).await {
            Ok(()) => {
                self.stats.write().pushes_completed += 1;
                true
            }
            Err(err) => {
                // Superseded by the next periodic push; the local write
                // that preceded this is already committed.
                warn!(%err, "push failed");
                self.record_error(&err);
                false
            }
        }
    }

    /// Reacts to one change-listener event.
    ///
    /// A snapshot whose content matches the local slot is ignored — that
    /// is how this session's own pushes, echoed back by the backend, are
    /// tolerated. Diverging content overwrites the local slot first and
    /// only replaces the running state if the user confirms the reload.
    pub async fn handle_remote_event(&self, event: ListenerEvent) {
        match event {
            ListenerEvent::TransportError(message) => {
                warn!(message, "change listener transport error");
                self.stats.write().listener_errors += 1;
            }
            ListenerEvent::Changed(snapshot) => {
                let incoming = snapshot.user_data;
                let current = self
                    .state
                    .local_raw()
                    .unwrap_or_else(|| self.state.canonical_json());
                if incoming.canonical_json() == current {
                    debug!("remote change matches local state, ignoring");
                    return;
                }

                info!("document updated from another device");
                self.state.write_local(&incoming);
                self.stats.write().remote_changes_applied += 1;

                self.stats.write().reload_prompts += 1;
                if self.prompt.confirm_reload().await {
                    self.state.replace(incoming);
                } else {
                    debug!("reload declined, running state keeps the previous document");
                }
            }
        }
    }

    /// Steady-state loop: periodic re-push, coalesced mutation pushes,
    /// and inbound change handling. Runs until [`shutdown`] is called.
    ///
    /// [`shutdown`]: ReconcileEngine::shutdown
    pub async fn run(&self) {
        let mut stream = self.stream.lock().take();
        let mut revisions = self.state.subscribe_revisions();

        let mut ticker = tokio::time::interval(self.config.push_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval completes immediately; the
        // startup reconciliation just ran, so swallow it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => break,
                _ = ticker.tick() => {
                    self.push_current().await;
                }
                changed = revisions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    // Let a burst of edits settle into one push.
                    tokio::time::sleep(self.config.coalesce_window).await;
                    let _ = revisions.borrow_and_update();
                    self.push_current().await;
                }
                event = Self::next_event(&mut stream) => {
                    match event {
                        Some(event) => self.handle_remote_event(event).await,
                        None => stream = None,
                    }
                }
            }
        }
    }

    async fn next_event(stream: &mut Option<ChangeStream>) -> Option<ListenerEvent> {
        match stream {
            Some(rx) => rx.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Cancels the change subscription and stops the steady-state loop.
    ///
    /// Idempotent. An in-flight push or pull runs to completion or
    /// failure; there is no mid-flight cancellation.
    pub fn shutdown(&self) {
        self.cancel_subscription();
        self.shutdown.notify_one();
    }

    fn cancel_subscription(&self) {
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.cancel();
        }
    }
}
