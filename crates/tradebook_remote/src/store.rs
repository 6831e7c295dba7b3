//! Remote store trait definition.

use crate::error::RemoteResult;
use crate::identity::Identity;
use crate::snapshot::RemoteSnapshot;
use async_trait::async_trait;
use tradebook_model::UserDataDocument;

/// Asynchronous get/set of the user-data snapshot, keyed by identity.
///
/// # Contract
///
/// - `push` upserts the full aggregate plus refreshed metadata. The
///   backend merges at the snapshot level, but because the payload is
///   always the whole document this behaves as full replacement.
/// - `push` failure never rolls back the local write that preceded it;
///   the local tier committed independently.
/// - `pull` returning `Ok(None)` means no record exists for this
///   identity yet. A transport failure is `Err` and must be kept
///   distinct — treating it as absence would trigger a first-write
///   migration over unseen remote data.
/// - Neither operation touches local storage; applying pulled data
///   locally is the reconciliation engine's responsibility.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upserts the document as the identity's current snapshot.
    async fn push(&self, identity: &Identity, doc: &UserDataDocument) -> RemoteResult<()>;

    /// Fetches the identity's current snapshot, if one exists.
    async fn pull(&self, identity: &Identity) -> RemoteResult<Option<RemoteSnapshot>>;
}
