//! Entity id generation.

use uuid::Uuid;

/// Generates a fresh opaque entity id.
///
/// Ids are unique across devices; two clients appending to the same
/// collection concurrently must never collide.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
