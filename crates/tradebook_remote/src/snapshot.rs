//! Remote snapshot types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradebook_model::UserDataDocument;

/// The remote tier's stored copy of the user-data document.
///
/// Owned exclusively by the remote store; the sync engine only ever reads
/// or overwrites it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSnapshot {
    /// The stored document.
    pub user_data: UserDataDocument,
    /// When the snapshot was last written.
    pub last_updated: DateTime<Utc>,
    /// Which device wrote it.
    pub device_info: DeviceInfo,
}

impl RemoteSnapshot {
    /// Builds a snapshot of `doc` stamped with the current time and this
    /// device's info.
    pub fn of(doc: &UserDataDocument) -> Self {
        Self {
            user_data: doc.clone(),
            last_updated: Utc::now(),
            device_info: DeviceInfo::current(),
        }
    }
}

/// Origin-device metadata attached to every snapshot write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Operating system of the writing device.
    pub platform: String,
    /// Client identification string.
    pub user_agent: String,
}

impl DeviceInfo {
    /// Device info for the running client.
    pub fn current() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            user_agent: concat!("tradebook/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_of_carries_the_document() {
        let mut doc = UserDataDocument::default();
        doc.configure(1000.0, 10.0, 5.0);

        let snapshot = RemoteSnapshot::of(&doc);
        assert!(snapshot.user_data.content_equals(&doc));
        assert!(!snapshot.device_info.platform.is_empty());
    }

    #[test]
    fn snapshot_serializes_in_wire_shape() {
        let snapshot = RemoteSnapshot::of(&UserDataDocument::default());
        let json = serde_json::to_value(&snapshot).unwrap();

        assert!(json.get("userData").is_some());
        assert!(json.get("lastUpdated").is_some());
        assert!(json["deviceInfo"].get("userAgent").is_some());
    }
}
