use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,

    // lookup only, the tracker may be gone by now
    #[serde(default)]
    pub tracker_id: Option<i64>,

    // "price_drop" | "test"
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub title: String,
    pub message: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn drop_id(tracker_id: i64, at: DateTime<Utc>) -> String {
        format!("price-drop-{}-{}", tracker_id, at.timestamp_millis())
    }

    /// Recovers the tracker id from a `price-drop-{id}-{millis}` notification id.
    pub fn tracker_id_from(notification_id: &str) -> Option<i64> {
        let rest = notification_id.strip_prefix("price-drop-")?;
        let (id, _) = rest.rsplit_once('-')?;
        id.parse().ok()
    }
}

/// A user-visible alert handed to the [`AlertSink`](crate::services::notifier::AlertSink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAlert {
    pub id: String,
    // "priceDrop" | "test"
    pub kind: String,
    pub title: String,
    pub message: String,
    pub buttons: Vec<String>,
    pub priority: u8,
    pub require_interaction: bool,
}
