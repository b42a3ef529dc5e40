//! Typed access to the persisted collections.
//!
//! Every mutation loads the whole collection, changes it in memory and writes
//! it back in one `set`. Nothing is cached between calls.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::TrackerError,
    models::{
        EmbedSettings, NewTracker, Notification, SettingsPatch, Tracker, TrackerPatch,
        UserSettings,
    },
    services::storage::{
        Storage, KEY_EMBED_SETTINGS, KEY_NOTIFICATIONS, KEY_TRACKERS, KEY_USER_SETTINGS,
    },
};

#[derive(Clone)]
pub struct TrackerStore {
    storage: Storage,
}

impl TrackerStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, TrackerError> {
        match self.storage.get(key).await? {
            Some(serde_json::Value::Null) | None => Ok(T::default()),
            Some(v) => Ok(serde_json::from_value(v)?),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), TrackerError> {
        self.storage.set(key, serde_json::to_value(value)?).await
    }

    /// Writes defaults for any key that is missing. Existing values are left alone.
    pub async fn init_defaults(&self) -> Result<(), TrackerError> {
        if self.storage.get(KEY_TRACKERS).await?.is_none() {
            self.save(KEY_TRACKERS, &Vec::<Tracker>::new()).await?;
        }
        if self.storage.get(KEY_NOTIFICATIONS).await?.is_none() {
            self.save(KEY_NOTIFICATIONS, &Vec::<Notification>::new()).await?;
        }
        if self.storage.get(KEY_USER_SETTINGS).await?.is_none() {
            self.save(KEY_USER_SETTINGS, &UserSettings::default()).await?;
        }
        if self.storage.get(KEY_EMBED_SETTINGS).await?.is_none() {
            self.save(KEY_EMBED_SETTINGS, &EmbedSettings::default()).await?;
        }
        Ok(())
    }

    // ---------------- trackers ----------------

    pub async fn get_all(&self) -> Result<Vec<Tracker>, TrackerError> {
        self.load(KEY_TRACKERS).await
    }

    pub async fn find(&self, id: i64) -> Result<Tracker, TrackerError> {
        self.get_all()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(TrackerError::NotFound("Tracker"))
    }

    pub async fn add(&self, new: NewTracker) -> Result<Tracker, TrackerError> {
        let mut trackers = self.get_all().await?;

        if trackers.iter().any(|t| t.url == new.url) {
            return Err(TrackerError::Duplicate);
        }

        let now = Utc::now();
        // millisecond ids, bumped past the max so two adds in the same ms stay unique
        let max_id = trackers.iter().map(|t| t.id).max().unwrap_or(0);
        let id = now.timestamp_millis().max(max_id.saturating_add(1));

        let tracker = Tracker {
            id,
            url: new.url,
            product_name: new.product_name,
            currency_symbol: new.currency_symbol,
            current_price: new.current_price,
            target_price: new.target_price,
            created_at: Some(now),
            last_checked: None,
            notifications_sent: 0,
        };

        trackers.push(tracker.clone());
        self.save(KEY_TRACKERS, &trackers).await?;

        Ok(tracker)
    }

    pub async fn remove(&self, id: i64) -> Result<(), TrackerError> {
        let mut trackers = self.get_all().await?;
        let before = trackers.len();
        trackers.retain(|t| t.id != id);

        if trackers.len() == before {
            return Err(TrackerError::NotFound("Tracker"));
        }

        self.save(KEY_TRACKERS, &trackers).await
    }

    pub async fn update(&self, patch: &TrackerPatch) -> Result<Tracker, TrackerError> {
        let mut trackers = self.get_all().await?;

        let tracker = trackers
            .iter_mut()
            .find(|t| t.id == patch.id)
            .ok_or(TrackerError::NotFound("Tracker"))?;
        patch.apply(tracker);
        let updated = tracker.clone();

        self.save(KEY_TRACKERS, &trackers).await?;
        Ok(updated)
    }

    pub async fn replace_all(&self, trackers: &[Tracker]) -> Result<(), TrackerError> {
        self.save(KEY_TRACKERS, &trackers).await
    }

    // ---------------- notifications ----------------

    pub async fn notifications(&self) -> Result<Vec<Notification>, TrackerError> {
        self.load(KEY_NOTIFICATIONS).await
    }

    /// Appends and keeps only the `cap` newest entries.
    pub async fn append_notification(
        &self,
        notification: Notification,
        cap: usize,
    ) -> Result<(), TrackerError> {
        let mut items = self.notifications().await?;
        items.push(notification);
        keep_newest(&mut items, cap);
        self.save(KEY_NOTIFICATIONS, &items).await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<(), TrackerError> {
        let mut items = self.notifications().await?;

        let n = items
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(TrackerError::NotFound("Notification"))?;
        n.read = true;

        self.save(KEY_NOTIFICATIONS, &items).await
    }

    pub async fn clear_notifications(&self) -> Result<(), TrackerError> {
        self.save(KEY_NOTIFICATIONS, &Vec::<Notification>::new()).await
    }

    /// Returns how many entries were dropped.
    pub async fn prune_notifications(&self, cap: usize) -> Result<usize, TrackerError> {
        let mut items = self.notifications().await?;
        if items.len() <= cap {
            return Ok(0);
        }

        let before = items.len();
        keep_newest(&mut items, cap);
        self.save(KEY_NOTIFICATIONS, &items).await?;

        Ok(before - items.len())
    }

    // ---------------- settings ----------------

    pub async fn settings(&self) -> Result<UserSettings, TrackerError> {
        self.load(KEY_USER_SETTINGS).await
    }

    pub async fn update_settings(&self, patch: &SettingsPatch) -> Result<UserSettings, TrackerError> {
        let mut settings = self.settings().await?;
        settings.merge(patch);
        self.save(KEY_USER_SETTINGS, &settings).await?;
        Ok(settings)
    }

    pub async fn embed_settings(&self) -> Result<EmbedSettings, TrackerError> {
        self.load(KEY_EMBED_SETTINGS).await
    }

    pub async fn save_embed_settings(&self, settings: &EmbedSettings) -> Result<(), TrackerError> {
        self.save(KEY_EMBED_SETTINGS, settings).await
    }
}

/// Newest first by `createdAt`, truncated to `cap`.
fn keep_newest(items: &mut Vec<Notification>, cap: usize) {
    if items.len() <= cap {
        return;
    }
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(cap);
}
