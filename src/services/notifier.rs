//! Price-drop alerts: drop math, the user-visible alert, and the notification log.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::{
    error::TrackerError,
    models::{Notification, PlatformAlert, Tracker, UserSettings},
    AppState,
};

pub const BUTTON_VIEW_PRODUCT: usize = 0;

/// What the alert sink pushes to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum AlertEvent {
    Show { alert: PlatformAlert },
    Clear { id: String },
    Sound,
}

impl AlertEvent {
    /// SSE event name: the alert kind (`priceDrop` / `test`), `clear` or `sound`.
    pub fn name(&self) -> &str {
        match self {
            AlertEvent::Show { alert } => &alert.kind,
            AlertEvent::Clear { .. } => "clear",
            AlertEvent::Sound => "sound",
        }
    }
}

/// Where user-visible alerts go.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn show(&self, alert: &PlatformAlert) -> Result<(), TrackerError>;
    async fn clear(&self, id: &str) -> Result<(), TrackerError>;
    async fn play_sound(&self) -> Result<(), TrackerError>;
}

/// Fans alerts out to every `/events` subscriber.
pub struct BroadcastSink {
    tx: broadcast::Sender<AlertEvent>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<AlertEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl AlertSink for BroadcastSink {
    async fn show(&self, alert: &PlatformAlert) -> Result<(), TrackerError> {
        // no subscribers is fine
        let _ = self.tx.send(AlertEvent::Show { alert: alert.clone() });
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), TrackerError> {
        let _ = self.tx.send(AlertEvent::Clear { id: id.to_string() });
        Ok(())
    }

    async fn play_sound(&self) -> Result<(), TrackerError> {
        let _ = self.tx.send(AlertEvent::Sound);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub tracker_id: i64,
    pub old_price: f64,
    pub new_price: f64,
    pub dropped_by: f64,
    // one decimal, e.g. "15.0"
    pub percent_dropped: String,
}

impl DropEvent {
    /// `None` unless there is a known positive old price and a lower positive new one.
    pub fn compute(tracker: &Tracker, new_price: f64) -> Option<DropEvent> {
        let old = tracker.current_price;
        if old <= 0.0 || new_price <= 0.0 || new_price >= old {
            return None;
        }

        let dropped_by = old - new_price;
        let percent = dropped_by / old * 100.0;

        Some(DropEvent {
            tracker_id: tracker.id,
            old_price: old,
            new_price,
            dropped_by,
            percent_dropped: one_decimal(percent),
        })
    }
}

// Rounds exact ties up (12.25 -> "12.3"); `{:.1}` alone rounds them to even.
// Only x.25 and x.75 are exact ties in binary, so anything else formats as is.
fn one_decimal(x: f64) -> String {
    let is_tie = (x * 4.0).fract() == 0.0 && (x * 2.0).fract() != 0.0;
    if is_tie {
        format!("{:.1}", (x * 10.0).ceil() / 10.0)
    } else {
        format!("{:.1}", x)
    }
}

fn drop_alert(tracker: &Tracker, ev: &DropEvent, id: &str) -> PlatformAlert {
    let sym = &tracker.currency_symbol;
    PlatformAlert {
        id: id.to_string(),
        kind: "priceDrop".to_string(),
        title: "Price Drop Alert!".to_string(),
        message: format!(
            "{} is now {}{:.2} (down {}%, {}{:.2} less)",
            tracker.product_name, sym, ev.new_price, ev.percent_dropped, sym, ev.dropped_by
        ),
        buttons: vec!["View Product".to_string(), "Dismiss".to_string()],
        priority: 2,
        require_interaction: true,
    }
}

/// Raises the alert and logs it. Sink failures are logged, never returned.
pub async fn notify_price_drop(
    state: &AppState,
    tracker: &Tracker,
    ev: &DropEvent,
    settings: &UserSettings,
) -> Result<Notification, TrackerError> {
    let now = Utc::now();
    let id = Notification::drop_id(tracker.id, now);
    let alert = drop_alert(tracker, ev, &id);

    if let Err(e) = state.alerts.show(&alert).await {
        tracing::warn!(tracker_id = tracker.id, error = %e, "failed to show price drop alert");
    }

    if settings.sound_alerts {
        if let Err(e) = state.alerts.play_sound().await {
            tracing::warn!(error = %e, "failed to play alert sound");
        }
    }

    let notification = Notification {
        id,
        tracker_id: Some(tracker.id),
        kind: "price_drop".to_string(),
        title: "Price Drop Alert".to_string(),
        message: format!(
            "{} dropped to {}{:.2}",
            tracker.product_name, tracker.currency_symbol, ev.new_price
        ),
        created_at: now,
        read: false,
    };

    state
        .store
        .append_notification(notification.clone(), state.settings.notification_cap)
        .await?;

    if let Err(e) = state.analytics.log_event(
        "price_drop",
        serde_json::json!({ "trackerId": tracker.id, "percentDropped": ev.percent_dropped }),
    ) {
        tracing::debug!(error = %e, "analytics event skipped");
    }

    tracing::info!(
        tracker_id = tracker.id,
        old = ev.old_price,
        new = ev.new_price,
        percent = %ev.percent_dropped,
        "price drop"
    );

    Ok(notification)
}

/// Shows a fixed alert without touching the log.
pub async fn send_test_notification(state: &AppState) -> Result<(), TrackerError> {
    let alert = PlatformAlert {
        id: format!("test-notification-{}", Utc::now().timestamp_millis()),
        kind: "test".to_string(),
        title: "Test Notification".to_string(),
        message: "This is a test notification from PriceAlert".to_string(),
        buttons: vec![],
        priority: 2,
        require_interaction: false,
    };

    state.alerts.show(&alert).await
}

/// Button 0 returns the product URL to open; every click clears the alert.
pub async fn handle_button_click(
    state: &AppState,
    notification_id: &str,
    button_index: usize,
) -> Result<Option<String>, TrackerError> {
    let mut open_url = None;

    if button_index == BUTTON_VIEW_PRODUCT {
        if let Some(tracker_id) = Notification::tracker_id_from(notification_id) {
            open_url = state
                .store
                .get_all()
                .await?
                .into_iter()
                .find(|t| t.id == tracker_id)
                .map(|t| t.url);
        }
    }

    if let Err(e) = state.alerts.clear(notification_id).await {
        tracing::warn!(notification_id, error = %e, "failed to clear alert");
    }

    Ok(open_url)
}

/// Closing an alert by hand counts as reading it.
pub async fn handle_closed(
    state: &AppState,
    notification_id: &str,
    by_user: bool,
) -> Result<(), TrackerError> {
    if !by_user {
        return Ok(());
    }

    match state.store.mark_notification_read(notification_id).await {
        // the log may already have been pruned or cleared
        Err(TrackerError::NotFound(_)) => Ok(()),
        other => other,
    }
}

pub async fn cleanup_notifications(state: &AppState) -> Result<usize, TrackerError> {
    let dropped = state
        .store
        .prune_notifications(state.settings.notification_cap)
        .await?;

    if dropped > 0 {
        tracing::info!(dropped, "pruned old notifications");
    }
    Ok(dropped)
}
