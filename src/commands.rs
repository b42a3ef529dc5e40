//! Action-tagged command surface.
//!
//! Every request is `{"action": "...", ...}` and every response is a JSON object
//! with a `success` flag plus either payload fields or an `error` string.
//! Nothing here panics or returns `Err`; failures become `success: false`.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::TrackerError,
    models::{NewTracker, SettingsPatch, TrackerPatch},
    services::{badge, notifier, price_check, sync_service},
    AppState,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    GetTrackers,
    AddTracker { tracker: NewTracker },
    RemoveTracker { tracker_id: i64 },
    UpdateTracker { tracker: TrackerPatch },
    CheckPriceNow { tracker_id: i64 },
    CheckPrices,
    GetNotifications,
    ClearNotifications,
    MarkNotificationRead { notification_id: String },
    NotificationButtonClicked { notification_id: String, button_index: usize },
    NotificationClosed {
        notification_id: String,
        #[serde(default)]
        by_user: bool,
    },
    UpdateSettings { settings: SettingsPatch },
    GetSettings,
    SyncWithServer,
    SendTestNotification,
    GetBadge,
}

fn ok(payload: Value) -> Value {
    let mut body = match payload {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    body.insert("success".to_string(), Value::Bool(true));
    Value::Object(body)
}

fn fail(msg: impl ToString) -> Value {
    json!({ "success": false, "error": msg.to_string() })
}

fn respond(res: Result<Value, TrackerError>) -> Value {
    match res {
        Ok(payload) => ok(payload),
        Err(e) => fail(e),
    }
}

fn track_event(state: &AppState, name: &str, params: Value) {
    if let Err(e) = state.analytics.log_event(name, params) {
        tracing::debug!(error = %e, "analytics event skipped");
    }
}

/// Parses a raw request and dispatches it.
pub async fn dispatch_value(state: &AppState, raw: Value) -> Value {
    match serde_json::from_value::<Command>(raw) {
        Ok(cmd) => dispatch(state, cmd).await,
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("unknown variant") || msg.contains("missing field `action`") {
                fail("Unknown action")
            } else {
                fail(format!("Invalid request: {msg}"))
            }
        }
    }
}

pub async fn dispatch(state: &AppState, cmd: Command) -> Value {
    let res = match cmd {
        Command::GetTrackers => state
            .store
            .get_all()
            .await
            .map(|trackers| json!({ "trackers": trackers })),

        Command::AddTracker { tracker } => add_tracker(state, tracker).await,

        Command::RemoveTracker { tracker_id } => remove_tracker(state, tracker_id).await,

        Command::UpdateTracker { tracker } => state
            .store
            .update(&tracker)
            .await
            .map(|t| json!({ "tracker": t })),

        Command::CheckPriceNow { tracker_id } => price_check::check_now(state, tracker_id)
            .await
            .map(|outcome| json!({ "data": outcome })),

        Command::CheckPrices => price_check::run_cycle(state)
            .await
            .map(|report| json!({ "checked": report.checked, "report": report })),

        Command::GetNotifications => state
            .store
            .notifications()
            .await
            .map(|items| json!({ "notifications": items })),

        Command::ClearNotifications => state.store.clear_notifications().await.map(|_| json!({})),

        Command::MarkNotificationRead { notification_id } => state
            .store
            .mark_notification_read(&notification_id)
            .await
            .map(|_| json!({})),

        Command::NotificationButtonClicked {
            notification_id,
            button_index,
        } => notifier::handle_button_click(state, &notification_id, button_index)
            .await
            .map(|url| json!({ "openUrl": url })),

        Command::NotificationClosed {
            notification_id,
            by_user,
        } => notifier::handle_closed(state, &notification_id, by_user)
            .await
            .map(|_| json!({})),

        Command::UpdateSettings { settings } => update_settings(state, settings).await,

        Command::GetSettings => state
            .store
            .settings()
            .await
            .map(|s| json!({ "settings": s })),

        Command::SyncWithServer => sync_service::sync_with_server(state)
            .await
            .map(|n| json!({ "synced": n })),

        Command::SendTestNotification => notifier::send_test_notification(state)
            .await
            .map(|_| json!({})),

        Command::GetBadge => state.store.get_all().await.map(|trackers| {
            json!({ "text": badge::badge_text(&trackers), "color": badge::BADGE_COLOR })
        }),
    };

    if let Err(e) = &res {
        tracing::debug!(error = %e, "command failed");
    }

    respond(res)
}

async fn add_tracker(state: &AppState, new: NewTracker) -> Result<Value, TrackerError> {
    if new.url.trim().is_empty() {
        return Err(TrackerError::Invalid("Tracker URL is required".to_string()));
    }

    let tracker = state.store.add(new.clone()).await?;
    sync_service::push_created(state, &new).await;
    track_event(state, "tracker_added", json!({ "trackerId": tracker.id }));

    Ok(json!({ "tracker": tracker }))
}

async fn remove_tracker(state: &AppState, tracker_id: i64) -> Result<Value, TrackerError> {
    state.store.remove(tracker_id).await?;
    sync_service::push_deleted(state, tracker_id).await;
    track_event(state, "tracker_removed", json!({ "trackerId": tracker_id }));

    Ok(json!({}))
}

async fn update_settings(state: &AppState, patch: SettingsPatch) -> Result<Value, TrackerError> {
    let settings = state.store.update_settings(&patch).await?;

    // re-arm the price-check timer only when the frequency was part of the update
    if patch.check_frequency.is_some() {
        state.schedule_tx.send_replace(settings.check_frequency);
    }

    Ok(json!({ "settings": settings }))
}
