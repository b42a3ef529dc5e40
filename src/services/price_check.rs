//! The price-check cycle: re-read every tracker's price, raise drop alerts, persist once.
//!
//! Trackers are checked one after another. A failing tracker is logged and keeps
//! its old price; it still gets a fresh `lastChecked`. The whole list is written
//! back in a single store call at the end, so two overlapping cycles would race
//! and the later write wins. The scheduler never overlaps its own ticks; a
//! multi-threaded host should serialise `run_cycle` / `check_now` behind one lock.

use chrono::Utc;
use serde::Serialize;

use crate::{
    config::DropPolicy,
    error::TrackerError,
    models::{Tracker, UserSettings},
    services::notifier::{self, DropEvent},
    AppState,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    // push notifications were off, nothing was fetched
    pub skipped: bool,
    pub checked: usize,
    pub failures: usize,
    pub drops: Vec<DropEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub price_dropped: bool,
    pub new_price: f64,
    pub drop: Option<DropEvent>,
    pub tracker: Tracker,
}

pub fn qualifies(policy: DropPolicy, tracker: &Tracker, new_price: f64) -> Option<DropEvent> {
    let ev = DropEvent::compute(tracker, new_price)?;
    match policy {
        DropPolicy::Decreased => Some(ev),
        DropPolicy::AtOrBelowTarget if new_price <= tracker.target_price => Some(ev),
        DropPolicy::AtOrBelowTarget => None,
    }
}

/// Checks one tracker in place. The caller persists.
async fn check_one(
    state: &AppState,
    tracker: &mut Tracker,
    settings: &UserSettings,
) -> Result<Option<DropEvent>, TrackerError> {
    let fetched = state.prices.quote(tracker).await;
    tracker.last_checked = Some(Utc::now());

    let quote = fetched?;
    let price = quote.price;
    if price <= 0.0 {
        tracing::debug!(tracker_id = tracker.id, "no price found");
        return Ok(None);
    }

    // a hosted check that says "no drop" overrides the local comparison
    let drop = qualifies(state.settings.drop_policy, tracker, price)
        .filter(|_| quote.dropped.unwrap_or(true));

    if let Some(ev) = &drop {
        if settings.push_notifications {
            // alert text uses the old price, so notify before overwriting it
            if let Err(e) = notifier::notify_price_drop(state, tracker, ev, settings).await {
                tracing::warn!(tracker_id = tracker.id, error = %e, "failed to record price drop");
            }
            tracker.notifications_sent += 1;
        }
    }

    tracker.current_price = price;
    Ok(drop)
}

pub async fn run_cycle(state: &AppState) -> Result<CycleReport, TrackerError> {
    let settings = state.store.settings().await?;

    if !settings.push_notifications {
        tracing::debug!("push notifications disabled, skipping price check");
        return Ok(CycleReport {
            skipped: true,
            ..Default::default()
        });
    }

    let mut trackers = state.store.get_all().await?;
    let mut report = CycleReport::default();

    if trackers.is_empty() {
        return Ok(report);
    }

    for tracker in trackers.iter_mut() {
        report.checked += 1;

        match check_one(state, tracker, &settings).await {
            Ok(Some(ev)) => report.drops.push(ev),
            Ok(None) => {}
            Err(e) => {
                report.failures += 1;
                tracing::warn!(tracker_id = tracker.id, url = %tracker.url, error = %e, "price check failed");
            }
        }
    }

    state.store.replace_all(&trackers).await?;

    tracing::info!(
        checked = report.checked,
        drops = report.drops.len(),
        failures = report.failures,
        "price check finished"
    );

    Ok(report)
}

/// Checks a single tracker right away. An unknown id leaves the store untouched.
pub async fn check_now(state: &AppState, tracker_id: i64) -> Result<CheckOutcome, TrackerError> {
    let mut trackers = state.store.get_all().await?;

    let idx = trackers
        .iter()
        .position(|t| t.id == tracker_id)
        .ok_or(TrackerError::NotFound("Tracker"))?;

    let settings = state.store.settings().await?;
    let result = check_one(state, &mut trackers[idx], &settings).await;

    // lastChecked is stamped even when the fetch failed
    state.store.replace_all(&trackers).await?;

    let drop = result?;
    let tracker = trackers.swap_remove(idx);

    Ok(CheckOutcome {
        price_dropped: drop.is_some(),
        new_price: tracker.current_price,
        drop,
        tracker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(current: f64, target: f64) -> Tracker {
        Tracker {
            id: 7,
            url: "X".into(),
            product_name: "Phone".into(),
            currency_symbol: "₹".into(),
            current_price: current,
            target_price: target,
            created_at: None,
            last_checked: None,
            notifications_sent: 0,
        }
    }

    #[test]
    fn decreased_policy_fires_on_any_drop() {
        let t = tracker(1000.0, 900.0);
        assert!(qualifies(DropPolicy::Decreased, &t, 950.0).is_some());
        assert!(qualifies(DropPolicy::Decreased, &t, 1000.0).is_none());
    }

    #[test]
    fn target_policy_needs_target_reached() {
        let t = tracker(1000.0, 900.0);
        assert!(qualifies(DropPolicy::AtOrBelowTarget, &t, 950.0).is_none());
        assert!(qualifies(DropPolicy::AtOrBelowTarget, &t, 900.0).is_some());
        assert!(qualifies(DropPolicy::AtOrBelowTarget, &t, 850.0).is_some());
    }
}
