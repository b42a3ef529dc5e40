use std::time::Duration;

use tokio::{task::JoinHandle, time};

use crate::{
    services::{notifier, price_check},
    AppState,
};

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m.max(1) * 60)
}

/// Runs the price-check cycle every `checkFrequency` minutes.
///
/// The period comes from `AppState::schedule_tx`; sending a new value re-arms the
/// timer from that moment, like recreating an alarm. A tick always waits for the
/// previous cycle to finish.
pub fn spawn_price_check_monitor(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rx = state.schedule_tx.subscribe();

        loop {
            let period = minutes(u64::from(*rx.borrow_and_update()));

            tokio::select! {
                _ = time::sleep(period) => {
                    if let Err(e) = price_check::run_cycle(&state).await {
                        tracing::error!(error = %e, "[price-check] tick error");
                    }
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    tracing::info!(minutes = *rx.borrow(), "[price-check] re-armed");
                }
            }
        }
    })
}

/// Prunes the notification log on a fixed long period.
pub fn spawn_cleanup_monitor(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = minutes(state.settings.cleanup_interval_minutes);
        let mut interval = time::interval_at(time::Instant::now() + period, period);

        loop {
            interval.tick().await;

            if let Err(e) = notifier::cleanup_notifications(&state).await {
                tracing::error!(error = %e, "[cleanup] tick error");
            }
        }
    })
}
