mod common;

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use common::{new_tracker, test_app, test_app_with};
use pricealert::{config, models::Notification, services::scheduler};

#[tokio::test(start_paused = true)]
async fn price_check_runs_after_the_rearmed_period() {
    let app = test_app().await;
    let t = app.state.store.add(new_tracker("X", 1000.0, 900.0)).await.unwrap();
    app.prices.set("X", 850.0);

    let handle = scheduler::spawn_price_check_monitor(app.state.clone());
    tokio::task::yield_now().await;

    // default 60 minutes: nothing yet after one minute
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(app.state.store.find(t.id).await.unwrap().last_checked.is_none());

    app.state.schedule_tx.send_replace(1);
    tokio::time::sleep(Duration::from_secs(61)).await;

    let stored = app.state.store.find(t.id).await.unwrap();
    assert!(stored.last_checked.is_some());
    assert_eq!(stored.current_price, 850.0);
    assert_eq!(app.state.store.notifications().await.unwrap().len(), 1);

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn cleanup_trims_log_to_cap() {
    let app = test_app_with(config::Settings {
        api_base: String::new(),
        notification_cap: 50,
        cleanup_interval_minutes: 10,
        ..config::Settings::default()
    })
    .await;

    // append with a huge cap so the log grows past 50
    let now = Utc::now();
    for i in 0..70 {
        let n = Notification {
            id: format!("n{i}"),
            tracker_id: None,
            kind: "price_drop".to_string(),
            title: String::new(),
            message: String::new(),
            created_at: now - ChronoDuration::minutes(i),
            read: false,
        };
        app.state.store.append_notification(n, usize::MAX).await.unwrap();
    }
    assert_eq!(app.state.store.notifications().await.unwrap().len(), 70);

    let handle = scheduler::spawn_cleanup_monitor(app.state.clone());
    tokio::time::sleep(Duration::from_secs(10 * 60 + 1)).await;

    let kept = app.state.store.notifications().await.unwrap();
    assert_eq!(kept.len(), 50);
    // n0 is the newest, n49 the oldest survivor
    assert!(kept.iter().any(|n| n.id == "n0"));
    assert!(kept.iter().any(|n| n.id == "n49"));
    assert!(!kept.iter().any(|n| n.id == "n50"));

    handle.abort();
}
