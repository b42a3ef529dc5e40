mod common;

use common::{new_tracker, test_app, test_app_with};
use mockito::{Matcher, Server};
use pricealert::{commands::dispatch_value, config};
use serde_json::json;

#[tokio::test]
async fn add_tracker_rejects_duplicate_url() {
    let app = test_app().await;

    let req = json!({
        "action": "addTracker",
        "tracker": { "url": "https://shop.example/p/1", "productName": "Phone", "currentPrice": 1000, "targetPrice": 900 }
    });

    let first = dispatch_value(&app.state, req.clone()).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["tracker"]["url"], "https://shop.example/p/1");
    assert_eq!(first["tracker"]["notificationsSent"], 0);

    let second = dispatch_value(&app.state, req).await;
    assert_eq!(second["success"], false);
    assert_eq!(second["error"], "Tracker already exists for this URL");

    let list = dispatch_value(&app.state, json!({ "action": "getTrackers" })).await;
    assert_eq!(list["trackers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn add_tracker_requires_url() {
    let app = test_app().await;
    let res = dispatch_value(
        &app.state,
        json!({ "action": "addTracker", "tracker": { "url": "  " } }),
    )
    .await;
    assert_eq!(res["success"], false);
    assert_eq!(res["error"], "Tracker URL is required");
}

#[tokio::test]
async fn check_price_now_unknown_id() {
    let app = test_app().await;
    app.state.store.add(new_tracker("X", 1000.0, 900.0)).await.unwrap();

    let res = dispatch_value(&app.state, json!({ "action": "checkPriceNow", "trackerId": 1 })).await;
    assert_eq!(res, json!({ "success": false, "error": "Tracker not found" }));
}

#[tokio::test]
async fn check_price_now_returns_data() {
    let app = test_app().await;
    let t = app.state.store.add(new_tracker("X", 1000.0, 900.0)).await.unwrap();
    app.prices.set("X", 850.0);

    let res = dispatch_value(&app.state, json!({ "action": "checkPriceNow", "trackerId": t.id })).await;
    assert_eq!(res["success"], true);
    assert_eq!(res["data"]["priceDropped"], true);
    assert_eq!(res["data"]["newPrice"], 850.0);
    assert_eq!(res["data"]["drop"]["percentDropped"], "15.0");
}

#[tokio::test]
async fn unknown_or_missing_action() {
    let app = test_app().await;

    let res = dispatch_value(&app.state, json!({ "action": "launchRocket" })).await;
    assert_eq!(res, json!({ "success": false, "error": "Unknown action" }));

    let res = dispatch_value(&app.state, json!({ "trackerId": 3 })).await;
    assert_eq!(res["error"], "Unknown action");

    let res = dispatch_value(&app.state, json!({ "action": "removeTracker", "trackerId": "abc" })).await;
    assert_eq!(res["success"], false);
    assert!(res["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[tokio::test]
async fn update_and_remove_tracker() {
    let app = test_app().await;
    let t = app.state.store.add(new_tracker("X", 1000.0, 900.0)).await.unwrap();

    let res = dispatch_value(
        &app.state,
        json!({ "action": "updateTracker", "tracker": { "id": t.id, "targetPrice": 700 } }),
    )
    .await;
    assert_eq!(res["success"], true);
    assert_eq!(res["tracker"]["targetPrice"], 700.0);
    assert_eq!(res["tracker"]["url"], "X");

    let res = dispatch_value(&app.state, json!({ "action": "removeTracker", "trackerId": t.id })).await;
    assert_eq!(res["success"], true);

    let res = dispatch_value(&app.state, json!({ "action": "removeTracker", "trackerId": t.id })).await;
    assert_eq!(res["error"], "Tracker not found");
}

#[tokio::test]
async fn settings_merge_and_rearm_schedule() {
    let app = test_app().await;

    let res = dispatch_value(
        &app.state,
        json!({ "action": "updateSettings", "settings": { "soundAlerts": true } }),
    )
    .await;
    assert_eq!(res["success"], true);
    assert_eq!(*app.state.schedule_tx.borrow(), 60);

    let res = dispatch_value(
        &app.state,
        json!({ "action": "updateSettings", "settings": { "checkFrequency": 15 } }),
    )
    .await;
    assert_eq!(res["settings"]["checkFrequency"], 15);
    assert_eq!(*app.state.schedule_tx.borrow(), 15);

    let res = dispatch_value(&app.state, json!({ "action": "getSettings" })).await;
    assert_eq!(
        res["settings"],
        json!({ "pushNotifications": true, "soundAlerts": true, "checkFrequency": 15 })
    );
}

#[tokio::test]
async fn notification_lifecycle() {
    let app = test_app().await;
    let t = app.state.store.add(new_tracker("https://shop.example/x", 1000.0, 900.0)).await.unwrap();
    app.prices.set("https://shop.example/x", 850.0);

    let res = dispatch_value(&app.state, json!({ "action": "checkPrices" })).await;
    assert_eq!(res["success"], true);
    assert_eq!(res["checked"], 1);

    let res = dispatch_value(&app.state, json!({ "action": "getNotifications" })).await;
    let id = res["notifications"][0]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with(&format!("price-drop-{}-", t.id)));

    let res = dispatch_value(
        &app.state,
        json!({ "action": "notificationButtonClicked", "notificationId": id, "buttonIndex": 0 }),
    )
    .await;
    assert_eq!(res["openUrl"], "https://shop.example/x");
    assert_eq!(app.sink.count("clear"), 1);

    let res = dispatch_value(
        &app.state,
        json!({ "action": "notificationButtonClicked", "notificationId": id, "buttonIndex": 1 }),
    )
    .await;
    assert_eq!(res["openUrl"], serde_json::Value::Null);

    let res = dispatch_value(
        &app.state,
        json!({ "action": "notificationClosed", "notificationId": id, "byUser": true }),
    )
    .await;
    assert_eq!(res["success"], true);
    let res = dispatch_value(&app.state, json!({ "action": "getNotifications" })).await;
    assert_eq!(res["notifications"][0]["read"], true);

    let res = dispatch_value(&app.state, json!({ "action": "markNotificationRead", "notificationId": "nope" })).await;
    assert_eq!(res["error"], "Notification not found");

    let res = dispatch_value(&app.state, json!({ "action": "clearNotifications" })).await;
    assert_eq!(res["success"], true);
    let res = dispatch_value(&app.state, json!({ "action": "getNotifications" })).await;
    assert_eq!(res["notifications"], json!([]));
}

#[tokio::test]
async fn test_notification_and_badge() {
    let app = test_app().await;
    app.state.store.add(new_tracker("a", 1000.0, 900.0)).await.unwrap();
    app.state.store.add(new_tracker("b", 800.0, 900.0)).await.unwrap();

    let res = dispatch_value(&app.state, json!({ "action": "sendTestNotification" })).await;
    assert_eq!(res["success"], true);
    let shown = app.sink.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Test Notification");
    assert!(app.state.store.notifications().await.unwrap().is_empty());

    let res = dispatch_value(&app.state, json!({ "action": "getBadge" })).await;
    assert_eq!(res["text"], "1");
    assert_eq!(res["color"], "#ff9f0a");
}

#[tokio::test]
async fn sync_without_server_is_not_initialized() {
    let app = test_app().await;
    let res = dispatch_value(&app.state, json!({ "action": "syncWithServer" })).await;
    assert_eq!(res["success"], false);
    assert_eq!(res["error"], "Server sync is not initialized");
}

#[tokio::test]
async fn sync_replaces_local_trackers() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/trackers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "id": 1, "url": "https://a.test", "productName": "A", "currentPrice": 10.0, "targetPrice": 5.0 },
                { "id": 2, "url": "https://b.test", "productName": "B", "currentPrice": 20.0, "targetPrice": 15.0 }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let app = test_app_with(config::Settings {
        api_base: server.url(),
        ..config::Settings::default()
    })
    .await;
    app.state.store.add(new_tracker("local", 1.0, 1.0)).await.unwrap();

    let res = dispatch_value(&app.state, json!({ "action": "syncWithServer" })).await;
    assert_eq!(res["success"], true);
    assert_eq!(res["synced"], 2);
    list.assert_async().await;

    let urls: Vec<String> = app.state.store.get_all().await.unwrap().into_iter().map(|t| t.url).collect();
    assert_eq!(urls, vec!["https://a.test", "https://b.test"]);
}

#[tokio::test]
async fn add_and_remove_are_pushed_to_server() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/trackers")
        .match_body(Matcher::PartialJson(json!({ "url": "https://shop.example/p" })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    // server trouble must not fail the local removal
    let delete = server
        .mock("DELETE", Matcher::Regex(r"^/api/trackers/\d+$".to_string()))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let app = test_app_with(config::Settings {
        api_base: server.url(),
        ..config::Settings::default()
    })
    .await;

    let res = dispatch_value(
        &app.state,
        json!({ "action": "addTracker", "tracker": { "url": "https://shop.example/p", "targetPrice": 10 } }),
    )
    .await;
    assert_eq!(res["success"], true);
    let id = res["tracker"]["id"].as_i64().unwrap();

    let res = dispatch_value(&app.state, json!({ "action": "removeTracker", "trackerId": id })).await;
    assert_eq!(res["success"], true);

    create.assert_async().await;
    delete.assert_async().await;
}
