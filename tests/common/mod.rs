#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use pricealert::{
    config,
    error::TrackerError,
    models::{NewTracker, PlatformAlert, Tracker},
    services::{
        analytics::Analytics,
        notifier::{AlertEvent, AlertSink},
        price_source::{PriceQuote, PriceSource},
        remote_api::RemoteApiClient,
        storage::MemoryStorage,
        tracker_store::TrackerStore,
    },
    templates, AppState,
};
use tokio::sync::{broadcast, watch};

/// Quotes keyed by tracker URL. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct StubPrices {
    quotes: Mutex<HashMap<String, PriceQuote>>,
}

impl StubPrices {
    pub fn set(&self, url: &str, price: f64) {
        self.quotes.lock().unwrap().insert(url.to_string(), PriceQuote::scraped(price));
    }

    /// A reading that carries a hosted-check verdict.
    pub fn set_checked(&self, url: &str, price: f64, dropped: bool) {
        self.quotes.lock().unwrap().insert(
            url.to_string(),
            PriceQuote {
                price,
                dropped: Some(dropped),
            },
        );
    }
}

#[async_trait]
impl PriceSource for StubPrices {
    async fn quote(&self, tracker: &Tracker) -> Result<PriceQuote, TrackerError> {
        self.quotes
            .lock()
            .unwrap()
            .get(&tracker.url)
            .copied()
            .ok_or_else(|| TrackerError::Network(format!("unreachable: {}", tracker.url)))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<AlertEvent>>,
}

impl RecordingSink {
    pub fn shown(&self) -> Vec<PlatformAlert> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                AlertEvent::Show { alert } => Some(alert.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.lock().unwrap().iter().filter(|e| e.name() == name).count()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn show(&self, alert: &PlatformAlert) -> Result<(), TrackerError> {
        self.events.lock().unwrap().push(AlertEvent::Show { alert: alert.clone() });
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), TrackerError> {
        self.events.lock().unwrap().push(AlertEvent::Clear { id: id.to_string() });
        Ok(())
    }

    async fn play_sound(&self) -> Result<(), TrackerError> {
        self.events.lock().unwrap().push(AlertEvent::Sound);
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub prices: Arc<StubPrices>,
    pub sink: Arc<RecordingSink>,
}

pub async fn test_app() -> TestApp {
    test_app_with(config::Settings {
        // no hosted API in tests unless a case points it at a mock server
        api_base: String::new(),
        ..config::Settings::default()
    })
    .await
}

pub async fn test_app_with(settings: config::Settings) -> TestApp {
    let store = TrackerStore::new(Arc::new(MemoryStorage::default()));
    store.init_defaults().await.unwrap();

    let prices = Arc::new(StubPrices::default());
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, _events_rx) = broadcast::channel::<AlertEvent>(16);
    let (schedule_tx, _schedule_rx) = watch::channel(60u32);

    let state = AppState {
        hbs: templates::build_handlebars(),
        store,
        remote: RemoteApiClient::new(settings.api_base.clone()),
        analytics: Analytics::default(),
        settings,
        prices: prices.clone(),
        alerts: sink.clone(),
        events_tx,
        schedule_tx: Arc::new(schedule_tx),
    };

    TestApp { state, prices, sink }
}

pub fn new_tracker(url: &str, current: f64, target: f64) -> NewTracker {
    NewTracker {
        url: url.to_string(),
        product_name: "Phone".to_string(),
        currency_symbol: "₹".to_string(),
        current_price: current,
        target_price: target,
    }
}
