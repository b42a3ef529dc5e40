//! Library entrypoint for PriceAlert.
//!
//! Integration tests under `tests/` build their own `AppState` (in-memory
//! storage, stub price source, recording alert sink) and drive the routers,
//! the command dispatcher and the services directly.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

pub mod config;
pub mod error;
pub mod models;

#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

#[path = "views/templates.rs"]
pub mod templates;
#[path = "views/embed.rs"]
pub mod embed;

pub mod commands;
pub mod controllers;
pub mod routes;

use config::PriceSourceKind;
use error::TrackerError;
use services::{
    analytics::Analytics,
    notifier::{AlertEvent, AlertSink, BroadcastSink},
    price_fetcher::PriceFetcher,
    price_source::PriceSource,
    remote_api::RemoteApiClient,
    storage::Storage,
    tracker_store::TrackerStore,
};

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub store: TrackerStore,
    pub settings: config::Settings,
    pub prices: Arc<dyn PriceSource>,
    pub remote: RemoteApiClient,
    pub alerts: Arc<dyn AlertSink>,
    pub analytics: Analytics,
    pub events_tx: broadcast::Sender<AlertEvent>,
    // price-check period in minutes; the scheduler re-arms on every send
    pub schedule_tx: Arc<watch::Sender<u32>>,
}

impl AppState {
    /// Wires the production collaborators and seeds any missing storage keys.
    pub async fn build(settings: config::Settings, storage: Storage) -> Result<AppState, TrackerError> {
        let store = TrackerStore::new(storage);
        store.init_defaults().await?;
        let frequency = store.settings().await?.check_frequency;

        let remote = RemoteApiClient::new(settings.api_base.clone());
        let prices: Arc<dyn PriceSource> = match settings.price_source {
            PriceSourceKind::Direct => Arc::new(PriceFetcher::new()),
            PriceSourceKind::Remote => Arc::new(remote.clone()),
        };

        let (events_tx, _events_rx) = broadcast::channel::<AlertEvent>(64);
        let (schedule_tx, _schedule_rx) = watch::channel(frequency);

        Ok(AppState {
            hbs: templates::build_handlebars(),
            store,
            analytics: Analytics::new(settings.analytics_id.clone()),
            settings,
            prices,
            remote,
            alerts: Arc::new(BroadcastSink::new(events_tx.clone())),
            events_tx,
            schedule_tx: Arc::new(schedule_tx),
        })
    }
}
