pub mod storage;
pub mod tracker_store;

pub mod price_fetcher;
pub mod remote_api;
pub mod price_source;

pub mod notifier;
pub mod price_check;
pub mod scheduler;

pub mod sync_service;
pub mod badge;
pub mod analytics;
