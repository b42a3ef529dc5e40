use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Mongo,
}

/// Where the price-check cycle gets its prices from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSourceKind {
    // GET the tracker's own URL and scrape it
    Direct,
    // POST /api/trackers/{id}/check on the hosted API
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPolicy {
    /// Any decrease below the stored price.
    Decreased,
    /// A decrease that also lands at or below the target price.
    AtOrBelowTarget,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub api_base: String,

    pub storage_backend: StorageBackend,
    pub storage_path: String,
    pub mongodb_uri: String,
    pub mongodb_db: String,

    pub price_source: PriceSourceKind,
    pub drop_policy: DropPolicy,
    pub notification_cap: usize,
    pub cleanup_interval_minutes: u64,

    pub embed_url: String,
    pub analytics_id: Option<String>,

    // bearer token for /admin/*; admin pages are closed when unset
    pub admin_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_base: "https://aipricealert.com".to_string(),
            storage_backend: StorageBackend::File,
            storage_path: "data/storage.json".to_string(),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_db: "pricealert".to_string(),
            price_source: PriceSourceKind::Direct,
            drop_policy: DropPolicy::Decreased,
            notification_cap: 50,
            cleanup_interval_minutes: 1440,
            embed_url: "https://price-alerter.onrender.com".to_string(),
            analytics_id: None,
            admin_token: None,
        }
    }
}

fn parse_backend(s: &str) -> Option<StorageBackend> {
    match s.trim().to_lowercase().as_str() {
        "memory" => Some(StorageBackend::Memory),
        "file" => Some(StorageBackend::File),
        "mongo" | "mongodb" => Some(StorageBackend::Mongo),
        _ => None,
    }
}

fn parse_price_source(s: &str) -> Option<PriceSourceKind> {
    match s.trim().to_lowercase().as_str() {
        "direct" => Some(PriceSourceKind::Direct),
        "remote" => Some(PriceSourceKind::Remote),
        _ => None,
    }
}

fn parse_drop_policy(s: &str) -> Option<DropPolicy> {
    match s.trim().to_lowercase().as_str() {
        "decreased" => Some(DropPolicy::Decreased),
        "target" => Some(DropPolicy::AtOrBelowTarget),
        _ => None,
    }
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let d = Settings::default();

    let host = env::var("HOST").unwrap_or(d.host);

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(d.port);

    let api_base = env::var("API_BASE")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or(d.api_base);

    let storage_backend = env::var("STORAGE_BACKEND")
        .ok()
        .and_then(|s| parse_backend(&s))
        .unwrap_or(d.storage_backend);
    let storage_path = env::var("STORAGE_PATH").unwrap_or(d.storage_path);
    let mongodb_uri = env::var("MONGODB_URI").unwrap_or(d.mongodb_uri);
    let mongodb_db = env::var("MONGODB_DB").unwrap_or(d.mongodb_db);

    let price_source = env::var("PRICE_SOURCE")
        .ok()
        .and_then(|s| parse_price_source(&s))
        .unwrap_or(d.price_source);
    let drop_policy = env::var("DROP_POLICY")
        .ok()
        .and_then(|s| parse_drop_policy(&s))
        .unwrap_or(d.drop_policy);

    let notification_cap = env::var("NOTIFICATION_CAP")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(d.notification_cap);
    let cleanup_interval_minutes = env::var("CLEANUP_INTERVAL_MINUTES")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(d.cleanup_interval_minutes);

    let embed_url = env::var("EMBED_URL").unwrap_or(d.embed_url);
    let analytics_id = env::var("ANALYTICS_ID")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let admin_token = env::var("ADMIN_TOKEN")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Settings {
        host,
        port,
        api_base,
        storage_backend,
        storage_path,
        mongodb_uri,
        mongodb_db,
        price_source,
        drop_policy,
        notification_cap,
        cleanup_interval_minutes,
        embed_url,
        analytics_id,
        admin_token,
    }
}
