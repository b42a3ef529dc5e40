//! Key-value persistence for whole JSON collections.
//!
//! Every key holds one complete value (the full tracker list, the full
//! notification log, the settings record). Callers read the value, change it
//! and write it back; the last write of a key wins.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use mongodb::{bson::doc, options::ReplaceOptions, Database};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config::{Settings, StorageBackend},
    error::TrackerError,
};

pub const KEY_TRACKERS: &str = "trackers";
pub const KEY_NOTIFICATIONS: &str = "notifications";
pub const KEY_USER_SETTINGS: &str = "userSettings";
pub const KEY_EMBED_SETTINGS: &str = "embedSettings";

#[async_trait]
pub trait KvStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, TrackerError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), TrackerError>;
}

pub type Storage = Arc<dyn KvStorage>;

pub async fn open(settings: &Settings) -> Result<Storage, TrackerError> {
    let storage: Storage = match settings.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::default()),
        StorageBackend::File => Arc::new(FileStorage::new(&settings.storage_path)),
        StorageBackend::Mongo => {
            let client = mongodb::Client::with_uri_str(&settings.mongodb_uri)
                .await
                .map_err(|e| TrackerError::Storage(e.to_string()))?;
            Arc::new(MongoStorage::new(client.database(&settings.mongodb_db)))
        }
    };
    Ok(storage)
}

// ---------------- memory ----------------

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl KvStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, TrackerError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), TrackerError> {
        self.items.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

// ---------------- file ----------------

/// All keys in one JSON object on disk. Writes go through a temp file + rename.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<serde_json::Map<String, Value>, TrackerError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Default::default()),
            Err(e) => return Err(TrackerError::Storage(e.to_string())),
        };

        if raw.trim().is_empty() {
            return Ok(Default::default());
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(TrackerError::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    async fn write_all(&self, map: serde_json::Map<String, Value>) -> Result<(), TrackerError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| TrackerError::Storage(e.to_string()))?;
        }

        let body = serde_json::to_vec_pretty(&Value::Object(map))?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| TrackerError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| TrackerError::Storage(e.to_string()))
    }
}

#[async_trait]
impl KvStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, TrackerError> {
        let _guard = self.lock.lock().await;
        let map = self.read_all().await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), TrackerError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_all().await?;
        map.insert(key.to_string(), value);
        self.write_all(map).await
    }
}

// ---------------- mongo ----------------

#[derive(Debug, Serialize, Deserialize)]
struct KvEntry {
    #[serde(rename = "_id")]
    key: String,
    // JSON text, so numbers and nulls come back exactly as written
    value: String,
}

pub struct MongoStorage {
    db: Database,
}

impl MongoStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KvStorage for MongoStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, TrackerError> {
        let col = self.db.collection::<KvEntry>("kv");

        let entry = col
            .find_one(doc! { "_id": key }, None)
            .await
            .map_err(|e| TrackerError::Storage(e.to_string()))?;

        match entry {
            Some(e) => Ok(Some(serde_json::from_str(&e.value)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), TrackerError> {
        let col = self.db.collection::<KvEntry>("kv");
        let entry = KvEntry {
            key: key.to_string(),
            value: serde_json::to_string(&value)?,
        };

        col.replace_one(
            doc! { "_id": key },
            &entry,
            ReplaceOptions::builder().upsert(true).build(),
        )
        .await
        .map_err(|e| TrackerError::Storage(e.to_string()))?;

        Ok(())
    }
}
