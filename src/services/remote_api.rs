use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::TrackerError,
    models::{NewTracker, Tracker},
};

/// Client for the hosted tracker API.
#[derive(Clone)]
pub struct RemoteApiClient {
    http: Client,
    base: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest<'a> {
    url: &'a str,
    current_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    #[serde(default)]
    pub price_dropped: bool,
    #[serde(default)]
    pub new_price: f64,
}

impl RemoteApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    async fn ensure_ok(res: reqwest::Response, what: &str) -> Result<reqwest::Response, TrackerError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(TrackerError::Network(format!("{what} failed: {status} {body}")))
    }

    // POST /api/trackers/{id}/check
    pub async fn check(&self, tracker: &Tracker) -> Result<CheckResponse, TrackerError> {
        let url = format!("{}/api/trackers/{}/check", self.base, tracker.id);
        let res = self
            .http
            .post(url)
            .json(&CheckRequest {
                url: &tracker.url,
                current_price: tracker.current_price,
            })
            .send()
            .await?;

        let res = Self::ensure_ok(res, "price check").await?;
        Ok(res.json::<CheckResponse>().await?)
    }

    // POST /api/trackers
    pub async fn create(&self, tracker: &NewTracker) -> Result<(), TrackerError> {
        let url = format!("{}/api/trackers", self.base);
        let res = self.http.post(url).json(tracker).send().await?;
        Self::ensure_ok(res, "tracker upload").await?;
        Ok(())
    }

    // DELETE /api/trackers/{id}
    pub async fn delete(&self, id: i64) -> Result<(), TrackerError> {
        let url = format!("{}/api/trackers/{}", self.base, id);
        let res = self.http.delete(url).send().await?;
        Self::ensure_ok(res, "tracker delete").await?;
        Ok(())
    }

    // GET /api/trackers
    pub async fn list(&self) -> Result<Vec<Tracker>, TrackerError> {
        let url = format!("{}/api/trackers", self.base);
        let res = self.http.get(url).send().await?;
        let res = Self::ensure_ok(res, "Failed to fetch from server").await?;
        Ok(res.json::<Vec<Tracker>>().await?)
    }
}
