use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::error::TrackerError;

pub const MAX_PRICE: f64 = 1_000_000.0;

// Tried in order; the first one that yields a price in range wins.
// ASCII digits only: `\d` would also match Devanagari and other scripts.
static PRICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[₹$£€¥]\s*([0-9,]+(?:\.[0-9]{1,2})?)",
        r"(?i)price.*?([0-9,]+(?:\.[0-9]{1,2})?)",
        r"[0-9,]{3,10}\.?[0-9]{0,2}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("price pattern"))
    .collect()
});

/// Pulls a price out of a page body. Returns `0.0` when nothing plausible is found.
pub fn extract_price(body: &str) -> f64 {
    for re in PRICE_PATTERNS.iter() {
        let Some(caps) = re.captures(body) else {
            continue;
        };

        // the bare-digits fallback has no group, use the whole match
        let raw = caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str()).unwrap_or("");
        let cleaned = raw.replace(',', "");

        if let Ok(price) = cleaned.parse::<f64>() {
            if price > 0.0 && price < MAX_PRICE {
                return price;
            }
        }
    }

    0.0
}

#[derive(Clone)]
pub struct PriceFetcher {
    http: Client,
}

impl PriceFetcher {
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent(concat!("PriceAlert/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }

    pub async fn fetch_price(&self, url: &str) -> Result<f64, TrackerError> {
        let res = self.http.get(url).send().await?;

        if !res.status().is_success() {
            return Err(TrackerError::Network(format!(
                "fetch {url} failed: {}",
                res.status()
            )));
        }

        let body = res.text().await?;
        Ok(extract_price(&body))
    }
}

impl Default for PriceFetcher {
    fn default() -> Self {
        Self::new()
    }
}
