use async_trait::async_trait;

use crate::{
    error::TrackerError,
    models::Tracker,
    services::{price_fetcher::PriceFetcher, remote_api::RemoteApiClient},
};

/// One price reading for a tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    /// `0.0` means no price could be read.
    pub price: f64,
    /// The hosted API's own drop verdict. Direct scraping has none.
    pub dropped: Option<bool>,
}

impl PriceQuote {
    pub fn scraped(price: f64) -> Self {
        Self { price, dropped: None }
    }
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn quote(&self, tracker: &Tracker) -> Result<PriceQuote, TrackerError>;
}

#[async_trait]
impl PriceSource for PriceFetcher {
    async fn quote(&self, tracker: &Tracker) -> Result<PriceQuote, TrackerError> {
        Ok(PriceQuote::scraped(self.fetch_price(&tracker.url).await?))
    }
}

#[async_trait]
impl PriceSource for RemoteApiClient {
    async fn quote(&self, tracker: &Tracker) -> Result<PriceQuote, TrackerError> {
        let res = self.check(tracker).await?;
        Ok(PriceQuote {
            price: res.new_price,
            dropped: Some(res.price_dropped),
        })
    }
}
