use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "₹".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    pub id: i64,
    pub url: String,

    #[serde(default)]
    pub product_name: String,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub target_price: f64,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    // stamped on every check attempt, successful or not
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notifications_sent: u32,
}

impl Tracker {
    /// Still waiting for the price to reach the target.
    pub fn above_target(&self) -> bool {
        self.current_price > self.target_price
    }
}

/// Payload of `addTracker`. The store assigns the id and bookkeeping fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTracker {
    pub url: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub target_price: f64,
}

/// Partial update for `updateTracker`. `id` selects the tracker; `url` is not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerPatch {
    pub id: i64,
    pub product_name: Option<String>,
    pub currency_symbol: Option<String>,
    pub current_price: Option<f64>,
    pub target_price: Option<f64>,
}

impl TrackerPatch {
    pub fn apply(&self, t: &mut Tracker) {
        if let Some(name) = &self.product_name {
            t.product_name = name.clone();
        }
        if let Some(sym) = &self.currency_symbol {
            t.currency_symbol = sym.clone();
        }
        if let Some(p) = self.current_price {
            t.current_price = p;
        }
        if let Some(p) = self.target_price {
            t.target_price = p;
        }
    }
}
