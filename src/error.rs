use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// A tracker with the same URL is already stored.
    #[error("Tracker already exists for this URL")]
    Duplicate,

    /// Unknown tracker or notification id. Carries the display name of the thing.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Fetch or remote call failed, or the body could not be parsed.
    #[error("{0}")]
    Network(String),

    /// The request itself is unusable, e.g. an empty URL.
    #[error("{0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    Storage(String),

    /// Called a collaborator before it was set up.
    #[error("{0} is not initialized")]
    NotInitialized(&'static str),
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        TrackerError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Storage(e.to_string())
    }
}
