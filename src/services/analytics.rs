use serde_json::Value;

use crate::error::TrackerError;

/// Usage events. Without a measurement id every call reports `NotInitialized`.
#[derive(Debug, Clone, Default)]
pub struct Analytics {
    measurement_id: Option<String>,
}

impl Analytics {
    pub fn new(measurement_id: Option<String>) -> Self {
        Self { measurement_id }
    }

    pub fn is_initialized(&self) -> bool {
        self.measurement_id.is_some()
    }

    pub fn log_event(&self, name: &str, params: Value) -> Result<(), TrackerError> {
        let Some(id) = &self.measurement_id else {
            return Err(TrackerError::NotInitialized("Analytics"));
        };

        tracing::info!(target: "analytics", measurement_id = %id, event = name, %params, "event");
        Ok(())
    }
}
