use crate::{
    error::TrackerError,
    models::NewTracker,
    AppState,
};

fn remote_configured(state: &AppState) -> bool {
    !state.remote.base().is_empty()
}

/// Replaces the local tracker list with the server's. Returns how many were synced.
pub async fn sync_with_server(state: &AppState) -> Result<usize, TrackerError> {
    if !remote_configured(state) {
        return Err(TrackerError::NotInitialized("Server sync"));
    }

    let trackers = state.remote.list().await?;
    state.store.replace_all(&trackers).await?;

    tracing::info!(count = trackers.len(), "synced trackers from server");
    Ok(trackers.len())
}

// Best effort: the local store is already updated when these run.

pub async fn push_created(state: &AppState, tracker: &NewTracker) {
    if !remote_configured(state) {
        return;
    }
    if let Err(e) = state.remote.create(tracker).await {
        tracing::warn!(url = %tracker.url, error = %e, "failed to sync tracker to server");
    }
}

pub async fn push_deleted(state: &AppState, tracker_id: i64) {
    if !remote_configured(state) {
        return;
    }
    if let Err(e) = state.remote.delete(tracker_id).await {
        tracing::warn!(tracker_id, error = %e, "failed to delete tracker from server");
    }
}
