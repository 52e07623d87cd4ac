use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Scrape endpoint. Task gauges are recomputed from the whole bucket first;
/// if the store cannot be read they keep their last values and the counters
/// are still exported.
pub async fn scrape(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    match state.tasks.task_counts().await {
        Ok(counts) => state
            .metrics
            .refresh_task_gauges(counts.current, counts.pending),
        Err(e) => tracing::warn!("Keeping previous task gauges: {}", e),
    }

    let body = state.metrics.gather().map_err(|e| {
        tracing::error!("Failed to encode metrics: {}", e);
        ApiError::Internal("Failed to encode metrics".to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
