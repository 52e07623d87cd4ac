use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::metrics::UNMATCHED_PATH;
use crate::state::AppState;

pub const METRICS_PATH: &str = "/metrics";

/// Counts and times every routed request, labelled with its route template.
/// The scrape endpoint itself is skipped. Runs as a route layer, so the
/// matched path is always present.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => UNMATCHED_PATH.to_string(),
    };

    if path == METRICS_PATH {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    state.metrics.record_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );

    response
}

/// Fallback for requests that match no route; all of them share one label.
pub async fn unmatched(State(state): State<AppState>, req: Request) -> Response {
    state.metrics.record_request(
        req.method().as_str(),
        UNMATCHED_PATH,
        StatusCode::NOT_FOUND.as_u16(),
        0.0,
    );

    ApiError::NotFound("Not Found".to_string()).into_response()
}
