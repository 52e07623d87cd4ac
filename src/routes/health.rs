use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RedisStatus {
    host: String,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    connected: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    status: &'static str,
    environment: String,
    external_url: String,
    redis: RedisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    redis_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigData {
    environment: String,
    external_url: String,
    cors_origins: Vec<String>,
    redis: RedisStatus,
    is_production: bool,
}

/// Reports store reachability. An unreachable store yields 503 with the
/// same payload shape and a `redis_error` field.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthData>) {
    let config = &state.config;
    let ping = state.store.ping().await;

    let (status_code, status, connected, redis_error) = match ping {
        Ok(connected) => (StatusCode::OK, "healthy", connected, None),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            state.metrics.record_health_failure();
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", false, Some(e.to_string()))
        }
    };

    let health_data = HealthData {
        status,
        environment: config.environment.clone(),
        external_url: config.external_url.clone(),
        redis: RedisStatus {
            host: config.redis_host.clone(),
            port: config.redis_port,
            connected: Some(connected),
        },
        redis_error,
    };

    (status_code, Json(health_data))
}

pub async fn config(State(state): State<AppState>) -> Json<ConfigData> {
    let config = &state.config;

    Json(ConfigData {
        environment: config.environment.clone(),
        external_url: config.external_url.clone(),
        cors_origins: config.cors_origins.clone(),
        redis: RedisStatus {
            host: config.redis_host.clone(),
            port: config.redis_port,
            connected: None,
        },
        is_production: config.is_production(),
    })
}
