use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

mod health;
mod kv;
mod metrics;
mod middleware_metrics;
pub mod tasks;

pub use health::{config, health};
pub use middleware_metrics::METRICS_PATH;

use crate::config::Config;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let task_router = Router::new()
        .route("/", post(tasks::routes::create).get(tasks::routes::list))
        .route("/{id}", delete(tasks::routes::delete))
        .route("/{id}/complete", post(tasks::routes::complete))
        .route("/{id}/incomplete", post(tasks::routes::incomplete));

    Router::new()
        .route("/health", get(health))
        .route("/config", get(config))
        .route(METRICS_PATH, get(metrics::scrape))
        .route("/get/{key}", get(kv::get_value))
        .route("/set/{key}/{value}", post(kv::set_value))
        .nest("/tasks", task_router)
}

/// The fully layered application: routes, request metrics, CORS and tracing.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middleware_metrics::track_requests,
        ))
        .fallback(middleware_metrics::unmatched)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // Credentials forbid wildcards, so methods and headers are mirrored.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
