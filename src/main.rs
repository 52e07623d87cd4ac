use std::sync::Arc;

use redis_task_api::config::Config;
use redis_task_api::routes;
use redis_task_api::state::AppState;
use redis_task_api::store::RedisStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_task_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Running in environment: {}", config.environment);
    tracing::info!("External URL: {}", config.external_url);
    match &config.sentinel {
        Some(sentinel) => tracing::info!(
            "Redis: sentinel master '{}' via {:?}",
            sentinel.master_name,
            sentinel.nodes
        ),
        None => tracing::info!("Redis: {}:{}", config.redis_host, config.redis_port),
    }
    tracing::info!("CORS origins: {:?}", config.cors_origins);

    let store = RedisStore::from_config(&config).expect("Error creating Redis client");
    let addr = config.addr();

    let state = AppState::new(config, Arc::new(store)).expect("Error registering metrics");

    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("server is chilling at http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
