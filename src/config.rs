use dotenvy::dotenv;
use std::env;
use thiserror::Error;

const LOCAL_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:8080",
    "http://127.0.0.1:8080",
    "http://localhost:3000",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got '{value}'")]
    InvalidPort { name: &'static str, value: String },
}

/// High-availability discovery through Redis Sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelConfig {
    pub master_name: String,
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub redis_host: String,
    pub redis_port: u16,
    pub sentinel: Option<SentinelConfig>,
    pub host: String,
    pub port: u16,
    pub external_url: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv().is_ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "local".to_string());
        let is_local = environment == "local";

        let redis_host = lookup("REDIS_HOST").unwrap_or_else(|| {
            if is_local { "redis" } else { "localhost" }.to_string()
        });
        let redis_port = parse_port("REDIS_PORT", lookup("REDIS_PORT"), 6379)?;

        let sentinel = lookup("REDIS_SENTINELS")
            .map(|raw| split_list(&raw))
            .filter(|nodes| !nodes.is_empty())
            .map(|nodes| SentinelConfig {
                master_name: lookup("REDIS_SENTINEL_MASTER")
                    .unwrap_or_else(|| "mymaster".to_string()),
                nodes,
            });

        let port = parse_port("PORT", lookup("PORT"), 8000)?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let external_url =
            lookup("EXTERNAL_URL").unwrap_or_else(|| format!("http://localhost:{}", port));

        let cors_origins = if is_local {
            LOCAL_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            let mut origins = Vec::new();
            if let Some(frontend) = lookup("FRONTEND_URL").filter(|v| !v.is_empty()) {
                origins.push(frontend);
            }
            if let Some(additional) = lookup("ADDITIONAL_CORS_ORIGINS") {
                origins.extend(split_list(&additional));
            }
            origins
        };

        Ok(Self {
            environment,
            redis_host,
            redis_port,
            sentinel,
            host,
            port,
            external_url,
            cors_origins,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}", self.redis_host, self.redis_port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_local(&self) -> bool {
        self.environment == "local"
    }
}

fn parse_port(name: &'static str, raw: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort { name, value }),
    }
}

// Comma separated, blanks dropped
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
