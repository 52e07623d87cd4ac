//! HTTP to-do service backed by a Redis hash, with health, configuration and
//! Prometheus metrics endpoints.

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod store;
