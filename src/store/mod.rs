//! Key-value store capability used by the task repository and the raw key
//! endpoints.
//!
//! Every call is a single round-trip to the backing store. Nothing is cached
//! locally and nothing is retried: a connectivity failure surfaces to the
//! caller as [`StoreError::Connection`].

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use memory::InMemoryStore;
pub use self::redis::RedisStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store was reached but rejected or failed the command.
    #[error("command error: {0}")]
    Command(String),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn hget(&self, bucket: &str, field: &str) -> Result<Option<String>, StoreError>;

    async fn hset(&self, bucket: &str, field: &str, value: &str) -> Result<(), StoreError>;

    async fn hgetall(&self, bucket: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Number of fields in the bucket, readable or not.
    async fn hlen(&self, bucket: &str) -> Result<u64, StoreError>;

    /// Returns the number of fields removed.
    async fn hdel(&self, bucket: &str, field: &str) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<bool, StoreError>;
}
