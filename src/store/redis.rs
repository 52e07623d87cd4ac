//! Redis implementation of [`KeyValueStore`].
//!
//! Connects either directly to a single node or discovers the current master
//! through Redis Sentinel. A multiplexed connection is opened per operation;
//! the client itself is shared.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::sentinel::{SentinelClient, SentinelServerType};
use redis::AsyncCommands;
use tokio::sync::Mutex;

use super::{KeyValueStore, StoreError};
use crate::config::{Config, SentinelConfig};

enum Connector {
    Direct(redis::Client),
    // SentinelClient needs `&mut self` to resolve the master.
    Sentinel(Mutex<SentinelClient>),
}

pub struct RedisStore {
    connector: Connector,
}

impl RedisStore {
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        match &config.sentinel {
            Some(sentinel) => Self::sentinel(sentinel),
            None => Self::from_url(&config.redis_url()),
        }
    }

    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            connector: Connector::Direct(client),
        })
    }

    pub fn sentinel(sentinel: &SentinelConfig) -> Result<Self, StoreError> {
        let nodes: Vec<String> = sentinel
            .nodes
            .iter()
            .map(|node| {
                if node.contains("://") {
                    node.clone()
                } else {
                    format!("redis://{}", node)
                }
            })
            .collect();

        let client = SentinelClient::build(
            nodes,
            sentinel.master_name.clone(),
            None,
            SentinelServerType::Master,
        )
        .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            connector: Connector::Sentinel(Mutex::new(client)),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        let result = match &self.connector {
            Connector::Direct(client) => client.get_multiplexed_async_connection().await,
            Connector::Sentinel(client) => client.lock().await.get_async_connection().await,
        };

        result.map_err(|e| StoreError::Connection(e.to_string()))
    }
}

fn command_error(error: redis::RedisError) -> StoreError {
    if error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
    {
        StoreError::Connection(error.to_string())
    } else {
        StoreError::Command(error.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        conn.get(key).await.map_err(command_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value).await.map_err(command_error)
    }

    async fn hget(&self, bucket: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        conn.hget(bucket, field).await.map_err(command_error)
    }

    async fn hset(&self, bucket: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        conn.hset::<_, _, _, ()>(bucket, field, value)
            .await
            .map_err(command_error)
    }

    async fn hgetall(&self, bucket: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.connection().await?;
        conn.hgetall(bucket).await.map_err(command_error)
    }

    async fn hlen(&self, bucket: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        conn.hlen(bucket).await.map_err(command_error)
    }

    async fn hdel(&self, bucket: &str, field: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        conn.hdel(bucket, field).await.map_err(command_error)
    }

    async fn ping(&self) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;

        Ok(pong == "PONG")
    }
}
