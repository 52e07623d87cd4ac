//! In-process [`KeyValueStore`] used by tests and local experiments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{KeyValueStore, StoreError};

#[derive(Default)]
pub struct InMemoryStore {
    strings: RwLock<HashMap<String, String>>,
    buckets: RwLock<HashMap<String, HashMap<String, String>>>,
    unreachable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with [`StoreError::Connection`].
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("Connection refused".to_string()));
        }
        Ok(())
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Command(e.to_string())
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_reachable()?;
        let strings = self.strings.read().map_err(poisoned)?;
        Ok(strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_reachable()?;
        let mut strings = self.strings.write().map_err(poisoned)?;
        strings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn hget(&self, bucket: &str, field: &str) -> Result<Option<String>, StoreError> {
        self.check_reachable()?;
        let buckets = self.buckets.read().map_err(poisoned)?;
        Ok(buckets.get(bucket).and_then(|b| b.get(field)).cloned())
    }

    async fn hset(&self, bucket: &str, field: &str, value: &str) -> Result<(), StoreError> {
        self.check_reachable()?;
        let mut buckets = self.buckets.write().map_err(poisoned)?;
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hgetall(&self, bucket: &str) -> Result<HashMap<String, String>, StoreError> {
        self.check_reachable()?;
        let buckets = self.buckets.read().map_err(poisoned)?;
        Ok(buckets.get(bucket).cloned().unwrap_or_default())
    }

    async fn hlen(&self, bucket: &str) -> Result<u64, StoreError> {
        self.check_reachable()?;
        let buckets = self.buckets.read().map_err(poisoned)?;
        Ok(buckets.get(bucket).map_or(0, |b| b.len() as u64))
    }

    async fn hdel(&self, bucket: &str, field: &str) -> Result<u64, StoreError> {
        self.check_reachable()?;
        let mut buckets = self.buckets.write().map_err(poisoned)?;
        let removed = buckets
            .get_mut(bucket)
            .and_then(|b| b.remove(field))
            .is_some();
        Ok(u64::from(removed))
    }

    async fn ping(&self) -> Result<bool, StoreError> {
        self.check_reachable()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_fields_are_independent_per_bucket() {
        let store = InMemoryStore::new();
        store.hset("a", "x", "1").await.unwrap();
        store.hset("b", "x", "2").await.unwrap();

        assert_eq!(store.hget("a", "x").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.hget("b", "x").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.hlen("a").await.unwrap(), 1);
        assert_eq!(store.hdel("a", "x").await.unwrap(), 1);
        assert_eq!(store.hdel("a", "x").await.unwrap(), 0);
        assert!(store.hgetall("a").await.unwrap().is_empty());
        assert_eq!(store.hgetall("b").await.unwrap().len(), 1);
        assert_eq!(store.hlen("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unreachable_store_fails_with_connection_error() {
        let store = InMemoryStore::new();
        store.set_unreachable(true);

        assert!(matches!(store.ping().await, Err(StoreError::Connection(_))));
        assert!(matches!(store.get("k").await, Err(StoreError::Connection(_))));

        store.set_unreachable(false);
        assert!(store.ping().await.unwrap());
    }
}
