//! Task persistence over the `tasks` hash bucket.
//!
//! Each task is one field of the bucket, keyed by its id, holding the JSON
//! encoded record. Writes overwrite unconditionally: concurrent updates of the
//! same task are last-writer-wins.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use super::model::Task;
use crate::store::{KeyValueStore, StoreError};

pub const TASKS_BUCKET: &str = "tasks";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize task {id}: {source}")]
    Serialization {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored task {id} is corrupted: {source}")]
    Deserialization {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn KeyValueStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, task: &Task) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(task).map_err(|source| RepositoryError::Serialization {
            id: task.id,
            source,
        })?;

        self.store
            .hset(TASKS_BUCKET, &task.id.to_string(), &json)
            .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        let id = id.to_string();

        self.store
            .hget(TASKS_BUCKET, &id)
            .await?
            .map(|json| decode(&id, &json))
            .transpose()
    }

    /// All tasks, newest first. Records that fail to decode are skipped.
    pub async fn list_all(&self) -> Result<Vec<Task>, RepositoryError> {
        let records = self.store.hgetall(TASKS_BUCKET).await?;

        let mut tasks: Vec<Task> = records
            .iter()
            .filter_map(|(id, json)| match decode(id, json) {
                Ok(task) => Some(task),
                Err(e) => {
                    tracing::warn!(task_id = %id, error = %e, "Skipping corrupted task record");
                    None
                }
            })
            .collect();

        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(tasks)
    }

    /// Number of stored records, including ones that fail to decode.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.store.hlen(TASKS_BUCKET).await?)
    }

    /// Returns whether a record existed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let removed = self.store.hdel(TASKS_BUCKET, &id.to_string()).await?;

        Ok(removed > 0)
    }
}

fn decode(id: &str, json: &str) -> Result<Task, RepositoryError> {
    serde_json::from_str(json).map_err(|source| RepositoryError::Deserialization {
        id: id.to_string(),
        source,
    })
}
