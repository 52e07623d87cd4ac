use thiserror::Error;
use uuid::Uuid;

use super::dto::Deleted;
use super::model::Task;
use super::queries::{RepositoryError, TaskRepository};
use crate::metrics::{Metrics, TaskEvent};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Task not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Inputs of the `tasks_current` and `tasks_pending` gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    /// Every stored record, including ones that fail to decode.
    pub current: u64,
    pub pending: u64,
}

/// Task use cases. Each call is independent; nothing is kept between
/// requests.
#[derive(Clone)]
pub struct TaskService {
    repository: TaskRepository,
    metrics: Metrics,
}

impl TaskService {
    pub fn new(repository: TaskRepository, metrics: Metrics) -> Self {
        Self {
            repository,
            metrics,
        }
    }

    pub async fn create_task(&self, text: &str) -> Result<Task, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Task text must not be empty".to_string(),
            ));
        }

        let task = Task::new(text);
        self.repository.save(&task).await?;
        self.metrics.record_task_event(TaskEvent::Created);

        tracing::debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.repository.list_all().await?)
    }

    pub async fn task_counts(&self) -> Result<TaskCounts, ServiceError> {
        let current = self.repository.count().await?;
        let pending = self
            .repository
            .list_all()
            .await?
            .iter()
            .filter(|t| !t.completed)
            .count() as u64;

        Ok(TaskCounts { current, pending })
    }

    pub async fn complete_task(&self, id: Uuid) -> Result<Task, ServiceError> {
        self.set_completed(id, true, TaskEvent::Completed).await
    }

    pub async fn incomplete_task(&self, id: Uuid) -> Result<Task, ServiceError> {
        self.set_completed(id, false, TaskEvent::Incompleted).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<Deleted, ServiceError> {
        if !self.repository.delete(id).await? {
            return Err(ServiceError::NotFound);
        }

        self.metrics.record_task_event(TaskEvent::Deleted);
        tracing::debug!(task_id = %id, "Task deleted");
        Ok(Deleted { ok: true })
    }

    // Read, modify, write: last writer wins.
    async fn set_completed(
        &self,
        id: Uuid,
        completed: bool,
        event: TaskEvent,
    ) -> Result<Task, ServiceError> {
        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        task.completed = completed;
        self.repository.save(&task).await?;
        self.metrics.record_task_event(event);

        tracing::debug!(task_id = %id, completed, "Task updated");
        Ok(task)
    }
}
