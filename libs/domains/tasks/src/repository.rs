use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{Task, TaskFilter};

/// Persistence for tasks. Every lookup is scoped by the owning user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Whether a user with this id exists
    async fn owner_exists(&self, user_id: Uuid) -> TaskResult<bool>;

    async fn create(&self, task: Task) -> TaskResult<Task>;

    /// The task `task_id` if it belongs to `user_id`
    async fn get(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<Option<Task>>;

    /// One page of `user_id`'s tasks plus the total matching `filter`,
    /// regardless of limit and offset
    async fn list(&self, user_id: Uuid, filter: &TaskFilter) -> TaskResult<(Vec<Task>, u64)>;

    async fn update(&self, task: Task) -> TaskResult<Task>;

    /// Returns false when no task of `user_id` matched
    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<bool>;
}
