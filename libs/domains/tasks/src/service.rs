use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskFilter, TaskPage, UpdateTask};
use crate::repository::TaskRepository;

/// Service layer for task business logic.
///
/// Every operation takes the authenticated `caller_id` and the `user_id` from
/// the path. A mismatch is `Forbidden` before anything is read.
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_task(
        &self,
        caller_id: Uuid,
        user_id: Uuid,
        input: CreateTask,
    ) -> TaskResult<Task> {
        self.authorize(caller_id, user_id).await?;
        input.validate()?;

        self.repository.create(Task::new(user_id, input)).await
    }

    #[instrument(skip(self, filter))]
    pub async fn list_tasks(
        &self,
        caller_id: Uuid,
        user_id: Uuid,
        filter: TaskFilter,
    ) -> TaskResult<TaskPage> {
        self.authorize(caller_id, user_id).await?;
        filter.validate()?;

        let (data, total) = self.repository.list(user_id, &filter).await?;

        Ok(TaskPage {
            total,
            limit: filter.limit,
            offset: filter.offset,
            data,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, caller_id: Uuid, user_id: Uuid, task_id: Uuid) -> TaskResult<Task> {
        self.authorize(caller_id, user_id).await?;
        self.find(user_id, task_id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_task(
        &self,
        caller_id: Uuid,
        user_id: Uuid,
        task_id: Uuid,
        input: UpdateTask,
    ) -> TaskResult<Task> {
        self.authorize(caller_id, user_id).await?;
        input.validate()?;

        let mut task = self.find(user_id, task_id).await?;
        task.apply_update(input);

        self.repository.update(task).await
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, caller_id: Uuid, user_id: Uuid, task_id: Uuid) -> TaskResult<()> {
        self.authorize(caller_id, user_id).await?;

        if !self.repository.delete(user_id, task_id).await? {
            return Err(TaskError::NotFound(task_id));
        }
        Ok(())
    }

    /// Caller must be the owner (403), and the owner must still exist (404).
    async fn authorize(&self, caller_id: Uuid, user_id: Uuid) -> TaskResult<()> {
        if caller_id != user_id {
            return Err(TaskError::Forbidden(user_id));
        }

        if !self.repository.owner_exists(user_id).await? {
            return Err(TaskError::UserNotFound(user_id));
        }
        Ok(())
    }

    async fn find(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<Task> {
        self.repository
            .get(user_id, task_id)
            .await?
            .ok_or(TaskError::NotFound(task_id))
    }
}
