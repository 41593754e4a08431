use async_trait::async_trait;
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{Task, TaskFilter, TaskSort},
    repository::TaskRepository,
};

const LIKE_ESCAPE: char = '!';

/// [`TaskRepository`] backed by a SeaORM connection (Postgres or SQLite).
pub struct SqlTaskRepository {
    db: DatabaseConnection,
}

impl SqlTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `%term%` with LIKE wildcards in `term` escaped, lowercased for `LOWER(col)`.
///
/// The term is folded with Unicode rules to match Postgres `LOWER`. SQLite's
/// built-in `LOWER` folds ASCII only, so there a non-ASCII search matches
/// stored text of the same case only.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match on title OR description.
fn search_condition(term: &str) -> Condition {
    let pattern = like_pattern(term);
    let like = || LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE);

    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(entity::Column::Title))).like(like()))
        .add(Expr::expr(Func::lower(Expr::col(entity::Column::Description))).like(like()))
}

/// Owner, status and search conditions shared by the count and the page query.
fn filtered(user_id: Uuid, filter: &TaskFilter) -> Select<entity::Entity> {
    let mut query = entity::Entity::find().filter(entity::Column::UserId.eq(user_id));

    if let Some(status) = filter.status {
        query = query.filter(entity::Column::Status.eq(status));
    }

    if let Some(term) = filter.search_term() {
        query = query.filter(search_condition(term));
    }

    query
}

fn sorted(query: Select<entity::Entity>, sort: TaskSort) -> Select<entity::Entity> {
    let query = match sort {
        // Missing deadlines sort last on every backend
        TaskSort::Deadline => query
            .order_by_asc(Expr::col(entity::Column::Deadline).is_null())
            .order_by_asc(entity::Column::Deadline)
            .order_by_asc(entity::Column::CreatedAt),
        TaskSort::CreatedAt => query.order_by_asc(entity::Column::CreatedAt),
    };

    query.order_by_asc(entity::Column::Id)
}

#[async_trait]
impl TaskRepository for SqlTaskRepository {
    async fn owner_exists(&self, user_id: Uuid) -> TaskResult<bool> {
        let count = domain_users::entity::Entity::find_by_id(user_id)
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, task: Task) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = (&task).into();

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                // The owner was deleted between the existence check and the insert
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    TaskError::UserNotFound(task.user_id)
                }
                _ => e.into(),
            }
        })?;

        tracing::info!(task_id = %model.id, user_id = %model.user_id, "Created task");
        Ok(model.into())
    }

    async fn get(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(task_id)
            .filter(entity::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, user_id: Uuid, filter: &TaskFilter) -> TaskResult<(Vec<Task>, u64)> {
        let query = filtered(user_id, filter);

        let total = query.clone().count(&self.db).await?;

        let models = sorted(query, filter.sort)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, task: Task) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = (&task).into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => TaskError::NotFound(task.id),
            e => e.into(),
        })?;

        tracing::info!(task_id = %model.id, "Updated task");
        Ok(model.into())
    }

    async fn delete(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<bool> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::Id.eq(task_id))
            .filter(entity::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = %task_id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_lowercases_and_wraps() {
        assert_eq!(like_pattern("Report"), "%report%");
    }

    #[test]
    fn test_like_pattern_folds_non_ascii() {
        assert_eq!(like_pattern("ÉTÉ"), "%été%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off!"), "%50!%!_off!!%");
    }
}
