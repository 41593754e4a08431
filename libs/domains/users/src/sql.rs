use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

/// [`UserRepository`] backed by a SeaORM connection (Postgres or SQLite).
pub struct SqlUserRepository {
    db: DatabaseConnection,
}

impl SqlUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// A unique violation on insert/update can only come from the email index.
fn map_write_error(err: DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        if self.email_exists(&user.email).await? {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let active_model: entity::ActiveModel = (&user).into();
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &user.email))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let taken = entity::Entity::find()
            .filter(entity::Column::Email.eq(&user.email))
            .filter(entity::Column::Id.ne(user.id))
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let active_model: entity::ActiveModel = (&user).into();
        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => UserError::NotFound(user.id),
            e => map_write_error(e, &user.email),
        })?;

        tracing::info!(user_id = %model.id, "Updated user");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
