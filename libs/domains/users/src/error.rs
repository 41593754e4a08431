use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("User account is inactive")]
    Inactive,

    #[error("Caller may not act on user {0}")]
    Forbidden(Uuid),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Internal(format!("Database error: {}", err))
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::DuplicateEmail(_) => {
                AppError::Conflict("Email already registered".to_string())
            }
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Incorrect email or password".to_string())
            }
            UserError::Inactive => AppError::Forbidden("User account is inactive".to_string()),
            UserError::Forbidden(_) => AppError::Forbidden("Not authorized".to_string()),
            UserError::Validation(errors) => AppError::ValidationError(errors),
            UserError::PasswordHash(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
