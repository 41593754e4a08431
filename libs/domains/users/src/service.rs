use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, LoginRequest, UpdateUser, User, UserResponse, normalize_email};
use crate::repository::UserRepository;

/// Hash a plaintext password into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Service layer for account business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new account
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, input: CreateUser) -> UserResult<UserResponse> {
        input.validate()?;

        let email = normalize_email(&input.email);
        if self.repository.email_exists(&email).await? {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.name, &email, password_hash);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Resolve a login attempt to the account it authenticates.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, input))]
    pub async fn verify_credentials(&self, input: &LoginRequest) -> UserResult<UserResponse> {
        let email = normalize_email(&input.email);

        let user = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash) {
            tracing::info!(user_id = %user.id, "Rejected login: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(UserError::Inactive);
        }

        Ok(user.into())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self.find(id).await?;
        Ok(user.into())
    }

    /// Get a user by ID on behalf of `caller_id`
    #[instrument(skip(self))]
    pub async fn get_user_for(&self, caller_id: Uuid, id: Uuid) -> UserResult<UserResponse> {
        ensure_self(caller_id, id)?;
        self.get_user(id).await
    }

    /// Partially update a user on behalf of `caller_id`
    #[instrument(skip(self, input))]
    pub async fn update_user_for(
        &self,
        caller_id: Uuid,
        id: Uuid,
        input: UpdateUser,
    ) -> UserResult<UserResponse> {
        ensure_self(caller_id, id)?;
        input.validate()?;

        let mut user = self.find(id).await?;

        if let Some(ref email) = input.email {
            let email = normalize_email(email);
            if email != user.email && self.repository.email_exists(&email).await? {
                return Err(UserError::DuplicateEmail(email));
            }
        }

        let new_hash = input.password.as_deref().map(hash_password).transpose()?;
        user.apply_update(input, new_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete a user and their tasks on behalf of `caller_id`
    #[instrument(skip(self))]
    pub async fn delete_user_for(&self, caller_id: Uuid, id: Uuid) -> UserResult<()> {
        ensure_self(caller_id, id)?;

        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    async fn find(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}

// Ownership is decided before existence, so probing other ids always yields 403.
fn ensure_self(caller_id: Uuid, id: Uuid) -> UserResult<()> {
    if caller_id != id {
        return Err(UserError::Forbidden(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn stored_user(email: &str, password: &str) -> User {
        User::new("Ada".into(), email, hash_password(password).unwrap())
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        assert_ne!(hash_password("password1").unwrap(), hash_password("password1").unwrap());
    }

    #[test]
    fn test_verify_against_garbage_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_signup_hashes_and_normalizes() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists()
            .with(eq("ada@example.com"))
            .returning(|_| Ok(false));
        repo.expect_create().returning(|user| Ok(user));

        let service = UserService::new(repo);
        let created = service
            .signup(CreateUser {
                name: "Ada".into(),
                email: "Ada@Example.com".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();

        assert_eq!(created.email, "ada@example.com");
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(true));
        repo.expect_create().never();

        let service = UserService::new(repo);
        let result = service
            .signup(CreateUser {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "password123".into(),
            })
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let repo = MockUserRepository::new();
        let service = UserService::new(repo);

        let result = service
            .signup(CreateUser {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "short".into(),
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let user = stored_user("ada@example.com", "password123");
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .with(eq("ada@example.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo);

        let ok = service
            .verify_credentials(&LoginRequest {
                email: " ADA@example.com".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();
        assert_eq!(ok.id, user_id);

        let wrong = service
            .verify_credentials(&LoginRequest {
                email: "ada@example.com".into(),
                password: "password124".into(),
            })
            .await;
        assert!(matches!(wrong, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_credentials_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().returning(|_| Ok(None));

        let service = UserService::new(repo);
        let result = service
            .verify_credentials(&LoginRequest {
                email: "ghost@example.com".into(),
                password: "password123".into(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_credentials_inactive_account() {
        let mut user = stored_user("ada@example.com", "password123");
        user.is_active = false;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo);
        let result = service
            .verify_credentials(&LoginRequest {
                email: "ada@example.com".into(),
                password: "password123".into(),
            })
            .await;

        assert!(matches!(result, Err(UserError::Inactive)));
    }

    #[tokio::test]
    async fn test_foreign_user_is_forbidden_before_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().never();
        repo.expect_delete().never();

        let service = UserService::new(repo);
        let caller = Uuid::now_v7();
        let other = Uuid::now_v7();

        assert!(matches!(
            service.get_user_for(caller, other).await,
            Err(UserError::Forbidden(id)) if id == other
        ));
        assert!(matches!(
            service.delete_user_for(caller, other).await,
            Err(UserError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_self_is_not_found() {
        let id = Uuid::now_v7();
        let mut repo = MockUserRepository::new();
        repo.expect_delete().with(eq(id)).returning(|_| Ok(false));

        let service = UserService::new(repo);
        assert!(matches!(
            service.delete_user_for(id, id).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let user = stored_user("ada@example.com", "password123");
        let id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(|u| verify_password("new-password", &u.password_hash))
            .returning(|u| Ok(u));

        let service = UserService::new(repo);
        let updated = service
            .update_user_for(
                id,
                id,
                UpdateUser {
                    password: Some("new-password".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let user = stored_user("ada@example.com", "password123");
        let id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_email_exists()
            .with(eq("grace@example.com"))
            .returning(|_| Ok(true));
        repo.expect_update().never();

        let service = UserService::new(repo);
        let result = service
            .update_user_for(
                id,
                id,
                UpdateUser {
                    email: Some("Grace@example.com".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }
}
