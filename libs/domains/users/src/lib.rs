//! Users Domain
//!
//! Accounts, password login and bearer-token issuance.
//!
//! - Passwords are hashed with Argon2 and never serialized
//! - Emails are unique and stored lowercased
//! - Every route except signup and login requires a bearer token, and a caller
//!   may only read, update or delete their own account
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, bearer auth
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ownership, hashing, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + SeaORM implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{handlers, SqlUserRepository, UserService};
//!
//! let service = UserService::new(SqlUserRepository::new(db));
//! let router = handlers::router(service, JwtAuth::new(&jwt_config));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod sql;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, LoginRequest, TokenResponse, UpdateUser, User, UserResponse};
pub use repository::UserRepository;
pub use service::{UserService, hash_password, verify_password};
pub use sql::SqlUserRepository;
