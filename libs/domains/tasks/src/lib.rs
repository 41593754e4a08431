//! Tasks Domain
//!
//! Tasks belong to exactly one user and are only reachable through that user:
//! every route lives under `/{user_id}/tasks` and requires the caller to be
//! `user_id`. Deleting the user deletes their tasks through the foreign key.
//!
//! Listings support a status filter, case-insensitive search over title and
//! description, sorting by deadline or creation time, and limit/offset
//! pagination with a total count.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, bearer auth
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ownership, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + SeaORM implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, filter
//! └─────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod sql;

pub use error::{TaskError, TaskResult};
pub use handlers::ApiDoc;
pub use models::{CreateTask, Task, TaskFilter, TaskPage, TaskSort, TaskStatus, UpdateTask};
pub use repository::TaskRepository;
pub use service::TaskService;
pub use sql::SqlTaskRepository;
