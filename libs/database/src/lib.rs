//! Relational database plumbing on top of SeaORM.
//!
//! Production runs against PostgreSQL; tests use in-memory SQLite through the
//! same code paths. The backend is picked from the URL scheme.
//!
//! ```ignore
//! use database::{DatabaseConfig, connect_from_config, run_migrations};
//! use migration::Migrator;
//!
//! let db = connect_from_config(DatabaseConfig::from_env()?).await?;
//! run_migrations::<Migrator>(&db, "taskboard_api").await?;
//! ```

mod config;
mod connector;
mod error;
mod health;

pub use config::DatabaseConfig;
pub use connector::{connect, connect_from_config, run_migrations};
pub use error::{DatabaseError, DatabaseResult};
pub use health::check_health;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
