//! Throwaway relational database for tests.
//!
//! Each [`TestDatabase`] is a private in-memory SQLite database with the
//! production tables created by the same migrator the API runs at boot.

use database::{DatabaseConfig, connect_from_config, run_migrations};
use migration::Migrator;
use sea_orm::DatabaseConnection;

pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    /// Fresh database with all tables created.
    ///
    /// The pool is pinned to a single connection: every SQLite `:memory:`
    /// connection is its own database.
    pub async fn new() -> Self {
        let config = DatabaseConfig::new("sqlite::memory:").with_pool_size(1, 1);

        let connection = connect_from_config(config)
            .await
            .expect("Failed to open in-memory SQLite database");

        run_migrations::<Migrator>(&connection, "test")
            .await
            .expect("Failed to create tables");

        tracing::debug!("Test database ready (in-memory SQLite)");

        Self { connection }
    }

    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }
}
