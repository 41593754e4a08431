use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{DatabaseError, DatabaseResult};

/// Connect with default pool settings.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_from_config(DatabaseConfig::new(database_url)).await
}

/// Connect using a [`DatabaseConfig`].
pub async fn connect_from_config(config: DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let max_connections = config.max_connections;
    let db = Database::connect(config.into_connect_options()).await?;

    info!(
        backend = ?db.get_database_backend(),
        max_connections,
        "Connected to database"
    );

    Ok(db)
}

/// Apply every pending migration of `M`.
///
/// The taskboard migrator only creates tables, so this is the boot-time
/// "ensure tables exist" step and is safe to run on every start.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}
