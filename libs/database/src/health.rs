use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::error::{DatabaseError, DatabaseResult};

/// Round-trips to the database; used by the readiness probe.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    debug!("Running database health check");

    db.ping()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    debug!("Database health check passed");
    Ok(())
}
