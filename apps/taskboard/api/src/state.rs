//! Shared application state.

use axum_helpers::JwtAuth;
use database::DatabaseConnection;

/// Cloned into every domain router and the readiness probe; all fields are
/// cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Connection pool
    pub db: DatabaseConnection,
    /// Token issuer/verifier shared by login and the auth middleware
    pub jwt: JwtAuth,
}

impl AppState {
    pub fn new(config: crate::config::Config, db: DatabaseConnection) -> Self {
        let jwt = JwtAuth::new(&config.jwt);
        Self { config, db, jwt }
    }
}
