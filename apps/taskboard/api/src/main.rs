use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so boot errors are reported with color
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::connect_from_config(config.database.clone())
        .await
        .wrap_err("Failed to connect to the database")?;

    // Create the tables on every boot; existing ones are left alone
    database::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .wrap_err("Failed to create database tables")?;

    let state = AppState::new(config, db);

    // API routes, docs, `/`, `/health` and `/ready`
    let app = api::app(&state).wrap_err("Failed to build router")?;

    info!(
        "Starting {} v{} with graceful shutdown ({}s cleanup timeout)",
        state.config.app.name, state.config.app.version, state.config.server.shutdown_grace_secs
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(()) => info!("Database connections closed"),
            Err(e) => tracing::error!("Error closing database: {}", e),
        }
    })
    .await
    .wrap_err("Server error")?;

    info!("Taskboard API shutdown complete");
    Ok(())
}
