use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::DatabaseConfig;
use eyre::WrapErr;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env().wrap_err("Invalid server configuration")?;
        let database = DatabaseConfig::from_env().wrap_err("Invalid database configuration")?;
        let jwt = JwtConfig::from_env().wrap_err("Invalid JWT configuration")?;

        Ok(Self {
            app: app_info!(),
            server,
            database,
            jwt,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_from_env_composes_components() {
        temp_env::with_vars(
            [
                ("APP_ENV", Some("production")),
                ("PORT", Some("9000")),
                ("DATABASE_URL", Some("postgres://localhost/taskboard")),
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_EXPIRATION_SECS", Some("600")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.environment.is_production());
                assert_eq!(config.server.port, 9000);
                assert_eq!(config.database.url, "postgres://localhost/taskboard");
                assert_eq!(config.jwt.expiration_secs, 600);
                assert_eq!(config.app.name, "taskboard_api");
            },
        );
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/taskboard")),
                ("JWT_SECRET", None::<&str>),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(format!("{:?}", err).contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [("DATABASE_URL", None::<&str>), ("JWT_SECRET", Some(SECRET))],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
