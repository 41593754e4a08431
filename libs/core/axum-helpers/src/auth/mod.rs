//! Stateless bearer-token authentication.
//!
//! - [`JwtAuth`] signs and verifies HS256 tokens
//! - [`jwt_auth_middleware`] guards routes and stores [`JwtClaims`] in the request
//! - [`CurrentUser`] hands the verified identity to handlers
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/me", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod current_user;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use current_user::CurrentUser;
pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::jwt_auth_middleware;
