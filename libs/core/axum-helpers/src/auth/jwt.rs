use super::config::JwtConfig;
use crate::errors::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // Subject (user ID)
    pub email: String, // User email
    pub name: String,  // User name
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
    pub jti: String,   // Token ID
}

/// HS256 token issuer and verifier.
///
/// Cheap to clone; the keys are shared.
#[derive(Clone)]
pub struct JwtAuth {
    keys: Arc<Keys>,
    expiration_secs: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            expiration_secs: config.expiration_secs,
        }
    }

    /// Lifetime of issued tokens, in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }

    pub fn create_token(&self, user_id: Uuid, email: &str, name: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            exp: (now + Duration::seconds(self.expiration_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding).map_err(|e| {
            AppError::InternalServerError(format!("Failed to sign token: {}", e))
        })
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let token_data = decode::<JwtClaims>(
            token,
            &self.keys.decoding,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::debug!("JWT verification failed: {}", e);
            AppError::Unauthorized("Invalid token".to_string())
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-for-hs256"))
    }

    #[test]
    fn test_create_and_verify_token() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let token = auth.create_token(user_id, "ada@example.com", "Ada").unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-long-enough-too"));
        let token = other.create_token(Uuid::now_v7(), "a@b.c", "A").unwrap();

        assert!(matches!(auth().verify_token(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = JwtAuth::new(
            &JwtConfig::new("test-secret-that-is-long-enough-for-hs256").with_expiration_secs(-600),
        );
        let token = auth.create_token(Uuid::now_v7(), "a@b.c", "A").unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(auth().verify_token("not.a.jwt").is_err());
    }
}
