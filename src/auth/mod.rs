pub mod cookies;
pub mod identity;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::database::DatabaseError;
use crate::upstream::UpstreamError;

pub use identity::{Credentials, Identity, IdentityProvider, JwtIdentity, UpstreamIdentity};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("No credentials supplied")]
    MissingCredentials,

    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Session token claims for locally issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: &str, user_id: i64, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: username.to_string(),
            uid: user_id,
            iat: now.timestamp(),
            exp,
        }
    }
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry of a locally issued token
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// bcrypt hash for storage; the salt and cost travel inside the hash string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, password_hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn issued_token_validates() {
        let security = AppConfig::development().security;
        let claims = Claims::new("ana", 7, 24);
        let token = generate_jwt(&claims, &security).unwrap();

        let decoded = validate_jwt(&token, &security.jwt_secret).unwrap();
        assert_eq!(decoded.sub, "ana");
        assert_eq!(decoded.uid, 7);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = AppConfig::development().security;
        let now = Utc::now().timestamp();
        let claims = Claims { sub: "ana".into(), uid: 1, iat: now - 7200, exp: now - 3600 };
        let token = generate_jwt(&claims, &security).unwrap();

        let err = validate_jwt(&token, &security.jwt_secret).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new("ana", 1, 1), &security).unwrap();
        assert!(validate_jwt(&token, "another-secret").is_err());
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        let err = generate_jwt(&Claims::new("ana", 1, 1), &security).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSecret));
    }

    #[test]
    fn password_hash_is_a_salted_bcrypt_string() {
        let hash = hash_password("s3nha").unwrap();
        assert!(hash.starts_with("$2b$12$"), "{}", hash);
        assert_ne!(hash, hash_password("s3nha").unwrap());

        assert!(verify_password("s3nha", &hash).unwrap());
        assert!(!verify_password("senha", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let err = verify_password("s3nha", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, AuthError::PasswordHash(_)));
    }
}
