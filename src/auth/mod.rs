use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Capability that grants every other capability
pub const WILDCARD_CAPABILITY: &str = "*";

/// An authenticated actor whose granted capabilities gate what it may see
pub trait Principal: Send + Sync {
    fn has_capability(&self, name: &str) -> bool;
}

/// Capability check over a plain list of granted names
pub fn grants(granted: &[String], name: &str) -> bool {
    granted.iter().any(|g| g == name || g == WILDCARD_CAPABILITY)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, name: String, permissions: Vec<String>) -> Self {
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self::with_expiry(user_id, name, permissions, expiry_hours)
    }

    pub fn with_expiry(user_id: Uuid, name: String, permissions: Vec<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            name,
            permissions,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

/// Sign claims with the configured secret
pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    encode_token(claims, &config::config().security.jwt_secret)
}

/// Validate a token against the configured secret
pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    decode_token(token, &config::config().security.jwt_secret)
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}
