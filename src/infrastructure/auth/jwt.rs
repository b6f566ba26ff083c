//! Session tokens signed with a shared secret

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::{Email, User};
use crate::domain::DomainError;

pub const INVALID_TOKEN: &str = "Invalid or expired token.";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user email)
    pub sub: String,
    pub username: String,
    /// Issued at (Unix epoch)
    pub iat: i64,
    /// Expiration (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(user: &User, issued_at: DateTime<Utc>, expiration_hours: u64) -> Self {
        let exp = issued_at + Duration::hours(expiration_hours as i64);

        Self {
            sub: user.email().as_str().to_string(),
            username: user.username().to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Identity the token is bound to
    pub fn email(&self) -> Result<Email, DomainError> {
        Email::new(self.sub.as_str()).map_err(|_| DomainError::unauthorized(INVALID_TOKEN))
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds
    pub expires: i64,
    pub created_at: DateTime<Utc>,
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

/// Issues and resolves session tokens
pub trait JwtGenerator: Send + Sync + Debug {
    /// Sign a token bound to the user's email
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError>;

    /// Check signature and expiry; every failure is `Unauthorized`
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;

    fn expiration_hours(&self) -> u64;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError> {
        let created_at = Utc::now();
        let claims = JwtClaims::new(user, created_at, self.config.expiration_hours);

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires: claims.exp - claims.iat,
            created_at,
        })
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::unauthorized(INVALID_TOKEN))
    }

    fn expiration_hours(&self) -> u64 {
        self.config.expiration_hours
    }
}
