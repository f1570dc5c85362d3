//! JWT issue/validate over HS256.
//!
//! Signature handling lives here; the deterministic claim-window checks live
//! in [`crate::claims`]. The API layer holds a `dyn TokenValidator` so it
//! never learns which algorithm backs the tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use ecocrop_core::{Email, UserId};

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

/// Token lifetime for issued sessions (7 days).
const TOKEN_TTL_HOURS: i64 = 24 * 7;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encode(String),

    #[error("invalid token")]
    Invalid,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Validates a bearer token and returns its claims.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// HS256 token codec over a shared secret.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a session token for an authenticated user.
    pub fn issue(&self, user_id: UserId, email: &Email, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = JwtClaims {
            sub: user_id,
            email: email.as_str().to_string(),
            issued_at: now,
            expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }
}

impl TokenValidator for Hs256TokenCodec {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        // Claims carry RFC 3339 timestamps rather than numeric `exp`/`iat`,
        // so the library's own time checks are disabled and the window is
        // validated by `validate_claims` instead.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
