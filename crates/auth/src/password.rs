//! Salted, iterated password hashing.
//!
//! Stored encoding is a single opaque string:
//! `pbkdf2-sha256$<iterations>$<salt-b64>$<digest-b64>`
//!
//! The digest is a chained SHA-256 over `salt || password`, re-hashed
//! `iterations` times. Verification recomputes and compares in constant time.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD as B64;
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use ecocrop_core::DomainError;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const DEFAULT_ITERATIONS: u32 = 600_000;
const MIN_PASSWORD_BYTES: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    #[error("unrecognized password hash encoding")]
    MalformedEncoding,

    #[error("unsupported password hash scheme: {0}")]
    UnsupportedScheme(String),
}

/// Reject passwords the account surface should never accept.
pub fn validate_password_policy(password: &str) -> Result<(), DomainError> {
    if password.trim().is_empty() {
        return Err(DomainError::validation("password must not be empty"));
    }
    if password.len() < MIN_PASSWORD_BYTES {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_BYTES} characters"
        )));
    }
    Ok(())
}

/// A derived password hash, parseable from / encodable to its stored form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl PasswordHash {
    /// Derive a hash from a plaintext password with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        Self::derive_with_iterations(password, DEFAULT_ITERATIONS)
    }

    /// Derive with an explicit iteration count (tests use a low count).
    pub fn derive_with_iterations(password: &str, iterations: u32) -> Self {
        let mut salt = vec![0u8; SALT_LEN];
        rand::thread_rng().fill(salt.as_mut_slice());
        let digest = chain_digest(&salt, password, iterations);
        Self {
            iterations,
            salt,
            digest,
        }
    }

    /// Verify a plaintext password against this hash.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = chain_digest(&self.salt, password, self.iterations);
        constant_time_eq(&candidate, &self.digest)
    }

    /// Encode to the stored string form.
    pub fn encode(&self) -> String {
        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            B64.encode(&self.salt),
            B64.encode(&self.digest)
        )
    }

    /// Parse the stored string form.
    pub fn parse(encoded: &str) -> Result<Self, PasswordHashError> {
        let mut parts = encoded.split('$');
        let scheme = parts.next().ok_or(PasswordHashError::MalformedEncoding)?;
        if scheme != SCHEME {
            return Err(PasswordHashError::UnsupportedScheme(scheme.to_string()));
        }

        let iterations = parts
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or(PasswordHashError::MalformedEncoding)?;
        let salt = parts
            .next()
            .and_then(|s| B64.decode(s).ok())
            .ok_or(PasswordHashError::MalformedEncoding)?;
        let digest = parts
            .next()
            .and_then(|s| B64.decode(s).ok())
            .ok_or(PasswordHashError::MalformedEncoding)?;

        if parts.next().is_some() || salt.is_empty() || digest.is_empty() {
            return Err(PasswordHashError::MalformedEncoding);
        }

        Ok(Self {
            iterations,
            salt,
            digest,
        })
    }
}

fn chain_digest(salt: &[u8], password: &str, iterations: u32) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut digest = hasher.finalize();

    for _ in 1..iterations {
        digest = Sha256::digest(&digest);
    }

    digest.to_vec()
}

/// Compare without short-circuiting on the first mismatched byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
