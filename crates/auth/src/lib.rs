//! `ecocrop-auth` — authentication boundary (passwords + tokens).
//!
//! This crate is intentionally decoupled from HTTP and storage: it derives
//! and verifies password hashes, and issues/validates JWTs. Who is allowed
//! to call what is decided at the API boundary.

pub mod claims;
pub mod password;
pub mod token;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use password::{PasswordHash, PasswordHashError, validate_password_policy};
pub use token::{Hs256TokenCodec, TokenError, TokenValidator};
