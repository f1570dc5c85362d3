//! Tracing/logging initialization for EcoCrop binaries.

pub mod tracing;

pub use tracing::init;
