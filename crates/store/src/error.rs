use thiserror::Error;

/// Storage-layer error.
///
/// Absent rows are `Ok(None)` on lookups, not an error: callers decide what
/// a miss means.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}
