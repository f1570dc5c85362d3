//! `ecocrop-store` — persistence boundary for accounts and analyses.
//!
//! Storage is behind object-safe async traits; the in-memory implementations
//! back dev and tests, the Postgres implementations back deployments. The
//! API layer picks one at startup and only ever sees `Arc<dyn ...Store>`.

pub mod analysis_store;
pub mod error;
pub mod postgres;
pub mod records;
pub mod user_store;

pub use analysis_store::{AnalysisStore, HISTORY_LIMIT, InMemoryAnalysisStore};
pub use error::StoreError;
pub use postgres::{PostgresAnalysisStore, PostgresUserStore, init_schema};
pub use records::{AnalysisRecord, UserRecord};
pub use user_store::{InMemoryUserStore, UserStore};
