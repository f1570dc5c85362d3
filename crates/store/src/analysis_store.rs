use std::sync::RwLock;

use async_trait::async_trait;

use ecocrop_core::{AnalysisId, UserId};

use crate::error::StoreError;
use crate::records::AnalysisRecord;

/// History responses are capped at this many records, newest first.
pub const HISTORY_LIMIT: usize = 100;

/// Analysis persistence. All reads are scoped to the owning user.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), StoreError>;

    /// Newest-first history for a user, capped at [`HISTORY_LIMIT`].
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<AnalysisRecord>, StoreError>;

    /// Fetch one analysis. A record owned by another user is `None`, not an
    /// authorization error, so ids don't leak existence.
    async fn get(
        &self,
        user_id: UserId,
        id: AnalysisId,
    ) -> Result<Option<AnalysisRecord>, StoreError>;
}

/// In-memory analysis store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisStore {
    inner: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("analysis store lock poisoned");
        if inner.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Conflict(format!(
                "duplicate analysis id: {}",
                record.id
            )));
        }
        inner.push(record);
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<AnalysisRecord>, StoreError> {
        let inner = self.inner.read().expect("analysis store lock poisoned");
        let mut items: Vec<AnalysisRecord> = inner
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        // Newest first; ids are time-ordered (UUIDv7) so they break created_at ties.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        items.truncate(HISTORY_LIMIT);
        Ok(items)
    }

    async fn get(
        &self,
        user_id: UserId,
        id: AnalysisId,
    ) -> Result<Option<AnalysisRecord>, StoreError> {
        let inner = self.inner.read().expect("analysis store lock poisoned");
        Ok(inner
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }
}
