use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use ecocrop_core::{Email, UserId};

use crate::error::StoreError;
use crate::records::UserRecord;

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::Conflict`] when the
    /// email is already registered.
    async fn insert(&self, user: UserRecord) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;
}

/// In-memory user store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: UserRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("user store lock poisoned");

        if inner.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }
        if inner.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("duplicate user id: {}", user.id)));
        }

        inner.insert(user.id, user);
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().expect("user store lock poisoned");
        Ok(inner.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().expect("user store lock poisoned");
        Ok(inner.get(&id).cloned())
    }
}
