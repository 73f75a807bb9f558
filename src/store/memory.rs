//! Process-local user store, used for tests and `--memory` runs.

use super::{NewUser, StoreError, User, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Users keyed by lowercased email. Check-and-insert happens under one write
/// lock, which is the in-memory equivalent of a unique index.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&email.to_lowercase()).cloned())
    }

    #[instrument(skip(self))]
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let key = user.email.to_lowercase();
        let mut users = self.users.write().await;

        if users.contains_key(&key) {
            return Err(StoreError::duplicate(user.email));
        }

        let stored = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password,
            role: user.role,
        };
        users.insert(key, stored.clone());

        debug!(user_id = %stored.id, "user stored in memory");

        Ok(stored)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::Role;
    use std::sync::Arc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password: "$2b$04$verifier".to_string(),
            role: Role::Member,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_keeps_fields() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ann@x.com")).await.unwrap();

        assert_ne!(user.id, Uuid::nil());
        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@x.com");
        assert_eq!(user.role, Role::Member);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_by_email_returns_none_when_absent() {
        let store = MemoryUserStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.find_by_email("nobody@x.com").await, Ok(None));
    }

    #[tokio::test]
    async fn find_by_email_ignores_case() {
        let store = MemoryUserStore::new();
        let created = store.create(new_user("ann@x.com")).await.unwrap();

        let found = store.find_by_email("ANN@X.com").await.unwrap();
        assert_eq!(found.map(|user| user.id), Some(created.id));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.create(new_user("ann@x.com")).await.unwrap();

        let err = store.create(new_user("Ann@X.com")).await.unwrap_err();
        assert_eq!(err, StoreError::duplicate("Ann@X.com"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_creates_only_one_wins() {
        let store = Arc::new(MemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(new_user("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }
}
