//! Login session persistence.
//!
//! The session is two string entries in a key-value store scoped to one
//! browser. The store itself is injected, so the controller can run against
//! the cookie-backed session record in the frontend or a plain map in tests.

use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const LOGGED_IN_KEY: &str = "tribo_logged_in";
pub const USER_EMAIL_KEY: &str = "tribo_user_email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
}

/// String key-value storage backing the session.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, one map per instance.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub async fn save(&self, email: &str) -> Result<Session, StorageError> {
        self.storage.set(LOGGED_IN_KEY, "true").await?;
        self.storage.set(USER_EMAIL_KEY, email).await?;
        Ok(Session {
            email: email.to_string(),
        })
    }

    /// A session exists only when the flag is set and an e-mail is stored.
    pub async fn load(&self) -> Result<Option<Session>, StorageError> {
        let logged_in = self.storage.get(LOGGED_IN_KEY).await?;
        if logged_in.as_deref() != Some("true") {
            return Ok(None);
        }

        let email = self.storage.get(USER_EMAIL_KEY).await?;
        Ok(email
            .filter(|email| !email.is_empty())
            .map(|email| Session { email }))
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(LOGGED_IN_KEY).await?;
        self.storage.remove(USER_EMAIL_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (Arc<MemoryStorage>, SessionStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), SessionStore::new(storage))
    }

    #[test]
    fn test_save_then_load() {
        let (_, store) = store();
        tokio_test::block_on(async {
            store.save("user@example.com").await.unwrap();
            let session = store.load().await.unwrap();
            assert_eq!(
                session,
                Some(Session {
                    email: "user@example.com".to_string()
                })
            );
        });
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let (storage, store) = store();
        tokio_test::block_on(async {
            store.save("user@example.com").await.unwrap();
            store.clear().await.unwrap();

            assert_eq!(store.load().await.unwrap(), None);
            assert_eq!(storage.get(LOGGED_IN_KEY).await.unwrap(), None);
            assert_eq!(storage.get(USER_EMAIL_KEY).await.unwrap(), None);
        });
    }

    #[test]
    fn test_flag_without_email_is_not_a_session() {
        let (storage, store) = store();
        tokio_test::block_on(async {
            storage.set(LOGGED_IN_KEY, "true").await.unwrap();
            assert_eq!(store.load().await.unwrap(), None);

            storage.set(LOGGED_IN_KEY, "false").await.unwrap();
            storage.set(USER_EMAIL_KEY, "user@example.com").await.unwrap();
            assert_eq!(store.load().await.unwrap(), None);
        });
    }
}
