use async_trait::async_trait;
use tower_sessions::Session;
use workout_core::{SessionStorage, StorageError};

/// Session storage backed by the browser's cookie-scoped session record.
#[derive(Clone)]
pub struct CookieSessionStorage {
    session: Session,
}

impl CookieSessionStorage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

fn storage_error(err: tower_sessions::session::Error) -> StorageError {
    StorageError(err.to_string())
}

#[async_trait]
impl SessionStorage for CookieSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.session.get::<String>(key).await.map_err(storage_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.session.insert(key, value).await.map_err(storage_error)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.session
            .remove_value(key)
            .await
            .map(|_| ())
            .map_err(storage_error)
    }
}
