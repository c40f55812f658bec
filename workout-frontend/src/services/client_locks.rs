use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per browser session, so requests from the same browser
/// run one at a time.
#[derive(Clone, Default)]
pub struct ClientLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl ClientLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key.to_string()).or_default().clone();
        lock.lock_owned().await
    }

    /// Unlock and forget the entry unless another request of the same
    /// browser is already waiting on it.
    pub fn release(&self, key: &str, guard: OwnedMutexGuard<()>) {
        drop(guard);
        self.locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let locks = ClientLocks::new();
        let guard = locks.acquire("browser-a").await;

        let waiting = tokio::spawn({
            let locks = locks.clone();
            async move {
                let _guard = locks.acquire("browser-a").await;
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        waiting.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_keys_do_not_wait() {
        let locks = ClientLocks::new();
        let _a = locks.acquire("browser-a").await;

        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("browser-b")).await;

        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_release_drops_idle_entry() {
        let locks = ClientLocks::new();
        let guard = locks.acquire("browser-a").await;

        locks.release("browser-a", guard);

        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_release_keeps_entry_with_waiter() {
        let locks = ClientLocks::new();
        let guard = locks.acquire("browser-a").await;

        let waiting = tokio::spawn({
            let locks = locks.clone();
            async move {
                let guard = locks.acquire("browser-a").await;
                locks.release("browser-a", guard);
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        locks.release("browser-a", guard);
        assert_eq!(locks.len(), 1);

        waiting.await.unwrap();
        assert!(locks.is_empty());
    }
}
