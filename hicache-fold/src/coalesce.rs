//! Per-key mutual exclusion so concurrent misses for one key run the solver once.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use fxhash::FxHashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Inflight = Arc<StdMutex<FxHashMap<String, Arc<Mutex<()>>>>>;

/// Table of per-key async locks. Entries are dropped once nobody holds or
/// waits on them.
#[derive(Default)]
pub struct KeyedLocks {
    inflight: Inflight,
}

/// Held while a key is being computed; releases the key on drop.
pub struct KeyGuard {
    key: String,
    guard: OwnedMutexGuard<()>,
    inflight: Inflight,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `key`, then hold it.
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let lock = {
            let mut inflight = self
                .inflight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                inflight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        KeyGuard {
            key: key.to_string(),
            guard: lock.lock_owned().await,
            inflight: Arc::clone(&self.inflight),
        }
    }

    /// Keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut inflight = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // the table and this guard are the only owners: nobody is waiting
        if Arc::strong_count(OwnedMutexGuard::mutex(&self.guard)) == 2 {
            inflight.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_key_is_serialized() {
        let locks = Arc::new(KeyedLocks::new());
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("GM12878:chr12:1000-5000:1").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.acquire("a").await;
        let _b = locks.acquire("b").await;
        assert_eq!(locks.len(), 2);
    }
}
