use crate::domain_port::*;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

struct Entry {
    ttl: Duration,
    expires_at: Instant,
}

/// Process-local revocation list. Entries lapse on their own, like redis keys.
#[derive(Default)]
pub struct MemoryRevocationStore {
    entries: DashMap<String, Entry>,
    unavailable: AtomicBool,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// TTL given by the last write to `key`, expired or not.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.get(key).map(|e| e.ttl)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .is_some_and(|e| e.expires_at > now))
    }

    async fn set_with_ttl(&self, key: &str, _value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.check_available()?;
        let now = Instant::now();
        // Sweep lapsed entries so the map stays bounded by live sessions.
        self.entries.retain(|_, e| e.expires_at > now);
        self.entries.insert(
            key.to_string(),
            Entry {
                ttl,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
