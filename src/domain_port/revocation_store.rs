use std::time::Duration;

/// Key/value store with per-key expiry, holding revoked session ids.
///
/// A `ttl` of zero means the entry expires immediately; implementations must
/// never treat it as "no expiry".
#[async_trait::async_trait]
pub trait RevocationStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
