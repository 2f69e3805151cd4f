use crate::domain_port::*;
use crate::logger::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

pub struct RedisRevocationStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisRevocationStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisRevocationStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

#[async_trait::async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let found: bool = conn
            .exists(&key)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(found)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        // PX 0 is an error in redis, and a zero TTL means the entry is already gone.
        let millis = ttl.as_millis().min(u64::MAX as u128) as u64;
        if millis == 0 {
            trace!(key, "zero ttl, nothing to write");
            return Ok(());
        }

        let key = self.key(key);
        let mut conn = self.conn.clone();
        let _: () = conn
            .pset_ex(&key, value, millis)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
