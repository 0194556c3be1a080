use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(default_ttl))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, default_ttl
        );
        Self { inner }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.memory.max_capacity, config.default_ttl)
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // 过期时间由构建时的全局 TTL 决定
        self.inner.insert(key, value).await;
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL, using global TTL configuration");
        }
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
