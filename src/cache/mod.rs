//! 缓存层
//!
//! 对象缓存只保存字符串，序列化由调用方负责。

pub mod membership;
pub mod object_cache;

use async_trait::async_trait;

pub use membership::MembershipCache;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}
