//! 群组成员缓存
//!
//! 只缓存存在的成员记录，成员变更后由服务层主动失效。

use std::sync::Arc;

use tracing::{debug, warn};

use super::{CacheResult, ObjectCache};
use crate::errors::Result;
use crate::models::groups::entities::{GroupMember, Role};
use crate::storage::Storage;

#[derive(Clone)]
pub struct MembershipCache {
    cache: Arc<dyn ObjectCache>,
    ttl: u64,
}

impl MembershipCache {
    pub fn new(cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        Self { cache, ttl }
    }

    fn key(group_id: i64, user_id: i64) -> String {
        format!("member:{group_id}:{user_id}")
    }

    /// 查询成员记录，未命中时回源到存储
    pub async fn get_member(
        &self,
        storage: &dyn Storage,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<GroupMember>> {
        let key = Self::key(group_id, user_id);
        if let CacheResult::Found(json) = self.cache.get_raw(&key).await {
            match serde_json::from_str::<GroupMember>(&json) {
                Ok(member) => return Ok(Some(member)),
                Err(e) => {
                    warn!("成员缓存反序列化失败，已移除 {}: {}", key, e);
                    self.cache.remove(&key).await;
                }
            }
        }

        let member = storage.get_member(group_id, user_id).await?;
        if let Some(member) = &member
            && let Ok(json) = serde_json::to_string(member)
        {
            self.cache.insert_raw(key, json, self.ttl).await;
        } else {
            debug!("用户 {} 不是群组 {} 的成员", user_id, group_id);
        }
        Ok(member)
    }

    pub async fn is_member(
        &self,
        storage: &dyn Storage,
        group_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        Ok(self.get_member(storage, group_id, user_id).await?.is_some())
    }

    pub async fn get_role(
        &self,
        storage: &dyn Storage,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<Role>> {
        Ok(self
            .get_member(storage, group_id, user_id)
            .await?
            .map(|m| m.role))
    }

    pub async fn invalidate(&self, group_id: i64, user_id: i64) {
        self.cache.remove(&Self::key(group_id, user_id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::MokaCacheWrapper;
    use crate::models::groups::requests::UpsertMemberRequest;
    use crate::storage::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn test_role_is_cached_until_invalidated() {
        let storage = MemoryStorage::new();
        let cache = MembershipCache::new(Arc::new(MokaCacheWrapper::new(100, 60)), 60);
        let (group, _) = storage
            .create_group("North".into(), 1, "Owner".into())
            .await
            .unwrap();

        assert_eq!(
            cache.get_role(&storage, group.id, 1).await.unwrap(),
            Some(Role::Admin)
        );
        assert!(!cache.is_member(&storage, group.id, 2).await.unwrap());

        storage
            .upsert_member(
                group.id,
                UpsertMemberRequest {
                    user_id: 1,
                    display_name: "Owner".into(),
                    role: Role::Teacher,
                    class_id: None,
                },
            )
            .await
            .unwrap();
        // 失效前仍读到旧角色
        assert_eq!(
            cache.get_role(&storage, group.id, 1).await.unwrap(),
            Some(Role::Admin)
        );

        cache.invalidate(group.id, 1).await;
        assert_eq!(
            cache.get_role(&storage, group.id, 1).await.unwrap(),
            Some(Role::Teacher)
        );
    }
}
