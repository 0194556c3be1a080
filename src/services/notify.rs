//! 通知发送
//!
//! 通知在状态流转提交之后发送，失败只记日志，不影响流转结果。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::models::notifications::entities::{NewNotification, NotificationType};
use crate::storage::Storage;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        target_user_id: i64,
        notification_type: NotificationType,
        payload: Value,
    ) -> Result<()>;
}

/// 写入通知表
pub struct StorageNotifier {
    storage: Arc<dyn Storage>,
}

impl StorageNotifier {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Notifier for StorageNotifier {
    async fn notify(
        &self,
        target_user_id: i64,
        notification_type: NotificationType,
        payload: Value,
    ) -> Result<()> {
        self.storage
            .create_notification(NewNotification {
                user_id: target_user_id,
                notification_type,
                title: notification_type.title().to_string(),
                payload,
            })
            .await?;
        Ok(())
    }
}

/// 发送通知并吞掉错误
pub async fn notify_quietly(
    notifier: &dyn Notifier,
    target_user_id: i64,
    notification_type: NotificationType,
    payload: Value,
) {
    match notifier
        .notify(target_user_id, notification_type, payload)
        .await
    {
        Ok(()) => debug!(
            "已通知用户 {}: {}",
            target_user_id,
            notification_type.as_str()
        ),
        Err(e) => warn!(
            "通知用户 {} 失败 ({}): {}",
            target_user_id,
            notification_type.as_str(),
            e
        ),
    }
}
