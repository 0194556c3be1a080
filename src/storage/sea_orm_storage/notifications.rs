//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{AcademyError, Result};
use crate::models::notifications::entities::{NewNotification, Notification};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(&self, req: NewNotification) -> Result<Notification> {
        let model = ActiveModel {
            user_id: Set(req.user_id),
            notification_type: Set(req.notification_type.as_str().to_string()),
            title: Set(req.title),
            payload: Set(serde_json::to_string(&req.payload)?),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建通知失败: {e}")))?
            .into_notification()
            .ok_or_else(|| AcademyError::database_operation("通知类型无法识别"))
    }

    /// 列出用户的通知（新的在前）
    pub async fn list_notifications_impl(
        &self,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let notifications = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(notifications
            .into_iter()
            .filter_map(|m| {
                let (id, kind) = (m.id, m.notification_type.clone());
                let notification = m.into_notification();
                if notification.is_none() {
                    warn!(notification_id = id, kind = %kind, "跳过无法识别类型的通知");
                }
                notification
            })
            .collect())
    }

    /// 标记已读，只能标记自己的通知
    pub async fn mark_notification_read_impl(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
