//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub notification_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> Option<crate::models::notifications::entities::Notification> {
        use crate::models::notifications::entities::{Notification, NotificationType};

        let notification_type = self.notification_type.parse::<NotificationType>().ok()?;
        Some(Notification {
            id: self.id,
            user_id: self.user_id,
            notification_type,
            title: self.title,
            payload: serde_json::from_str(&self.payload).unwrap_or(serde_json::Value::Null),
            is_read: self.is_read,
            created_at: super::to_datetime(self.created_at),
        })
    }
}
