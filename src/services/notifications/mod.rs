//! 当前用户的通知收件箱

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;

use super::context::AppContext;
use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::notifications::entities::Notification;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn list_notifications(
    ctx: &AppContext,
    user: &CurrentUser,
    query: NotificationListQuery,
) -> Result<Vec<Notification>> {
    ctx.storage
        .list_notifications(user.id, query.unread_only)
        .await
}

/// 只能标记自己的通知
pub async fn mark_read(ctx: &AppContext, user: &CurrentUser, notification_id: i64) -> Result<()> {
    if ctx
        .storage
        .mark_notification_read(user.id, notification_id)
        .await?
    {
        Ok(())
    } else {
        Err(AcademyError::not_found("Notification not found"))
    }
}

pub struct NotificationService;

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        query: NotificationListQuery,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let notifications = list_notifications(&ctx, user, query).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(notifications, "查询成功")))
    }

    pub async fn mark_read(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        notification_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        mark_read(&ctx, user, notification_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已标记为已读")))
    }
}
