//! 服务层共享的运行上下文
//!
//! 路由层从 app data 组装上下文，业务函数只依赖上下文，测试时直接用内存存储构造。

use std::sync::Arc;

use actix_web::{HttpRequest, web};
use once_cell::sync::Lazy;
use serde_json::Value;

use super::notify::{Notifier, StorageNotifier, notify_quietly};
use crate::cache::{MembershipCache, ObjectCache};
use crate::config::{AppConfig, WorkflowConfig};
use crate::errors::{AcademyError, Result};
use crate::models::forms::entities::Form;
use crate::models::groups::entities::GroupMember;
use crate::models::notifications::entities::NotificationType;
use crate::models::reports::entities::Report;
use crate::permissions::{Action, PermissionContext, has_permission, permission_error_message};
use crate::storage::Storage;
use crate::utils::KeyedLocks;
use crate::workflow::Actor;

// 进程内的表单锁与报告锁
static FORM_LOCKS: Lazy<Arc<KeyedLocks>> = Lazy::new(|| Arc::new(KeyedLocks::new()));
static REPORT_LOCKS: Lazy<Arc<KeyedLocks>> = Lazy::new(|| Arc::new(KeyedLocks::new()));

pub const NOT_A_MEMBER: &str = "You are not a member of this group";

#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<dyn Storage>,
    pub membership: MembershipCache,
    pub notifier: Arc<dyn Notifier>,
    pub form_locks: Arc<KeyedLocks>,
    pub report_locks: Arc<KeyedLocks>,
    pub workflow: WorkflowConfig,
}

impl AppContext {
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: Arc<dyn ObjectCache>,
        cache_ttl: u64,
        workflow: WorkflowConfig,
    ) -> Self {
        Self {
            notifier: Arc::new(StorageNotifier::new(storage.clone())),
            storage,
            membership: MembershipCache::new(cache, cache_ttl),
            form_locks: Arc::new(KeyedLocks::new()),
            report_locks: Arc::new(KeyedLocks::new()),
            workflow,
        }
    }

    /// 从请求的 app data 组装上下文
    pub fn from_request(request: &HttpRequest) -> Result<Self> {
        let storage = request
            .app_data::<web::Data<Arc<dyn Storage>>>()
            .ok_or_else(|| AcademyError::storage_plugin_not_found("Storage not found in app data"))?
            .get_ref()
            .clone();
        let cache = request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .ok_or_else(|| AcademyError::cache_connection("Cache not found in app data"))?
            .get_ref()
            .clone();

        let config = AppConfig::get();
        Ok(Self {
            form_locks: FORM_LOCKS.clone(),
            report_locks: REPORT_LOCKS.clone(),
            ..Self::new(
                storage,
                cache,
                config.cache.default_ttl,
                config.workflow.clone(),
            )
        })
    }

    /// 当前用户在群组中的成员记录，不是成员时拒绝
    pub async fn member(&self, group_id: i64, user_id: i64) -> Result<GroupMember> {
        self.membership
            .get_member(self.storage.as_ref(), group_id, user_id)
            .await?
            .ok_or_else(|| AcademyError::permission_denied(NOT_A_MEMBER))
    }

    pub async fn actor(&self, group_id: i64, user_id: i64) -> Result<Actor> {
        let member = self.member(group_id, user_id).await?;
        Ok(Actor::new(user_id, member.role))
    }

    pub async fn load_form(&self, form_id: i64) -> Result<Form> {
        self.storage
            .get_form_by_id(form_id)
            .await?
            .ok_or_else(|| AcademyError::not_found("Form not found"))
    }

    pub async fn load_report(&self, report_id: i64) -> Result<Report> {
        self.storage
            .get_report_by_id(report_id)
            .await?
            .ok_or_else(|| AcademyError::not_found("Report not found"))
    }

    /// 流转提交后发送通知
    pub async fn notify(
        &self,
        target_user_id: i64,
        notification_type: NotificationType,
        payload: Value,
    ) {
        if !self.workflow.notifications_enabled {
            return;
        }
        notify_quietly(
            self.notifier.as_ref(),
            target_user_id,
            notification_type,
            payload,
        )
        .await;
    }
}

/// 权限检查，无权限时转换为 `PermissionDenied`
pub fn ensure_permission(
    actor: Actor,
    action: Action,
    context: Option<&PermissionContext>,
) -> Result<()> {
    if has_permission(actor.role, action, context) {
        Ok(())
    } else {
        Err(AcademyError::permission_denied(permission_error_message(
            action,
        )))
    }
}
