use std::sync::Arc;

use crate::models::{
    concept_templates::entities::{ConceptTemplate, NewConceptTemplate},
    forms::{
        entities::{Form, FormStatus, FormTarget, NewFormBundle},
        requests::FormListQuery,
        responses::{FormBundle, FormListResponse},
    },
    groups::{
        entities::{Class, Group, GroupMember},
        requests::{MemberListQuery, UpsertMemberRequest},
    },
    notifications::entities::{NewNotification, Notification},
    questions::entities::Question,
    reports::{
        entities::{Report, ReportStage, ReportWrite},
        requests::ReportListQuery,
    },
    responses::entities::{FormResponse, NewFormResponse},
    supervisions::entities::SupervisionMapping,
};
use crate::workflow::question_set::TemplatePlan;

use crate::config::AppConfig;
use crate::errors::Result;

pub mod memory_storage;
pub mod sea_orm_storage;

/// 内存存储的 URL 前缀
pub const MEMORY_URL_PREFIX: &str = "memory://";

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 群组管理方法
    // 创建群组，创建者同时成为管理员成员
    async fn create_group(
        &self,
        name: String,
        owner_id: i64,
        owner_display_name: String,
    ) -> Result<(Group, GroupMember)>;
    // 通过ID获取群组
    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>>;
    // 列出用户所在的群组
    async fn list_user_groups(&self, user_id: i64) -> Result<Vec<Group>>;

    /// 班级管理方法
    async fn create_class(&self, group_id: i64, name: String) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes(&self, group_id: i64) -> Result<Vec<Class>>;

    /// 成员管理方法
    // 添加或更新成员（按 group_id + user_id）
    async fn upsert_member(&self, group_id: i64, member: UpsertMemberRequest)
    -> Result<GroupMember>;
    async fn get_member(&self, group_id: i64, user_id: i64) -> Result<Option<GroupMember>>;
    async fn list_members(&self, group_id: i64, query: MemberListQuery)
    -> Result<Vec<GroupMember>>;
    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool>;

    /// 督导关系
    // 按自然键原子 upsert，直接返回行
    async fn upsert_supervision(
        &self,
        group_id: i64,
        time_teacher_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Result<SupervisionMapping>;
    async fn get_supervision_by_id(&self, id: i64) -> Result<Option<SupervisionMapping>>;

    /// 表单管理方法
    // 单事务创建表单、督导关系、骨架报告与初始题目
    async fn create_form_bundle(&self, bundle: NewFormBundle) -> Result<FormBundle>;
    async fn get_form_by_id(&self, form_id: i64) -> Result<Option<Form>>;
    async fn list_forms_with_pagination(&self, query: FormListQuery) -> Result<FormListResponse>;
    // 群组内全部表单（按创建时间）
    async fn list_group_forms(&self, group_id: i64) -> Result<Vec<Form>>;
    // 更新标题与描述，已发送的表单返回 InvalidState
    async fn update_form_details(
        &self,
        form_id: i64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<Form>>;
    // 删除表单及其题目、接收对象、作答与报告
    async fn delete_form(&self, form_id: i64) -> Result<bool>;
    // 单事务替换题目集：先建模板，再写题目，最后更新状态；表单已发送时整体失败
    async fn replace_questions(
        &self,
        form_id: i64,
        questions: Vec<Question>,
        templates: Vec<TemplatePlan>,
        status: FormStatus,
    ) -> Result<Vec<Question>>;
    async fn list_questions(&self, form_id: i64) -> Result<Vec<Question>>;
    // 单事务发送：状态比较并设置为 send，同时写入接收对象
    async fn send_form(&self, form_id: i64, targets: Vec<FormTarget>) -> Result<Form>;
    async fn list_form_targets(&self, form_id: i64) -> Result<Vec<FormTarget>>;

    /// 概念模板
    async fn create_concept_template(&self, template: NewConceptTemplate)
    -> Result<ConceptTemplate>;
    async fn get_concept_template(&self, template_id: i64) -> Result<Option<ConceptTemplate>>;
    async fn list_concept_templates(&self, group_id: i64) -> Result<Vec<ConceptTemplate>>;

    /// 作答
    async fn get_response(&self, form_id: i64, responder_id: i64)
    -> Result<Option<FormResponse>>;
    // 单事务写入作答并认领/新建报告
    async fn submit_response(
        &self,
        response: NewFormResponse,
        report: ReportWrite,
    ) -> Result<(FormResponse, Report)>;

    /// 报告
    async fn get_report_by_id(&self, report_id: i64) -> Result<Option<Report>>;
    // 同一表单下尚未被认领的骨架报告
    async fn find_unclaimed_report(&self, form_id: i64) -> Result<Option<Report>>;
    async fn find_report_by_responder(
        &self,
        form_id: i64,
        responder_id: i64,
    ) -> Result<Option<Report>>;
    async fn list_reports(&self, query: ReportListQuery) -> Result<Vec<Report>>;
    // 整体写回报告，要求当前阶段仍为 expected，否则 Conflict
    async fn save_report(&self, report: Report, expected: ReportStage) -> Result<Report>;

    /// 通知
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_notifications(&self, user_id: i64, unread_only: bool)
    -> Result<Vec<Notification>>;
    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let config = AppConfig::get();
    if config.database.url.starts_with(MEMORY_URL_PREFIX) {
        tracing::warn!("Using in-memory storage, data will be lost on restart");
        return Ok(Arc::new(memory_storage::MemoryStorage::new()));
    }
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
