//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 多行写入的工作流操作各自在一个事务中完成。

mod concept_templates;
mod forms;
mod groups;
mod notifications;
mod questions;
mod reports;
mod responses;
mod supervisions;


use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{AcademyError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 按给定数据库配置连接并运行迁移
    pub(crate) async fn connect(database: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, database).await?
        } else {
            Self::connect_generic(&db_url, database).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademyError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, database: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AcademyError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, database: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(database.timeout))
            .acquire_timeout(Duration::from_secs(database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AcademyError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, memory://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 开启事务
    pub(crate) async fn begin(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))
    }
}

/// 提交事务
pub(crate) async fn commit(txn: DatabaseTransaction) -> Result<()> {
    txn.commit()
        .await
        .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))
}

// Storage trait 实现
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
use crate::storage::Storage;
use crate::workflow::question_set::TemplatePlan;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 群组模块
    async fn create_group(
        &self,
        name: String,
        owner_id: i64,
        owner_display_name: String,
    ) -> Result<(Group, GroupMember)> {
        self.create_group_impl(name, owner_id, owner_display_name)
            .await
    }

    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>> {
        self.get_group_by_id_impl(group_id).await
    }

    async fn list_user_groups(&self, user_id: i64) -> Result<Vec<Group>> {
        self.list_user_groups_impl(user_id).await
    }

    async fn create_class(&self, group_id: i64, name: String) -> Result<Class> {
        self.create_class_impl(group_id, name).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes(&self, group_id: i64) -> Result<Vec<Class>> {
        self.list_classes_impl(group_id).await
    }

    async fn upsert_member(
        &self,
        group_id: i64,
        member: UpsertMemberRequest,
    ) -> Result<GroupMember> {
        self.upsert_member_impl(group_id, member).await
    }

    async fn get_member(&self, group_id: i64, user_id: i64) -> Result<Option<GroupMember>> {
        self.get_member_impl(group_id, user_id).await
    }

    async fn list_members(
        &self,
        group_id: i64,
        query: MemberListQuery,
    ) -> Result<Vec<GroupMember>> {
        self.list_members_impl(group_id, query).await
    }

    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool> {
        self.remove_member_impl(group_id, user_id).await
    }

    // 督导模块
    async fn upsert_supervision(
        &self,
        group_id: i64,
        time_teacher_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Result<SupervisionMapping> {
        self.upsert_supervision_impl(group_id, time_teacher_id, teacher_id)
            .await
    }

    async fn get_supervision_by_id(&self, id: i64) -> Result<Option<SupervisionMapping>> {
        self.get_supervision_by_id_impl(id).await
    }

    // 表单模块
    async fn create_form_bundle(&self, bundle: NewFormBundle) -> Result<FormBundle> {
        self.create_form_bundle_impl(bundle).await
    }

    async fn get_form_by_id(&self, form_id: i64) -> Result<Option<Form>> {
        self.get_form_by_id_impl(form_id).await
    }

    async fn list_forms_with_pagination(&self, query: FormListQuery) -> Result<FormListResponse> {
        self.list_forms_with_pagination_impl(query).await
    }

    async fn list_group_forms(&self, group_id: i64) -> Result<Vec<Form>> {
        self.list_group_forms_impl(group_id).await
    }

    async fn update_form_details(
        &self,
        form_id: i64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<Form>> {
        self.update_form_details_impl(form_id, title, description)
            .await
    }

    async fn delete_form(&self, form_id: i64) -> Result<bool> {
        self.delete_form_impl(form_id).await
    }

    async fn replace_questions(
        &self,
        form_id: i64,
        questions: Vec<Question>,
        templates: Vec<TemplatePlan>,
        status: FormStatus,
    ) -> Result<Vec<Question>> {
        self.replace_questions_impl(form_id, questions, templates, status)
            .await
    }

    async fn list_questions(&self, form_id: i64) -> Result<Vec<Question>> {
        self.list_questions_impl(form_id).await
    }

    async fn send_form(&self, form_id: i64, targets: Vec<FormTarget>) -> Result<Form> {
        self.send_form_impl(form_id, targets).await
    }

    async fn list_form_targets(&self, form_id: i64) -> Result<Vec<FormTarget>> {
        self.list_form_targets_impl(form_id).await
    }

    // 概念模板模块
    async fn create_concept_template(
        &self,
        template: NewConceptTemplate,
    ) -> Result<ConceptTemplate> {
        self.create_concept_template_impl(template).await
    }

    async fn get_concept_template(&self, template_id: i64) -> Result<Option<ConceptTemplate>> {
        self.get_concept_template_impl(template_id).await
    }

    async fn list_concept_templates(&self, group_id: i64) -> Result<Vec<ConceptTemplate>> {
        self.list_concept_templates_impl(group_id).await
    }

    // 作答模块
    async fn get_response(
        &self,
        form_id: i64,
        responder_id: i64,
    ) -> Result<Option<FormResponse>> {
        self.get_response_impl(form_id, responder_id).await
    }

    async fn submit_response(
        &self,
        response: NewFormResponse,
        report: ReportWrite,
    ) -> Result<(FormResponse, Report)> {
        self.submit_response_impl(response, report).await
    }

    // 报告模块
    async fn get_report_by_id(&self, report_id: i64) -> Result<Option<Report>> {
        self.get_report_by_id_impl(report_id).await
    }

    async fn find_unclaimed_report(&self, form_id: i64) -> Result<Option<Report>> {
        self.find_unclaimed_report_impl(form_id).await
    }

    async fn find_report_by_responder(
        &self,
        form_id: i64,
        responder_id: i64,
    ) -> Result<Option<Report>> {
        self.find_report_by_responder_impl(form_id, responder_id)
            .await
    }

    async fn list_reports(&self, query: ReportListQuery) -> Result<Vec<Report>> {
        self.list_reports_impl(query).await
    }

    async fn save_report(&self, report: Report, expected: ReportStage) -> Result<Report> {
        self.save_report_impl(report, expected).await
    }

    // 通知模块
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications(
        &self,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        self.list_notifications_impl(user_id, unread_only).await
    }

    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(user_id, notification_id)
            .await
    }
}
