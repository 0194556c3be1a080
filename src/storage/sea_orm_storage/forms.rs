//! 表单存储操作

use super::questions::write_question_set;
use super::reports::insert_report;
use super::supervisions::upsert_supervision_on;
use super::{SeaOrmStorage, commit};
use crate::entity::form_responses::{Column as ResponseColumn, Entity as FormResponses};
use crate::entity::form_targets::{
    ActiveModel as TargetActiveModel, Column as TargetColumn, Entity as FormTargets,
};
use crate::entity::forms::{ActiveModel, Column, Entity as Forms};
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::entity::reports::{Column as ReportColumn, Entity as Reports};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginationInfo,
    forms::{
        entities::{Form, FormStatus, FormTarget, NewFormBundle},
        requests::FormListQuery,
        responses::{FormBundle, FormListResponse},
    },
    reports::entities::NewReport,
};
use crate::workflow::FORM_IS_SENT;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::warn;

/// 以比较并设置的方式占用一个未发送的表单
///
/// 只有状态不是 send 的行会被更新；`status` 为空时只刷新更新时间。
pub(super) async fn claim_editable_form<C: ConnectionTrait>(
    conn: &C,
    form_id: i64,
    status: Option<FormStatus>,
) -> Result<()> {
    let mut update = Forms::update_many()
        .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()));
    if let Some(status) = status {
        update = update.col_expr(Column::Status, Expr::value(status.to_string()));
    }

    let result = update
        .filter(Column::Id.eq(form_id))
        .filter(Column::Status.ne(FormStatus::Send.to_string()))
        .exec(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("更新表单状态失败: {e}")))?;

    if result.rows_affected > 0 {
        return Ok(());
    }

    let exists = Forms::find_by_id(form_id)
        .one(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("查询表单失败: {e}")))?
        .is_some();
    if exists {
        Err(AcademyError::invalid_state(FORM_IS_SENT))
    } else {
        Err(AcademyError::not_found("Form not found"))
    }
}

async fn find_form<C: ConnectionTrait>(conn: &C, form_id: i64) -> Result<Option<Form>> {
    let result = Forms::find_by_id(form_id)
        .one(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("查询表单失败: {e}")))?;

    Ok(result.map(|m| m.into_form()))
}

impl SeaOrmStorage {
    /// 创建表单及其督导关系、骨架报告与初始题目
    pub async fn create_form_bundle_impl(&self, bundle: NewFormBundle) -> Result<FormBundle> {
        let now = chrono::Utc::now().timestamp();
        let group_id = bundle.form.group_id;
        let txn = self.begin().await?;

        let supervision = if bundle.supervision.is_empty() {
            None
        } else {
            Some(
                upsert_supervision_on(
                    &txn,
                    group_id,
                    bundle.supervision.time_teacher_id,
                    bundle.supervision.teacher_id,
                )
                .await?,
            )
        };
        let supervision_id = supervision.as_ref().map(|s| s.id);

        let form = ActiveModel {
            group_id: Set(group_id),
            creator_id: Set(bundle.form.creator_id),
            title: Set(bundle.form.title),
            description: Set(bundle.form.description),
            status: Set(FormStatus::Draft.to_string()),
            supervision_id: Set(supervision_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建表单失败: {e}")))?
        .into_form();

        let questions =
            write_question_set(&txn, form.id, bundle.questions, bundle.templates).await?;

        let report = insert_report(
            &txn,
            NewReport::skeleton(
                group_id,
                form.id,
                supervision_id,
                bundle.supervision.time_teacher_id,
                bundle.supervision.teacher_id,
            ),
        )
        .await?;

        commit(txn).await?;

        Ok(FormBundle {
            form,
            questions,
            supervision,
            report,
        })
    }

    pub async fn get_form_by_id_impl(&self, form_id: i64) -> Result<Option<Form>> {
        find_form(&self.db, form_id).await
    }

    /// 分页列出群组内的表单
    pub async fn list_forms_with_pagination_impl(
        &self,
        query: FormListQuery,
    ) -> Result<FormListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Forms::find().filter(Column::GroupId.eq(query.group_id));

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 排序
        select = select.order_by_desc(Column::UpdatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询表单总数失败: {e}")))?;

        let forms = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询表单列表失败: {e}")))?;

        Ok(FormListResponse {
            items: forms.into_iter().map(|m| m.into_form()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_group_forms_impl(&self, group_id: i64) -> Result<Vec<Form>> {
        let forms = Forms::find()
            .filter(Column::GroupId.eq(group_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询表单列表失败: {e}")))?;

        Ok(forms.into_iter().map(|m| m.into_form()).collect())
    }

    /// 更新表单标题与描述
    pub async fn update_form_details_impl(
        &self,
        form_id: i64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<Form>> {
        let mut update = Forms::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()));
        if let Some(title) = title {
            update = update.col_expr(Column::Title, Expr::value(title));
        }
        if let Some(description) = description {
            update = update.col_expr(Column::Description, Expr::value(description));
        }

        let result = update
            .filter(Column::Id.eq(form_id))
            .filter(Column::Status.ne(FormStatus::Send.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新表单失败: {e}")))?;

        let form = find_form(&self.db, form_id).await?;
        match form {
            Some(_) if result.rows_affected == 0 => Err(AcademyError::invalid_state(FORM_IS_SENT)),
            other => Ok(other),
        }
    }

    /// 删除表单及其关联数据
    pub async fn delete_form_impl(&self, form_id: i64) -> Result<bool> {
        let txn = self.begin().await?;

        Reports::delete_many()
            .filter(ReportColumn::FormId.eq(form_id))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除报告失败: {e}")))?;
        FormResponses::delete_many()
            .filter(ResponseColumn::FormId.eq(form_id))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除作答失败: {e}")))?;
        FormTargets::delete_many()
            .filter(TargetColumn::FormId.eq(form_id))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除接收对象失败: {e}")))?;
        Questions::delete_many()
            .filter(QuestionColumn::FormId.eq(form_id))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除题目失败: {e}")))?;

        let result = Forms::delete_by_id(form_id)
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除表单失败: {e}")))?;

        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// 发送表单并写入接收对象
    pub async fn send_form_impl(&self, form_id: i64, targets: Vec<FormTarget>) -> Result<Form> {
        let txn = self.begin().await?;
        claim_editable_form(&txn, form_id, Some(FormStatus::Send)).await?;

        FormTargets::delete_many()
            .filter(TargetColumn::FormId.eq(form_id))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("清理接收对象失败: {e}")))?;

        for target in targets {
            TargetActiveModel {
                form_id: Set(form_id),
                target_kind: Set(target.kind().to_string()),
                target_id: Set(target.target_id()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("写入接收对象失败: {e}")))?;
        }

        let form = find_form(&txn, form_id)
            .await?
            .ok_or_else(|| AcademyError::not_found("Form not found"))?;

        commit(txn).await?;
        Ok(form)
    }

    pub async fn list_form_targets_impl(&self, form_id: i64) -> Result<Vec<FormTarget>> {
        let targets = FormTargets::find()
            .filter(TargetColumn::FormId.eq(form_id))
            .order_by_asc(TargetColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询接收对象失败: {e}")))?;

        Ok(targets
            .into_iter()
            .filter_map(|m| {
                let (id, kind) = (m.id, m.target_kind.clone());
                let target = m.into_target();
                if target.is_none() {
                    warn!(target_row = id, kind = %kind, "跳过无法识别的接收对象");
                }
                target
            })
            .collect())
    }
}
