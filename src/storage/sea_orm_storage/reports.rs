//! 报告存储操作
//!
//! 报告阶段字段总是整体写回，并以期望阶段做比较并设置。

use super::SeaOrmStorage;
use crate::entity::reports::{ActiveModel, Column, Entity as Reports};
use crate::errors::{AcademyError, Result};
use crate::models::reports::{
    entities::{NewReport, Report, ReportStage},
    requests::ReportListQuery,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

pub(super) const REPORT_CHANGED: &str = "Report was changed by someone else, please reload";

pub(super) async fn insert_report<C: ConnectionTrait>(
    conn: &C,
    report: NewReport,
) -> Result<Report> {
    let now = chrono::Utc::now().timestamp();
    let model = ActiveModel {
        group_id: Set(report.group_id),
        form_id: Set(report.form_id),
        form_response_id: Set(report.form_response_id),
        responder_id: Set(report.responder_id),
        student_name: Set(report.student_name),
        class_name: Set(report.class_name),
        stage: Set(report.stage.to_string()),
        supervision_id: Set(report.supervision_id),
        time_teacher_id: Set(report.time_teacher_id),
        teacher_id: Set(report.teacher_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建报告失败: {e}")))?
        .into_report()
}

/// 报告的全部可写列，主键与创建时间不在其中
fn report_values(report: &Report) -> ActiveModel {
    ActiveModel {
        form_response_id: Set(report.form_response_id),
        responder_id: Set(report.responder_id),
        student_name: Set(report.student_name.clone()),
        class_name: Set(report.class_name.clone()),
        stage: Set(report.stage.to_string()),
        supervision_id: Set(report.supervision_id),
        time_teacher_id: Set(report.time_teacher_id),
        teacher_id: Set(report.teacher_id),
        time_teacher_comment: Set(report.time_teacher_comment.clone()),
        teacher_comment: Set(report.teacher_comment.clone()),
        time_teacher_completed_at: Set(report.time_teacher_completed_at.map(|t| t.timestamp())),
        teacher_completed_at: Set(report.teacher_completed_at.map(|t| t.timestamp())),
        rejected_at: Set(report.rejected_at.map(|t| t.timestamp())),
        rejected_by: Set(report.rejected_by),
        rejection_reason: Set(report.rejection_reason.clone()),
        updated_at: Set(report.updated_at.timestamp()),
        ..Default::default()
    }
}

/// 比较并写回报告
///
/// `responder` 给出时，只允许写入尚未认领或已由该用户认领的报告。
pub(super) async fn compare_and_save_report<C: ConnectionTrait>(
    conn: &C,
    report: &Report,
    expected: ReportStage,
    responder: Option<i64>,
) -> Result<Report> {
    let mut update = Reports::update_many()
        .set(report_values(report))
        .filter(Column::Id.eq(report.id))
        .filter(Column::Stage.eq(expected.to_string()));
    if let Some(responder) = responder {
        update = update.filter(
            Condition::any()
                .add(Column::ResponderId.is_null())
                .add(Column::ResponderId.eq(responder)),
        );
    }

    let result = update
        .exec(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("更新报告失败: {e}")))?;
    if result.rows_affected == 0 {
        return Err(AcademyError::conflict(REPORT_CHANGED));
    }

    Reports::find_by_id(report.id)
        .one(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("查询报告失败: {e}")))?
        .ok_or_else(|| AcademyError::not_found("Report not found"))?
        .into_report()
}

impl SeaOrmStorage {
    pub async fn get_report_by_id_impl(&self, report_id: i64) -> Result<Option<Report>> {
        Reports::find_by_id(report_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报告失败: {e}")))?
            .map(|m| m.into_report())
            .transpose()
    }

    /// 最早创建的未认领骨架报告
    pub async fn find_unclaimed_report_impl(&self, form_id: i64) -> Result<Option<Report>> {
        Reports::find()
            .filter(Column::FormId.eq(form_id))
            .filter(Column::ResponderId.is_null())
            .filter(Column::Stage.eq(ReportStage::AwaitingStudent.to_string()))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报告失败: {e}")))?
            .map(|m| m.into_report())
            .transpose()
    }

    pub async fn find_report_by_responder_impl(
        &self,
        form_id: i64,
        responder_id: i64,
    ) -> Result<Option<Report>> {
        Reports::find()
            .filter(Column::FormId.eq(form_id))
            .filter(Column::ResponderId.eq(responder_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报告失败: {e}")))?
            .map(|m| m.into_report())
            .transpose()
    }

    pub async fn list_reports_impl(&self, query: ReportListQuery) -> Result<Vec<Report>> {
        let mut select = Reports::find().filter(Column::GroupId.eq(query.group_id));

        if let Some(form_id) = query.form_id {
            select = select.filter(Column::FormId.eq(form_id));
        }
        if let Some(class_name) = query.class_name {
            select = select.filter(Column::ClassName.eq(class_name));
        }
        if let Some(stage) = query.stage {
            select = select.filter(Column::Stage.eq(stage.to_string()));
        }
        if let Some(responder_id) = query.responder_id {
            select = select.filter(Column::ResponderId.eq(responder_id));
        }

        select
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报告列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_report())
            .collect()
    }

    pub async fn save_report_impl(&self, report: Report, expected: ReportStage) -> Result<Report> {
        compare_and_save_report(&self.db, &report, expected, None).await
    }
}
