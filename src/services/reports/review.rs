//! 报告审阅、驳回与重新打开
//!
//! 每个操作在报告锁内读取完整报告、在内存中流转、再按原阶段比较后整体写回。

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::errors::Result;
use crate::middlewares::CurrentUser;
use crate::models::notifications::entities::NotificationType;
use crate::models::reports::{
    entities::{Report, ReportStage},
    requests::{RejectReportRequest, ReopenReportRequest, ReviewReportRequest},
    responses::ReportView,
};
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};
use crate::workflow::report_stage::{self, review_action};

use super::detail::report_context;

/// 阶段对应的负责人
fn owner_of(report: &Report, stage: ReportStage) -> Option<i64> {
    match stage {
        ReportStage::AwaitingStudent | ReportStage::Completed => report.responder_id,
        ReportStage::AwaitingPartTime => report.time_teacher_id,
        ReportStage::AwaitingTeacher => report.teacher_id,
    }
}

fn payload(report: &Report) -> serde_json::Value {
    json!({
        "report_id": report.id,
        "form_id": report.form_id,
        "stage": report.stage,
    })
}

/// 审阅：写入评语，可选结束当前阶段
pub async fn review_report(
    ctx: &AppContext,
    user: &CurrentUser,
    report_id: i64,
    req: ReviewReportRequest,
) -> Result<ReportView> {
    let _guard = ctx.report_locks.lock(report_id).await;
    let mut report = ctx.load_report(report_id).await?;
    let actor = ctx.actor(report.group_id, user.id).await?;
    if let Some(action) = review_action(report.stage) {
        ensure_permission(actor, action, Some(&report_context(&report, actor)))?;
    }

    let expected = report.stage;
    let stage = report_stage::review(&mut report, actor, req.comment, req.complete, Utc::now())?;
    let report = ctx.storage.save_report(report, expected).await?;

    if stage != expected {
        info!("报告 {} 从 {} 进入 {}", report.id, expected, stage);
        if let Some(next) = owner_of(&report, stage) {
            ctx.notify(next, NotificationType::ReportStageCompleted, payload(&report))
                .await;
        }
    }
    Ok(ReportView::for_role(report, actor.role))
}

/// 驳回到指定的更早阶段
pub async fn reject_report(
    ctx: &AppContext,
    user: &CurrentUser,
    report_id: i64,
    req: RejectReportRequest,
) -> Result<ReportView> {
    let _guard = ctx.report_locks.lock(report_id).await;
    let mut report = ctx.load_report(report_id).await?;
    let actor = ctx.actor(report.group_id, user.id).await?;
    ensure_permission(
        actor,
        Action::RejectReport,
        Some(&report_context(&report, actor)),
    )?;

    let expected = report.stage;
    report_stage::reject(&mut report, actor, req.reason, req.target_stage, Utc::now())?;
    let report = ctx.storage.save_report(report, expected).await?;
    info!(
        "报告 {} 被用户 {} 从 {} 驳回到 {}",
        report.id, user.id, expected, report.stage
    );

    if let Some(target) = owner_of(&report, report.stage) {
        ctx.notify(target, NotificationType::ReportRejected, payload(&report))
            .await;
    }
    Ok(ReportView::for_role(report, actor.role))
}

/// 管理员重新打开已完成的报告
pub async fn reopen_report(
    ctx: &AppContext,
    user: &CurrentUser,
    report_id: i64,
    req: ReopenReportRequest,
) -> Result<ReportView> {
    let _guard = ctx.report_locks.lock(report_id).await;
    let mut report = ctx.load_report(report_id).await?;
    let actor = ctx.actor(report.group_id, user.id).await?;
    ensure_permission(actor, Action::ReopenReport, None)?;

    report_stage::reopen(&mut report, actor, req.target_stage, Utc::now())?;
    let report = ctx.storage.save_report(report, ReportStage::Completed).await?;
    info!("报告 {} 被重新打开到 {}", report.id, report.stage);

    if let Some(target) = owner_of(&report, report.stage) {
        ctx.notify(target, NotificationType::ReportReopened, payload(&report))
            .await;
    }
    Ok(ReportView::for_role(report, actor.role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AcademyError;
    use crate::models::groups::{entities::Role, requests::UpsertMemberRequest};
    use crate::services::reports::detail::get_report;
    use crate::services::test_support::{fixture, submit_for, submitted_report, user};

    fn review(comment: &str, complete: bool) -> ReviewReportRequest {
        ReviewReportRequest {
            comment: Some(comment.into()),
            complete,
        }
    }

    #[tokio::test]
    async fn test_full_review_path() {
        let f = fixture().await;
        let (_, report) = submitted_report(&f, &f.student).await;

        let err = review_report(&f.ctx, &f.teacher, report.id, review("early", true))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        let draft = review_report(&f.ctx, &f.part_time, report.id, review("draft note", false))
            .await
            .unwrap();
        assert_eq!(draft.stage, ReportStage::AwaitingPartTime);

        let first = review_report(&f.ctx, &f.part_time, report.id, review("solid work", true))
            .await
            .unwrap();
        assert_eq!(first.stage, ReportStage::AwaitingTeacher);
        assert_eq!(first.time_teacher_comment.as_deref(), Some("solid work"));
        // 兼职教师看不到教师评语
        assert!(first.teacher_comment.is_none());

        let inbox = f.ctx.storage.list_notifications(f.teacher.id, true).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::ReportStageCompleted);

        let done = review_report(&f.ctx, &f.teacher, report.id, review("approved", true))
            .await
            .unwrap();
        assert_eq!(done.stage, ReportStage::Completed);
        assert!(done.time_teacher_completed_at <= done.teacher_completed_at);

        let student_inbox = f.ctx.storage.list_notifications(f.student.id, true).await.unwrap();
        assert!(
            student_inbox
                .iter()
                .any(|n| n.notification_type == NotificationType::ReportStageCompleted)
        );

        let err = review_report(&f.ctx, &f.teacher, report.id, review("again", true))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_unassigned_part_time_reads_but_cannot_review() {
        let f = fixture().await;
        let (_, report) = submitted_report(&f, &f.student).await;

        let other_tutor = user(6, "Tutor Han");
        f.ctx
            .storage
            .upsert_member(
                f.group_id,
                UpsertMemberRequest {
                    user_id: other_tutor.id,
                    display_name: other_tutor.name.clone(),
                    role: Role::PartTime,
                    class_id: None,
                },
            )
            .await
            .unwrap();

        let view = get_report(&f.ctx, &other_tutor, report.id).await.unwrap();
        assert_eq!(view.stage, ReportStage::AwaitingPartTime);

        let err = review_report(&f.ctx, &other_tutor, report.id, review("mine now", true))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_reject_back_to_student_allows_resubmission() {
        let f = fixture().await;
        let (bundle, report) = submitted_report(&f, &f.student).await;
        review_report(&f.ctx, &f.part_time, report.id, review("ok", true))
            .await
            .unwrap();

        let err = reject_report(
            &f.ctx,
            &f.teacher,
            report.id,
            RejectReportRequest {
                reason: "redo".into(),
                target_stage: ReportStage::AwaitingTeacher,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));

        let rejected = reject_report(
            &f.ctx,
            &f.teacher,
            report.id,
            RejectReportRequest {
                reason: "missing details".into(),
                target_stage: ReportStage::AwaitingStudent,
            },
        )
        .await
        .unwrap();
        assert_eq!(rejected.stage, ReportStage::AwaitingStudent);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("missing details"));
        assert!(rejected.time_teacher_completed_at.is_none());

        let inbox = f.ctx.storage.list_notifications(f.student.id, true).await.unwrap();
        assert!(
            inbox
                .iter()
                .any(|n| n.notification_type == NotificationType::ReportRejected)
        );

        let resubmitted = submit_for(&f, &bundle, &f.student).await;
        assert_eq!(resubmitted.id, report.id);
        assert_eq!(resubmitted.stage, ReportStage::AwaitingPartTime);
    }

    #[tokio::test]
    async fn test_only_admin_reopens_completed_reports() {
        let f = fixture().await;
        let (_, report) = submitted_report(&f, &f.student).await;
        let reopen = |target_stage| ReopenReportRequest { target_stage };

        let err = reopen_report(&f.ctx, &f.admin, report.id, reopen(ReportStage::AwaitingTeacher))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));

        review_report(&f.ctx, &f.part_time, report.id, review("ok", true))
            .await
            .unwrap();
        review_report(&f.ctx, &f.teacher, report.id, review("ok", true))
            .await
            .unwrap();

        let err = reopen_report(&f.ctx, &f.teacher, report.id, reopen(ReportStage::AwaitingTeacher))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        let reopened = reopen_report(&f.ctx, &f.admin, report.id, reopen(ReportStage::AwaitingTeacher))
            .await
            .unwrap();
        assert_eq!(reopened.stage, ReportStage::AwaitingTeacher);
        assert!(reopened.teacher_completed_at.is_none());
        assert!(reopened.time_teacher_completed_at.is_some());
    }
}
