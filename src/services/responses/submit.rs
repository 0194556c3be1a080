use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::forms::entities::FormStatus;
use crate::models::notifications::entities::NotificationType;
use crate::models::reports::{
    entities::{NewReport, Report, ReportStage, ReportWrite},
    responses::ReportView,
};
use crate::models::responses::{
    entities::{FormResponse, NewFormResponse},
    requests::SubmitResponseRequest,
    responses::SubmissionResult,
};
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};
use crate::services::forms::recipients::form_access_context;
use crate::workflow::{Actor, Submission};
use crate::workflow::report_stage::submit;
use crate::workflow::validation::validate_response;

/// 选择要写入的报告：本人已有的报告、未认领的骨架报告，或新建
async fn report_for_submission(
    ctx: &AppContext,
    form_id: i64,
    group_id: i64,
    supervision_id: Option<i64>,
    responder_id: i64,
) -> Result<Report> {
    if let Some(report) = ctx
        .storage
        .find_report_by_responder(form_id, responder_id)
        .await?
    {
        return Ok(report);
    }
    if let Some(report) = ctx.storage.find_unclaimed_report(form_id).await? {
        return Ok(report);
    }

    let (time_teacher_id, teacher_id) = match supervision_id {
        Some(id) => ctx
            .storage
            .get_supervision_by_id(id)
            .await?
            .map(|s| (s.time_teacher_id, s.teacher_id))
            .unwrap_or_default(),
        None => (None, None),
    };
    let now = Utc::now();
    let skeleton = NewReport::skeleton(group_id, form_id, supervision_id, time_teacher_id, teacher_id);
    // id 为 0 表示尚未落库，写入时新建
    Ok(Report {
        id: 0,
        group_id: skeleton.group_id,
        form_id: skeleton.form_id,
        form_response_id: None,
        responder_id: None,
        student_name: None,
        class_name: None,
        stage: skeleton.stage,
        supervision_id: skeleton.supervision_id,
        time_teacher_id: skeleton.time_teacher_id,
        teacher_id: skeleton.teacher_id,
        time_teacher_comment: None,
        teacher_comment: None,
        time_teacher_completed_at: None,
        teacher_completed_at: None,
        rejected_at: None,
        rejected_by: None,
        rejection_reason: None,
        created_at: now,
        updated_at: now,
    })
}

/// 学生提交作答，报告进入一审阶段
///
/// 被驳回到 stage_0 的报告可以重新提交，其余阶段拒绝。
pub async fn submit_response(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    req: SubmitResponseRequest,
) -> Result<SubmissionResult> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let form = ctx.load_form(form_id).await?;
    let member = ctx.member(form.group_id, user.id).await?;
    let actor = Actor::new(user.id, member.role);
    if form.status != FormStatus::Send {
        return Err(AcademyError::invalid_state("Form has not been sent yet"));
    }
    let context = form_access_context(ctx, &form, actor)
        .await?
        .in_class(member.class_id);
    ensure_permission(actor, Action::RespondForm, Some(&context))?;

    let questions = ctx.storage.list_questions(form.id).await?;
    validate_response(&questions, &req.answers)?;

    let mut report =
        report_for_submission(ctx, form.id, form.group_id, form.supervision_id, user.id).await?;
    let expected = report.stage;
    let class_name = match member.class_id {
        Some(class_id) => ctx.storage.get_class_by_id(class_id).await?.map(|c| c.name),
        None => None,
    };
    submit(
        &mut report,
        Submission {
            responder_id: user.id,
            form_response_id: 0,
            student_name: member.display_name.clone(),
            class_name,
        },
        Utc::now(),
    )?;

    let write = if report.id == 0 {
        ReportWrite::Create(NewReport {
            group_id: report.group_id,
            form_id: report.form_id,
            form_response_id: None,
            responder_id: report.responder_id,
            student_name: report.student_name.clone(),
            class_name: report.class_name.clone(),
            stage: report.stage,
            supervision_id: report.supervision_id,
            time_teacher_id: report.time_teacher_id,
            teacher_id: report.teacher_id,
        })
    } else {
        ReportWrite::Update {
            report: Box::new(report),
            expected,
        }
    };

    let (response, report) = ctx
        .storage
        .submit_response(
            NewFormResponse {
                form_id: form.id,
                responder_id: user.id,
                answers: req.answers,
            },
            write,
        )
        .await?;
    info!(
        "用户 {} 提交表单 {}，报告 {} 进入 {}",
        user.id, form.id, report.id, report.stage
    );

    if let Some(reviewer) = report.time_teacher_id {
        ctx.notify(
            reviewer,
            NotificationType::ReportSubmitted,
            json!({ "report_id": report.id, "form_id": form.id }),
        )
        .await;
    }

    Ok(SubmissionResult {
        response,
        report: ReportView::for_role(report, actor.role),
    })
}

/// 当前用户在表单上的作答
pub async fn get_my_response(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
) -> Result<FormResponse> {
    let form = ctx.load_form(form_id).await?;
    ctx.member(form.group_id, user.id).await?;
    ctx.storage
        .get_response(form_id, user.id)
        .await?
        .ok_or_else(|| AcademyError::not_found("Response not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::responses::entities::{Answer, AnswerValue};
    use crate::services::forms::create::create_form;
    use crate::services::test_support::{Fixture, create_request, fixture, sent_form, user};

    fn rating(question_id: i64, value: i32) -> SubmitResponseRequest {
        SubmitResponseRequest {
            answers: vec![Answer {
                question_id,
                value: AnswerValue::Rating { value },
            }],
        }
    }

    async fn question_id(f: &Fixture, form_id: i64) -> i64 {
        f.ctx.storage.list_questions(form_id).await.unwrap()[0]
            .id
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_submission_claims_skeleton() {
        let f = fixture().await;
        let bundle = sent_form(&f).await;
        let qid = question_id(&f, bundle.form.id).await;

        let result = submit_response(&f.ctx, &f.student, bundle.form.id, rating(qid, 4))
            .await
            .unwrap();
        assert_eq!(result.report.id, bundle.report.id);
        assert_eq!(result.report.stage, ReportStage::AwaitingPartTime);
        assert_eq!(result.report.form_response_id, Some(result.response.id));
        assert_eq!(result.report.student_name.as_deref(), Some("Student Kim"));
        assert_eq!(result.report.class_name.as_deref(), Some("Class A"));

        let inbox = f
            .ctx
            .storage
            .list_notifications(f.part_time.id, true)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::ReportSubmitted);

        let mine = get_my_response(&f.ctx, &f.student, bundle.form.id)
            .await
            .unwrap();
        assert_eq!(mine.id, result.response.id);
    }

    #[tokio::test]
    async fn test_second_student_gets_new_report() {
        let f = fixture().await;
        let bundle = sent_form(&f).await;
        let qid = question_id(&f, bundle.form.id).await;

        let first = submit_response(&f.ctx, &f.student, bundle.form.id, rating(qid, 3))
            .await
            .unwrap();
        let second = submit_response(&f.ctx, &f.other_student, bundle.form.id, rating(qid, 5))
            .await
            .unwrap();
        assert_ne!(first.report.id, second.report.id);
        assert_eq!(second.report.time_teacher_id, Some(f.part_time.id));
        assert_eq!(second.report.teacher_id, Some(f.teacher.id));
    }

    #[tokio::test]
    async fn test_resubmission_only_after_rejection() {
        let f = fixture().await;
        let bundle = sent_form(&f).await;
        let qid = question_id(&f, bundle.form.id).await;

        submit_response(&f.ctx, &f.student, bundle.form.id, rating(qid, 3))
            .await
            .unwrap();
        let err = submit_response(&f.ctx, &f.student, bundle.form.id, rating(qid, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_submission_rules() {
        let f = fixture().await;
        let draft = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();
        let qid = draft.questions[0].id.unwrap();
        let err = submit_response(&f.ctx, &f.student, draft.form.id, rating(qid, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));

        let bundle = sent_form(&f).await;
        let qid = question_id(&f, bundle.form.id).await;
        let err = submit_response(
            &f.ctx,
            &f.student,
            bundle.form.id,
            SubmitResponseRequest { answers: vec![] },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));

        let err = submit_response(&f.ctx, &f.teacher, bundle.form.id, rating(qid, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        let err = submit_response(&f.ctx, &user(77, "Outsider"), bundle.form.id, rating(qid, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }
}
