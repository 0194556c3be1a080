use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::forms::{
    entities::{NewForm, NewFormBundle},
    requests::CreateFormRequest,
    responses::FormBundle,
};
use crate::models::questions::{entities::Question, requests::QuestionInput};
use crate::models::supervisions::entities::SupervisionAssignment;
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};
use crate::services::supervisions::validate_reviewers;
use crate::workflow::question_set::plan_exam_templates;
use crate::workflow::validation::validate_structure;

/// 请求中的题目按提交顺序编号
pub(crate) fn questions_from_inputs(form_id: i64, inputs: Vec<QuestionInput>) -> Vec<Question> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| Question {
            id: input.id,
            form_id,
            order_index: i as i32,
            is_required: input.is_required,
            question_text: input.question_text,
            config: input.config,
        })
        .collect()
}

pub(crate) fn ensure_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        Err(AcademyError::invalid_field("title", "must not be empty"))
    } else {
        Ok(())
    }
}

/// 创建表单：督导关系、骨架报告、初始题目一起落地
pub async fn create_form(
    ctx: &AppContext,
    user: &CurrentUser,
    req: CreateFormRequest,
) -> Result<FormBundle> {
    let actor = ctx.actor(req.group_id, user.id).await?;
    ensure_permission(actor, Action::CreateForm, None)?;
    ensure_title(&req.title)?;
    validate_reviewers(ctx, req.group_id, req.time_teacher_id, req.teacher_id).await?;

    let mut questions = questions_from_inputs(0, req.questions);
    for question in &mut questions {
        question.id = None;
    }
    validate_structure(&questions)?;
    let templates = plan_exam_templates(&questions, req.group_id, user.id);

    let bundle = ctx
        .storage
        .create_form_bundle(NewFormBundle {
            form: NewForm {
                group_id: req.group_id,
                creator_id: user.id,
                title: req.title.trim().to_string(),
                description: req.description,
            },
            supervision: SupervisionAssignment::new(req.time_teacher_id, req.teacher_id),
            questions,
            templates,
        })
        .await?;

    info!(
        "用户 {} 在群组 {} 创建表单 {}",
        user.id, bundle.form.group_id, bundle.form.id
    );
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::entities::FormStatus;
    use crate::models::questions::entities::QuestionConfig;
    use crate::models::reports::entities::ReportStage;
    use crate::services::test_support::{create_request as request, fixture};

    #[tokio::test]
    async fn test_create_with_reviewers() {
        let f = fixture().await;
        let mut req = request(f.group_id);
        req.time_teacher_id = Some(f.part_time.id);
        req.teacher_id = Some(f.teacher.id);

        let bundle = create_form(&f.ctx, &f.teacher, req).await.unwrap();
        assert_eq!(bundle.form.status, FormStatus::Draft);
        assert_eq!(bundle.questions.len(), 1);
        assert_eq!(bundle.report.stage, ReportStage::AwaitingStudent);
        let supervision = bundle.supervision.unwrap();
        assert_eq!(bundle.form.supervision_id, Some(supervision.id));
        assert_eq!(bundle.report.teacher_id, Some(f.teacher.id));
    }

    #[tokio::test]
    async fn test_student_cannot_create() {
        let f = fixture().await;
        let err = create_form(&f.ctx, &f.student, request(f.group_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_reviewer_role_must_match() {
        let f = fixture().await;
        let mut req = request(f.group_id);
        req.time_teacher_id = Some(f.student.id);

        let err = create_form(&f.ctx, &f.teacher, req).await.unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));
        assert!(f.ctx.storage.list_group_forms(f.group_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_rating() {
        let f = fixture().await;
        let mut req = request(f.group_id);
        req.questions[0].config = QuestionConfig::Rating {
            rating_max: 20,
            rating_step: 1,
        };
        let err = create_form(&f.ctx, &f.teacher, req).await.unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));
    }
}
