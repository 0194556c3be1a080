use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::forms::{
    entities::Form,
    requests::{SaveFormRequest, UpdateFormRequest},
    responses::FormWithQuestions,
};
use crate::permissions::{Action, PermissionContext};
use crate::services::context::{AppContext, ensure_permission};
use crate::workflow::form_lifecycle::{ensure_editable, status_after_save};
use crate::workflow::question_set::plan_exam_templates;
use crate::workflow::validation::validate_completeness;

use super::create::{ensure_title, questions_from_inputs};

pub(crate) fn owner_context(form: &Form, user_id: i64) -> PermissionContext {
    PermissionContext::for_user(user_id)
        .owned_by(form.creator_id)
        .in_group(form.group_id)
}

/// 修改标题与描述
pub async fn update_form(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    req: UpdateFormRequest,
) -> Result<Form> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let form = ctx.load_form(form_id).await?;
    let actor = ctx.actor(form.group_id, user.id).await?;
    ensure_permission(actor, Action::UpdateForm, Some(&owner_context(&form, user.id)))?;
    ensure_editable(form.status)?;
    if let Some(title) = &req.title {
        ensure_title(title)?;
    }

    ctx.storage
        .update_form_details(
            form_id,
            req.title.map(|t| t.trim().to_string()),
            req.description,
        )
        .await?
        .ok_or_else(|| AcademyError::not_found("Form not found"))
}

/// 保存表单：提交完整题目集，校验完整性，状态进入 save
pub async fn save_form(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    req: SaveFormRequest,
) -> Result<FormWithQuestions> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let form = ctx.load_form(form_id).await?;
    let actor = ctx.actor(form.group_id, user.id).await?;
    ensure_permission(actor, Action::UpdateForm, Some(&owner_context(&form, user.id)))?;
    let status = status_after_save(form.status)?;

    let questions = questions_from_inputs(form.id, req.questions);
    validate_completeness(&questions)?;
    let templates = plan_exam_templates(&questions, form.group_id, user.id);

    let questions = ctx
        .storage
        .replace_questions(form.id, questions, templates, status)
        .await?;
    info!("表单 {} 已保存，共 {} 题", form.id, questions.len());

    Ok(FormWithQuestions {
        form: ctx.load_form(form.id).await?,
        questions,
        targets: ctx.storage.list_form_targets(form.id).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::entities::FormStatus;
    use crate::models::questions::entities::{
        ConceptItemDraft, ExamTemplateRef, QuestionConfig, QuestionType,
    };
    use crate::models::questions::requests::QuestionInput;
    use crate::services::forms::create::create_form;
    use crate::services::test_support::{create_request, fixture, sent_form};
    use crate::workflow::FORM_IS_SENT;

    fn exam_input() -> QuestionInput {
        QuestionInput {
            id: None,
            is_required: false,
            question_text: "Vocabulary".into(),
            config: QuestionConfig::Exam {
                total_questions: 5,
                template: ExamTemplateRef::New {
                    name: String::new(),
                    items: vec![
                        ConceptItemDraft {
                            text: "photosynthesis".into(),
                            description: String::new(),
                        },
                        ConceptItemDraft::default(),
                    ],
                },
            },
        }
    }

    #[tokio::test]
    async fn test_save_materializes_exam_template() {
        let f = fixture().await;
        let bundle = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();
        let existing = bundle.questions[0].clone();

        let saved = save_form(
            &f.ctx,
            &f.teacher,
            bundle.form.id,
            SaveFormRequest {
                questions: vec![
                    exam_input(),
                    QuestionInput {
                        id: existing.id,
                        is_required: existing.is_required,
                        question_text: existing.question_text.clone(),
                        config: existing.config.clone(),
                    },
                ],
            },
        )
        .await
        .unwrap();

        assert_eq!(saved.form.status, FormStatus::Save);
        assert_eq!(saved.questions[1].id, existing.id);
        assert_eq!(saved.questions[1].order_index, 1);

        let QuestionConfig::Exam { template, .. } = &saved.questions[0].config else {
            panic!("expected exam question");
        };
        let template_id = template.template_id().expect("template must be created first");
        let template = f
            .ctx
            .storage
            .get_concept_template(template_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(template.name, "Vocabulary");
        assert_eq!(template.concept_count, 5);
        assert_eq!(template.items.len(), 1);
    }

    #[tokio::test]
    async fn test_save_requires_complete_questions() {
        let f = fixture().await;
        let bundle = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();
        let mut input = exam_input();
        input.question_text.clear();
        input.config = QuestionConfig::default_for(QuestionType::Choice);

        let err = save_form(
            &f.ctx,
            &f.teacher,
            bundle.form.id,
            SaveFormRequest {
                questions: vec![input],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(ref fields) if fields.len() == 2));
    }

    #[tokio::test]
    async fn test_sent_form_metadata_is_frozen() {
        let f = fixture().await;
        let bundle = sent_form(&f).await;
        let err = update_form(
            &f.ctx,
            &f.teacher,
            bundle.form.id,
            UpdateFormRequest {
                title: Some("Renamed".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), FORM_IS_SENT);
    }
}
