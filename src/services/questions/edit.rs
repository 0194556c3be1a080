//! 单题编辑：每个操作都在表单锁内基于存储中的完整题目集进行

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::forms::entities::Form;
use crate::models::questions::{
    entities::{Question, QuestionType},
    requests::{QuestionPatch, ReorderQuestionRequest, ReplaceQuestionsRequest},
};
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};
use crate::services::forms::create::questions_from_inputs;
use crate::services::forms::update::owner_context;
use crate::workflow::{QuestionEditor, ensure_editable};
use crate::workflow::question_set::plan_exam_templates;
use crate::workflow::validation::validate_structure;

async fn authorize(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    action: Action,
) -> Result<Form> {
    let form = ctx.load_form(form_id).await?;
    let actor = ctx.actor(form.group_id, user.id).await?;
    ensure_permission(actor, action, Some(&owner_context(&form, user.id)))?;
    Ok(form)
}

/// 加载表单并检查编辑权限，返回基于当前题目集的编辑器
async fn open_editor(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    action: Action,
) -> Result<(Form, QuestionEditor)> {
    let form = authorize(ctx, user, form_id, action).await?;
    let questions = ctx.storage.list_questions(form.id).await?;
    let editor = QuestionEditor::new(form.id, form.status, questions);
    Ok((form, editor))
}

async fn persist(ctx: &AppContext, form: &Form, editor: QuestionEditor) -> Result<Vec<Question>> {
    let questions = editor.into_questions();
    validate_structure(&questions)?;
    ctx.storage
        .replace_questions(form.id, questions, Vec::new(), form.status)
        .await
}

fn locate(editor: &QuestionEditor, question_id: i64) -> Result<usize> {
    editor
        .position_of(question_id)
        .ok_or_else(|| AcademyError::not_found("Question not found"))
}

/// 追加默认配置的题目
pub async fn add_question(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    question_type: QuestionType,
) -> Result<Question> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let (form, mut editor) = open_editor(ctx, user, form_id, Action::CreateQuestion).await?;
    editor.add_question(question_type)?;

    let mut saved = persist(ctx, &form, editor).await?;
    saved
        .pop()
        .ok_or_else(|| AcademyError::database_operation("Question was not written"))
}

/// 局部更新题目
pub async fn update_question(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    question_id: i64,
    patch: QuestionPatch,
) -> Result<Question> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let (form, mut editor) = open_editor(ctx, user, form_id, Action::UpdateQuestion).await?;
    let index = locate(&editor, question_id)?;
    editor.update_question(index, patch)?;

    let saved = persist(ctx, &form, editor).await?;
    saved
        .into_iter()
        .nth(index)
        .ok_or_else(|| AcademyError::database_operation("Question was not written"))
}

pub async fn delete_question(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    question_id: i64,
) -> Result<Vec<Question>> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let (form, mut editor) = open_editor(ctx, user, form_id, Action::DeleteQuestion).await?;
    let index = locate(&editor, question_id)?;
    editor.delete_question(index)?;
    persist(ctx, &form, editor).await
}

pub async fn reorder_questions(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    req: ReorderQuestionRequest,
) -> Result<Vec<Question>> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let (form, mut editor) = open_editor(ctx, user, form_id, Action::UpdateQuestion).await?;
    editor.move_question(req.from, req.to)?;
    persist(ctx, &form, editor).await
}

/// 整体替换题目集，只做结构校验，状态不变
pub async fn replace_questions(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    req: ReplaceQuestionsRequest,
) -> Result<Vec<Question>> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let form = authorize(ctx, user, form_id, Action::UpdateQuestion).await?;
    ensure_editable(form.status)?;

    let questions = questions_from_inputs(form.id, req.questions);
    validate_structure(&questions)?;
    let templates = plan_exam_templates(&questions, form.group_id, user.id);
    ctx.storage
        .replace_questions(form.id, questions, templates, form.status)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::entities::{FormStatus, FormTarget};
    use crate::models::forms::requests::SendFormRequest;
    use crate::models::questions::entities::{ConceptItemDraft, QuestionConfig};
    use crate::models::questions::requests::QuestionInput;
    use crate::services::forms::{create::create_form, send::send_form};
    use crate::services::test_support::{create_request, fixture, sent_form};
    use crate::workflow::FORM_IS_SENT;

    #[tokio::test]
    async fn test_add_update_reorder_delete() {
        let f = fixture().await;
        let bundle = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();
        let form_id = bundle.form.id;

        let added = add_question(&f.ctx, &f.teacher, form_id, QuestionType::Choice)
            .await
            .unwrap();
        assert_eq!(added.order_index, 1);
        let added_id = added.id.unwrap();

        let updated = update_question(
            &f.ctx,
            &f.teacher,
            form_id,
            added_id,
            QuestionPatch {
                question_text: Some("Pick one".into()),
                options: Some(vec!["A".into(), "B".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.question_text, "Pick one");

        let reordered = reorder_questions(
            &f.ctx,
            &f.teacher,
            form_id,
            ReorderQuestionRequest { from: 1, to: 0 },
        )
        .await
        .unwrap();
        assert_eq!(reordered[0].id, Some(added_id));
        assert_eq!(reordered[1].order_index, 1);

        let remaining = delete_question(&f.ctx, &f.teacher, form_id, added_id)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].order_index, 0);
    }

    #[tokio::test]
    async fn test_invalid_patch_leaves_question_unchanged() {
        let f = fixture().await;
        let bundle = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();
        let question = bundle.questions[0].clone();

        let err = update_question(
            &f.ctx,
            &f.teacher,
            bundle.form.id,
            question.id.unwrap(),
            QuestionPatch {
                rating_max: Some(42),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));

        let stored = f.ctx.storage.list_questions(bundle.form.id).await.unwrap();
        assert_eq!(stored[0], question);
    }

    #[tokio::test]
    async fn test_sent_form_questions_are_frozen() {
        let f = fixture().await;
        let bundle = sent_form(&f).await;

        let err = add_question(&f.ctx, &f.teacher, bundle.form.id, QuestionType::Text)
            .await
            .unwrap_err();
        assert_eq!(err.message(), FORM_IS_SENT);

        let err = replace_questions(
            &f.ctx,
            &f.teacher,
            bundle.form.id,
            ReplaceQuestionsRequest { questions: vec![] },
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), FORM_IS_SENT);
        assert_eq!(
            f.ctx.storage.list_questions(bundle.form.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_unknown_question_is_not_found() {
        let f = fixture().await;
        let bundle = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();
        let err = delete_question(&f.ctx, &f.teacher, bundle.form.id, 9_999)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_send_creates_template_left_by_editor() {
        let f = fixture().await;
        let mut req = create_request(f.group_id);
        req.questions.clear();
        let bundle = create_form(&f.ctx, &f.teacher, req).await.unwrap();
        let form_id = bundle.form.id;

        let exam = add_question(&f.ctx, &f.teacher, form_id, QuestionType::Exam)
            .await
            .unwrap();
        update_question(
            &f.ctx,
            &f.teacher,
            form_id,
            exam.id.unwrap(),
            QuestionPatch {
                question_text: Some("Key ideas".into()),
                exam_concept_items: Some(vec![ConceptItemDraft {
                    text: "entropy".into(),
                    description: String::new(),
                }]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(
            f.ctx
                .storage
                .list_concept_templates(f.group_id)
                .await
                .unwrap()
                .is_empty()
        );

        send_form(
            &f.ctx,
            &f.teacher,
            form_id,
            SendFormRequest {
                targets: vec![FormTarget::Class {
                    class_id: f.class_id,
                }],
            },
        )
        .await
        .unwrap();

        let templates = f.ctx.storage.list_concept_templates(f.group_id).await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Key ideas");
        let questions = f.ctx.storage.list_questions(form_id).await.unwrap();
        assert!(matches!(
            &questions[0].config,
            QuestionConfig::Exam { template, .. } if template.template_id() == Some(templates[0].id)
        ));
        assert_eq!(f.ctx.load_form(form_id).await.unwrap().status, FormStatus::Send);
    }

    #[tokio::test]
    async fn test_replace_keeps_draft_status() {
        let f = fixture().await;
        let bundle = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();
        let saved = replace_questions(
            &f.ctx,
            &f.teacher,
            bundle.form.id,
            ReplaceQuestionsRequest {
                questions: vec![QuestionInput {
                    id: None,
                    is_required: false,
                    question_text: String::new(),
                    config: QuestionConfig::default_for(QuestionType::Text),
                }],
            },
        )
        .await
        .unwrap();
        assert_eq!(saved.len(), 1);
        assert_ne!(saved[0].id, bundle.questions[0].id);
        assert_eq!(
            f.ctx.load_form(bundle.form.id).await.unwrap().status,
            FormStatus::Draft
        );
    }
}
