use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::forms::{
    entities::{NewForm, NewFormBundle},
    requests::DuplicateFormRequest,
    responses::FormBundle,
};
use crate::models::questions::entities::{ExamTemplateRef, Question, QuestionConfig};
use crate::models::supervisions::entities::SupervisionAssignment;
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};
use crate::workflow::form_lifecycle::{duplicate_questions, duplicate_title};
use crate::workflow::question_set::{TemplatePlan, copy_template, plan_exam_templates};

use super::recipients::form_access_context;

/// 复制题目引用的已有模板，每道考试题得到独立的模板行
async fn copied_template_plans(
    ctx: &AppContext,
    questions: &[Question],
    group_id: i64,
    creator_id: i64,
) -> Result<Vec<TemplatePlan>> {
    let mut plans = Vec::new();
    for (index, question) in questions.iter().enumerate() {
        let QuestionConfig::Exam {
            template: ExamTemplateRef::Existing { template_id },
            ..
        } = &question.config
        else {
            continue;
        };
        let source = ctx
            .storage
            .get_concept_template(*template_id)
            .await?
            .ok_or_else(|| {
                AcademyError::dependency_failure(format!(
                    "Concept template {template_id} referenced by question {index} does not exist"
                ))
            })?;
        plans.push(TemplatePlan {
            question_index: index,
            template: copy_template(&source, group_id, creator_id),
        });
    }
    Ok(plans)
}

/// 复制表单：题目、模板与审阅人一并复制，新表单回到 draft
pub async fn duplicate_form(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    req: DuplicateFormRequest,
) -> Result<FormBundle> {
    let source = ctx.load_form(form_id).await?;
    let actor = ctx.actor(source.group_id, user.id).await?;
    let context = form_access_context(ctx, &source, actor).await?;
    ensure_permission(actor, Action::DuplicateForm, Some(&context))?;

    let questions = duplicate_questions(&ctx.storage.list_questions(source.id).await?);
    let mut templates = plan_exam_templates(&questions, source.group_id, user.id);
    templates.extend(copied_template_plans(ctx, &questions, source.group_id, user.id).await?);
    templates.sort_by_key(|plan| plan.question_index);

    let supervision = match source.supervision_id {
        Some(id) => ctx
            .storage
            .get_supervision_by_id(id)
            .await?
            .map(|s| SupervisionAssignment::new(s.time_teacher_id, s.teacher_id))
            .unwrap_or_default(),
        None => SupervisionAssignment::default(),
    };

    let suffix = req
        .append_suffix
        .unwrap_or(true)
        .then_some(ctx.workflow.copy_suffix.as_str());
    let bundle = ctx
        .storage
        .create_form_bundle(NewFormBundle {
            form: NewForm {
                group_id: source.group_id,
                creator_id: user.id,
                title: duplicate_title(&source.title, suffix),
                description: source.description.clone(),
            },
            supervision,
            questions,
            templates,
        })
        .await?;

    info!("表单 {} 复制为 {}", source.id, bundle.form.id);
    Ok(bundle)
}
