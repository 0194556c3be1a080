use serde_json::json;
use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::forms::{entities::Form, requests::SendFormRequest};
use crate::models::notifications::entities::NotificationType;
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};
use crate::workflow::form_lifecycle::{ensure_can_send, ensure_editable};
use crate::workflow::question_set::plan_exam_templates;

use super::recipients::collect_recipients;
use super::update::owner_context;

/// 发送表单：接收对象解析为用户，状态变为 send，通知每个接收人
pub async fn send_form(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
    req: SendFormRequest,
) -> Result<Form> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let form = ctx.load_form(form_id).await?;
    let actor = ctx.actor(form.group_id, user.id).await?;
    ensure_permission(actor, Action::SendForm, Some(&owner_context(&form, user.id)))?;
    ensure_editable(form.status)?;

    let questions = ctx.storage.list_questions(form.id).await?;
    let (recipients, target_errors) =
        collect_recipients(ctx.storage.as_ref(), form.group_id, &req.targets).await?;
    if !target_errors.is_empty() {
        return Err(AcademyError::InvalidFields(target_errors));
    }
    ensure_can_send(&form, &questions, recipients.len())?;

    // 仍带新建模板的考试题先落地模板
    let templates = plan_exam_templates(&questions, form.group_id, form.creator_id);
    if !templates.is_empty() {
        ctx.storage
            .replace_questions(form.id, questions, templates, form.status)
            .await?;
    }

    let mut targets = req.targets;
    targets.dedup();
    let sent = ctx.storage.send_form(form.id, targets).await?;
    info!(
        "表单 {} 已发送给 {} 名接收人",
        sent.id,
        recipients.len()
    );

    for recipient in recipients {
        ctx.notify(
            recipient,
            NotificationType::FormSent,
            json!({ "form_id": sent.id, "title": sent.title }),
        )
        .await;
    }
    Ok(sent)
}
