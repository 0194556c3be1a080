use crate::errors::Result;
use crate::middlewares::CurrentUser;
use crate::models::common::pagination::PaginatedResponse;
use crate::models::forms::{
    entities::FormStatus,
    requests::{FormListParams, FormListQuery},
    responses::{FormListResponse, FormWithQuestions},
};
use crate::models::groups::entities::Role;
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};

use super::recipients::{collect_recipients, form_access_context};

/// 表单详情：题目按顺序返回，附带接收对象
pub async fn get_form_with_questions(
    ctx: &AppContext,
    user: &CurrentUser,
    form_id: i64,
) -> Result<FormWithQuestions> {
    let form = ctx.load_form(form_id).await?;
    let actor = ctx.actor(form.group_id, user.id).await?;
    let context = form_access_context(ctx, &form, actor).await?;
    ensure_permission(actor, Action::ViewForm, Some(&context))?;

    let questions = ctx.storage.list_questions(form.id).await?;
    let targets = ctx.storage.list_form_targets(form.id).await?;
    Ok(FormWithQuestions {
        form,
        questions,
        targets,
    })
}

/// 群组内的表单列表，学生只能看到发送给自己的表单
pub async fn list_forms(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
    params: FormListParams,
) -> Result<FormListResponse> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::ViewForm, None)?;
    let (page, size) = params.pagination.normalized();

    if actor.role != Role::Student {
        return ctx
            .storage
            .list_forms_with_pagination(FormListQuery {
                group_id,
                page,
                size,
                status: params.status,
            })
            .await;
    }

    let mut visible = Vec::new();
    for form in ctx.storage.list_group_forms(group_id).await? {
        if form.status != FormStatus::Send
            || params.status.is_some_and(|s| s != form.status)
        {
            continue;
        }
        let targets = ctx.storage.list_form_targets(form.id).await?;
        let (recipients, _) = collect_recipients(ctx.storage.as_ref(), group_id, &targets).await?;
        if recipients.contains(&user.id) {
            visible.push(form);
        }
    }
    visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

    let page = PaginatedResponse::from_sorted(visible, page, size);
    Ok(FormListResponse {
        items: page.items,
        pagination: page.pagination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AcademyError;
    use crate::models::common::pagination::PaginationQuery;
    use crate::services::forms::create::create_form;
    use crate::services::test_support::{create_request, fixture, sent_form, user};

    fn params() -> FormListParams {
        FormListParams {
            pagination: PaginationQuery { page: 1, size: 20 },
            status: None,
        }
    }

    #[tokio::test]
    async fn test_student_sees_only_sent_forms_for_them() {
        let f = fixture().await;
        let sent = sent_form(&f).await;
        let draft = create_form(&f.ctx, &f.teacher, create_request(f.group_id))
            .await
            .unwrap();

        let listed = list_forms(&f.ctx, &f.student, f.group_id, params())
            .await
            .unwrap();
        let ids: Vec<i64> = listed.items.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![sent.form.id]);

        let teacher_view = list_forms(&f.ctx, &f.teacher, f.group_id, params())
            .await
            .unwrap();
        assert_eq!(teacher_view.pagination.total, 2);

        let err = get_form_with_questions(&f.ctx, &f.student, draft.form.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        let detail = get_form_with_questions(&f.ctx, &f.student, sent.form.id)
            .await
            .unwrap();
        assert_eq!(detail.questions.len(), 1);
        assert_eq!(detail.targets.len(), 1);
    }

    #[tokio::test]
    async fn test_outsider_is_rejected() {
        let f = fixture().await;
        let err = list_forms(&f.ctx, &user(99, "Stranger"), f.group_id, params())
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }
}
