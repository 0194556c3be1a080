use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};

use super::update::owner_context;

/// 删除表单及其题目、作答与报告
pub async fn delete_form(ctx: &AppContext, user: &CurrentUser, form_id: i64) -> Result<()> {
    let _guard = ctx.form_locks.lock(form_id).await;
    let form = ctx.load_form(form_id).await?;
    let actor = ctx.actor(form.group_id, user.id).await?;
    ensure_permission(actor, Action::DeleteForm, Some(&owner_context(&form, user.id)))?;

    if !ctx.storage.delete_form(form_id).await? {
        return Err(AcademyError::not_found("Form not found"));
    }
    info!("用户 {} 删除表单 {}", user.id, form_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reports::requests::ReportListQuery;
    use crate::services::test_support::{fixture, sent_form};

    #[tokio::test]
    async fn test_delete_removes_reports() {
        let f = fixture().await;
        let bundle = sent_form(&f).await;

        let err = delete_form(&f.ctx, &f.part_time, bundle.form.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        delete_form(&f.ctx, &f.teacher, bundle.form.id).await.unwrap();
        assert!(f.ctx.storage.get_form_by_id(bundle.form.id).await.unwrap().is_none());
        let reports = f
            .ctx
            .storage
            .list_reports(ReportListQuery {
                group_id: f.group_id,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(reports.is_empty());

        let err = delete_form(&f.ctx, &f.teacher, bundle.form.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::NotFound(_)));
    }
}
