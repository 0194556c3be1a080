use crate::errors::Result;
use crate::middlewares::CurrentUser;
use crate::models::common::pagination::PaginatedResponse;
use crate::models::groups::entities::Role;
use crate::models::reports::{
    entities::Report,
    requests::{ReportListParams, ReportListQuery},
    responses::{ReportListResponse, ReportView},
};
use crate::permissions::{Action, PermissionContext, has_permission};
use crate::services::context::{AppContext, ensure_permission};
use crate::workflow::Actor;

/// 报告的权限上下文：学生只能看自己的报告
pub(crate) fn report_context(report: &Report, actor: Actor) -> PermissionContext {
    let context = PermissionContext::for_user(actor.user_id).in_group(report.group_id);
    match actor.role {
        Role::Student => context.assigned_to(report.responder_id.into_iter().collect()),
        _ => context,
    }
}

pub async fn get_report(
    ctx: &AppContext,
    user: &CurrentUser,
    report_id: i64,
) -> Result<ReportView> {
    let report = ctx.load_report(report_id).await?;
    let actor = ctx.actor(report.group_id, user.id).await?;
    ensure_permission(actor, Action::ViewReport, Some(&report_context(&report, actor)))?;
    Ok(ReportView::for_role(report, actor.role))
}

/// 群组内的报告列表，按角色过滤后分页
pub async fn list_reports(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
    params: ReportListParams,
) -> Result<ReportListResponse> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::ViewReport, None)?;
    let (page, size) = params.pagination().normalized();

    let reports = ctx
        .storage
        .list_reports(ReportListQuery {
            group_id,
            form_id: params.form_id,
            class_name: params.class_name,
            stage: params.stage,
            responder_id: (actor.role == Role::Student).then_some(user.id),
        })
        .await?;

    let visible: Vec<ReportView> = reports
        .into_iter()
        .filter(|r| has_permission(actor.role, Action::ViewReport, Some(&report_context(r, actor))))
        .map(|r| ReportView::for_role(r, actor.role))
        .collect();

    let page = PaginatedResponse::from_sorted(visible, page, size);
    Ok(ReportListResponse {
        items: page.items,
        pagination: page.pagination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AcademyError;
    use crate::services::test_support::{fixture, submit_for, submitted_report};

    fn params() -> ReportListParams {
        ReportListParams {
            page: 1,
            size: 20,
            form_id: None,
            class_name: None,
            stage: None,
        }
    }

    #[tokio::test]
    async fn test_students_see_only_their_reports() {
        let f = fixture().await;
        let (bundle, mine) = submitted_report(&f, &f.student).await;
        let theirs = submit_for(&f, &bundle, &f.other_student).await;

        let listed = list_reports(&f.ctx, &f.student, f.group_id, params())
            .await
            .unwrap();
        let ids: Vec<i64> = listed.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![mine.id]);

        let err = get_report(&f.ctx, &f.student, theirs.id).await.unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        let all = list_reports(&f.ctx, &f.teacher, f.group_id, params())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let mut filtered = params();
        filtered.class_name = Some("Class A".into());
        filtered.form_id = Some(bundle.form.id);
        let by_class = list_reports(&f.ctx, &f.part_time, f.group_id, filtered)
            .await
            .unwrap();
        assert_eq!(by_class.items.len(), 2);
    }

    #[test]
    fn test_params_accept_string_numbers() {
        let params: ReportListParams =
            serde_json::from_str(r#"{"page":"2","size":"5","form_id":7}"#).unwrap();
        assert_eq!(params.pagination().normalized(), (2, 5));
        assert_eq!(params.form_id, Some(7));
    }
}
