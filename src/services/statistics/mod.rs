//! 群组完成率统计

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::{AppContext, ensure_permission};
use crate::errors::Result;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::reports::requests::ReportListQuery;
use crate::models::statistics::responses::GroupStatisticsResponse;
use crate::permissions::Action;
use crate::workflow::stats::group_statistics;

pub async fn get_group_statistics(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
) -> Result<GroupStatisticsResponse> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::ViewStatistics, None)?;

    let reports = ctx
        .storage
        .list_reports(ReportListQuery {
            group_id,
            ..Default::default()
        })
        .await?;
    let forms = ctx.storage.list_group_forms(group_id).await?;
    Ok(group_statistics(group_id, &reports, &forms))
}

pub struct StatisticsService;

impl StatisticsService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn get_group_statistics(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let stats = get_group_statistics(&ctx, user, group_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "查询成功")))
    }
}
