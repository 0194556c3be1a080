pub mod detail;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::AppContext;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::reports::requests::{
    RejectReportRequest, ReopenReportRequest, ReportListParams, ReviewReportRequest,
};

pub struct ReportService;

impl ReportService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn list_reports(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
        params: ReportListParams,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let reports = detail::list_reports(&ctx, user, group_id, params).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(reports, "查询成功")))
    }

    pub async fn get_report(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        report_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let report = detail::get_report(&ctx, user, report_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(report, "查询成功")))
    }

    pub async fn review_report(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        report_id: i64,
        req: ReviewReportRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let report = review::review_report(&ctx, user, report_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(report, "审阅已保存")))
    }

    pub async fn reject_report(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        report_id: i64,
        req: RejectReportRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let report = review::reject_report(&ctx, user, report_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(report, "报告已驳回")))
    }

    pub async fn reopen_report(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        report_id: i64,
        req: ReopenReportRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let report = review::reopen_report(&ctx, user, report_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(report, "报告已重新打开")))
    }
}
