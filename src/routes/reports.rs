use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::current_user;
use crate::middlewares;
use crate::models::reports::requests::{
    RejectReportRequest, ReopenReportRequest, ReviewReportRequest,
};
use crate::services::ReportService;
use crate::utils::SafeIDI64;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn get_report(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    REPORT_SERVICE.get_report(&req, &user, path.0).await
}

// 审阅当前阶段
pub async fn review_report(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReviewReportRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    REPORT_SERVICE
        .review_report(&req, &user, path.0, body.into_inner())
        .await
}

// 驳回
pub async fn reject_report(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<RejectReportRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    REPORT_SERVICE
        .reject_report(&req, &user, path.0, body.into_inner())
        .await
}

// 重新打开（仅管理员）
pub async fn reopen_report(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReopenReportRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    REPORT_SERVICE
        .reopen_report(&req, &user, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_reports_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{id}").route(web::get().to(get_report)))
            .service(web::resource("/{id}/review").route(web::post().to(review_report)))
            .service(web::resource("/{id}/reject").route(web::post().to(reject_report)))
            .service(web::resource("/{id}/reopen").route(web::post().to(reopen_report))),
    );
}
