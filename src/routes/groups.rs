use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::current_user;
use crate::middlewares;
use crate::models::forms::requests::FormListParams;
use crate::models::groups::requests::{
    CreateClassRequest, CreateGroupRequest, MemberListQuery, UpsertMemberRequest,
};
use crate::models::reports::requests::ReportListParams;
use crate::models::supervisions::requests::AssignSupervisionRequest;
use crate::services::{
    ConceptTemplateService, FormService, GroupService, ReportService, StatisticsService,
    SupervisionService,
};
use crate::utils::SafeIDI64;

static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);
static FORM_SERVICE: Lazy<FormService> = Lazy::new(FormService::new_lazy);
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);
static STATISTICS_SERVICE: Lazy<StatisticsService> = Lazy::new(StatisticsService::new_lazy);
static TEMPLATE_SERVICE: Lazy<ConceptTemplateService> =
    Lazy::new(ConceptTemplateService::new_lazy);
static SUPERVISION_SERVICE: Lazy<SupervisionService> = Lazy::new(SupervisionService::new_lazy);

// 当前用户所在的群组
pub async fn list_my_groups(req: HttpRequest) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    GROUP_SERVICE.list_my_groups(&req, &user).await
}

// 创建群组
pub async fn create_group(
    req: HttpRequest,
    body: web::Json<CreateGroupRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    GROUP_SERVICE
        .create_group(&req, &user, body.into_inner())
        .await
}

pub async fn get_group(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    GROUP_SERVICE.get_group(&req, &user, path.0).await
}

// 群组内的表单
pub async fn list_forms(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<FormListParams>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    FORM_SERVICE
        .list_forms(&req, &user, path.0, query.into_inner())
        .await
}

// 群组内的报告
pub async fn list_reports(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<ReportListParams>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    REPORT_SERVICE
        .list_reports(&req, &user, path.0, query.into_inner())
        .await
}

pub async fn get_statistics(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    STATISTICS_SERVICE
        .get_group_statistics(&req, &user, path.0)
        .await
}

pub async fn list_classes(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    GROUP_SERVICE.list_classes(&req, &user, path.0).await
}

pub async fn create_class(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    GROUP_SERVICE
        .create_class(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn list_members(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<MemberListQuery>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    GROUP_SERVICE
        .list_members(&req, &user, path.0, query.into_inner())
        .await
}

// 添加或更新成员
pub async fn upsert_member(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpsertMemberRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    GROUP_SERVICE
        .upsert_member(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    let (group_id, user_id) = path.into_inner();
    GROUP_SERVICE
        .remove_member(&req, &user, group_id, user_id)
        .await
}

pub async fn list_templates(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    TEMPLATE_SERVICE.list_templates(&req, &user, path.0).await
}

// 指派督导关系
pub async fn assign_supervision(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<AssignSupervisionRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    SUPERVISION_SERVICE
        .assign_supervision(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn get_supervision(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    SUPERVISION_SERVICE
        .get_supervision(&req, &user, path.0)
        .await
}

// 配置路由
pub fn configure_groups_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/groups")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_my_groups))
                    .route(web::post().to(create_group)),
            )
            .service(web::resource("/{id}").route(web::get().to(get_group)))
            .service(web::resource("/{id}/forms").route(web::get().to(list_forms)))
            .service(web::resource("/{id}/reports").route(web::get().to(list_reports)))
            .service(web::resource("/{id}/statistics").route(web::get().to(get_statistics)))
            .service(
                web::resource("/{id}/classes")
                    .route(web::get().to(list_classes))
                    .route(web::post().to(create_class)),
            )
            .service(
                web::resource("/{id}/members")
                    .route(web::get().to(list_members))
                    .route(web::put().to(upsert_member)),
            )
            .service(
                web::resource("/{id}/members/{user_id}").route(web::delete().to(remove_member)),
            )
            .service(web::resource("/{id}/templates").route(web::get().to(list_templates)))
            .service(
                web::resource("/{id}/supervisions").route(web::post().to(assign_supervision)),
            ),
    );
    cfg.service(
        web::scope("/api/v1/supervisions")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{id}").route(web::get().to(get_supervision))),
    );
}
