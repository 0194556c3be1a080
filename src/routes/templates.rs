use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::current_user;
use crate::middlewares;
use crate::models::concept_templates::requests::CreateConceptTemplateRequest;
use crate::services::ConceptTemplateService;
use crate::utils::SafeIDI64;

static TEMPLATE_SERVICE: Lazy<ConceptTemplateService> =
    Lazy::new(ConceptTemplateService::new_lazy);

// 创建概念模板
pub async fn create_template(
    req: HttpRequest,
    body: web::Json<CreateConceptTemplateRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    TEMPLATE_SERVICE
        .create_template(&req, &user, body.into_inner())
        .await
}

pub async fn get_template(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    TEMPLATE_SERVICE.get_template(&req, &user, path.0).await
}

pub fn configure_templates_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/templates")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::post().to(create_template)))
            .service(web::resource("/{id}").route(web::get().to(get_template))),
    );
}
