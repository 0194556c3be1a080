use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::current_user;
use crate::middlewares;
use crate::services::NotificationService;
use crate::services::notifications::NotificationListQuery;
use crate::utils::SafeIDI64;

static NOTIFICATION_SERVICE: Lazy<NotificationService> = Lazy::new(NotificationService::new_lazy);

pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListQuery>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    NOTIFICATION_SERVICE
        .list_notifications(&req, &user, query.into_inner())
        .await
}

pub async fn mark_read(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    NOTIFICATION_SERVICE.mark_read(&req, &user, path.0).await
}

pub fn configure_notifications_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_notifications)))
            .service(web::resource("/{id}/read").route(web::post().to(mark_read))),
    );
}
