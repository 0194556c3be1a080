pub mod forms;
pub mod groups;
pub mod notifications;
pub mod reports;
pub mod templates;

use actix_web::{HttpRequest, Result as ActixResult};

use crate::errors::AcademyError;
use crate::middlewares::{CurrentUser, RequireJWT};

pub use forms::configure_forms_routes;
pub use groups::configure_groups_routes;
pub use notifications::configure_notifications_routes;
pub use reports::configure_reports_routes;
pub use templates::configure_templates_routes;

/// 取出中间件写入的当前用户
pub(crate) fn current_user(req: &HttpRequest) -> ActixResult<CurrentUser> {
    RequireJWT::extract_current_user(req)
        .ok_or_else(|| AcademyError::authentication("Unable to resolve the current user").into())
}
