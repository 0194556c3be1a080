//! 业务错误到 HTTP 响应的映射

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::errors::AcademyError;
use crate::models::{ApiResponse, ErrorCode};
use crate::workflow::FORM_IS_SENT;

impl AcademyError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            AcademyError::Validation(_) => StatusCode::BAD_REQUEST,
            AcademyError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AcademyError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AcademyError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AcademyError::NotFound(_) => StatusCode::NOT_FOUND,
            AcademyError::InvalidState(_) | AcademyError::Conflict(_) => StatusCode::CONFLICT,
            AcademyError::DependencyFailure(_) => StatusCode::FAILED_DEPENDENCY,
            AcademyError::CacheConnection(_)
            | AcademyError::DatabaseConfig(_)
            | AcademyError::DatabaseConnection(_)
            | AcademyError::DatabaseOperation(_)
            | AcademyError::Serialization(_)
            | AcademyError::StoragePluginNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AcademyError::Validation(_) => ErrorCode::BadRequest,
            AcademyError::InvalidFields(_) => ErrorCode::ValidationFailed,
            AcademyError::Authentication(_) => ErrorCode::Unauthorized,
            AcademyError::PermissionDenied(_) => ErrorCode::Forbidden,
            AcademyError::NotFound(_) => ErrorCode::NotFound,
            AcademyError::InvalidState(msg) if msg == FORM_IS_SENT => ErrorCode::FormIsSent,
            AcademyError::InvalidState(_) => ErrorCode::InvalidState,
            AcademyError::Conflict(_) => ErrorCode::Conflict,
            AcademyError::DependencyFailure(_) => ErrorCode::DependencyFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl ResponseError for AcademyError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            error!("{}", self.format_simple());
        }

        let mut builder = HttpResponse::build(self.http_status());
        match self {
            AcademyError::InvalidFields(fields) => builder.json(ApiResponse::error(
                self.error_code(),
                fields.clone(),
                "Validation failed",
            )),
            _ => builder.json(ApiResponse::error_empty(
                self.error_code(),
                self.public_message(),
            )),
        }
    }
}
