//! 请求参数解析失败时返回统一的响应结构

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON 参数解析失败 {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid request body: {err}"),
    ));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("查询参数解析失败 {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid query parameters: {err}"),
    ));
    InternalError::from_response(err, response).into()
}
