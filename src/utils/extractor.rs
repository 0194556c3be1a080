//! 路径参数提取器
//!
//! 非法 id 直接返回统一的错误响应，不进入处理函数。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 路径中的正整数 id（取第一个路径段参数）
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw?.parse::<i64>().ok().filter(|id| *id > 0)
}

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id");
        ready(match parse_id(raw) {
            Some(id) => Ok(SafeIDI64(id)),
            None => {
                let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "Invalid id in path",
                ));
                Err(InternalError::from_response("invalid id", response).into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some("12")), Some(12));
        assert_eq!(parse_id(Some("0")), None);
        assert_eq!(parse_id(Some("-3")), None);
        assert_eq!(parse_id(Some("x")), None);
        assert_eq!(parse_id(None), None);
    }
}
