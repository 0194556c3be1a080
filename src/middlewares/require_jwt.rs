/*!
 * JWT 认证中间件
 *
 * 校验外部身份服务签发的 Bearer 令牌，通过后把 `CurrentUser` 放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/forms")
 *     .wrap(RequireJWT)
 *     .route("/{id}", web::get().to(get_form))
 *
 * async fn get_form(req: HttpRequest) -> Result<HttpResponse> {
 *     let user = RequireJWT::extract_current_user(&req);
 *     // ...
 * }
 * ```
 *
 * 令牌缺失、签名错误、过期或 `sub` 不是数字时返回 401。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;
use crate::models::ErrorCode;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// 已认证的当前用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
}

#[derive(Clone)]
pub struct RequireJWT;

// 辅助函数：提取并验证 JWT
fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<CurrentUser, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    Ok(CurrentUser {
        id,
        name: claims.name.unwrap_or_else(|| format!("user-{id}")),
    })
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req) {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户，只在挂了 RequireJWT 的路由中有值
    pub fn extract_current_user(req: &actix_web::HttpRequest) -> Option<CurrentUser> {
        req.extensions().get::<CurrentUser>().cloned()
    }
}
