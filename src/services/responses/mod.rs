pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::AppContext;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::responses::requests::SubmitResponseRequest;

pub struct ResponseService;

impl ResponseService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn submit_response(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: SubmitResponseRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let result = submit::submit_response(&ctx, user, form_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(result, "提交成功")))
    }

    pub async fn get_my_response(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let response = submit::get_my_response(&ctx, user, form_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
    }
}
