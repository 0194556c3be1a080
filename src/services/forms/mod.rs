pub mod create;
pub mod delete;
pub mod detail;
pub mod duplicate;
pub mod recipients;
pub mod send;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::AppContext;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::forms::requests::{
    CreateFormRequest, DuplicateFormRequest, FormListParams, SaveFormRequest, SendFormRequest,
    UpdateFormRequest,
};

pub struct FormService;

impl FormService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn create_form(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        req: CreateFormRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let bundle = create::create_form(&ctx, user, req).await?;
        Ok(HttpResponse::Created().json(ApiResponse::success(bundle, "表单创建成功")))
    }

    pub async fn list_forms(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
        params: FormListParams,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let forms = detail::list_forms(&ctx, user, group_id, params).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(forms, "查询成功")))
    }

    pub async fn get_form(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let form = detail::get_form_with_questions(&ctx, user, form_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(form, "查询成功")))
    }

    pub async fn update_form(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: UpdateFormRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let form = update::update_form(&ctx, user, form_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(form, "表单更新成功")))
    }

    pub async fn save_form(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: SaveFormRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let form = update::save_form(&ctx, user, form_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(form, "表单已保存")))
    }

    pub async fn send_form(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: SendFormRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let form = send::send_form(&ctx, user, form_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(form, "表单已发送")))
    }

    pub async fn duplicate_form(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: DuplicateFormRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let bundle = duplicate::duplicate_form(&ctx, user, form_id, req).await?;
        Ok(HttpResponse::Created().json(ApiResponse::success(bundle, "表单复制成功")))
    }

    pub async fn delete_form(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        delete::delete_form(&ctx, user, form_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("表单删除成功")))
    }
}
