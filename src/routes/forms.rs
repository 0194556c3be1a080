use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::current_user;
use crate::middlewares;
use crate::models::forms::requests::{
    CreateFormRequest, DuplicateFormRequest, SaveFormRequest, SendFormRequest, UpdateFormRequest,
};
use crate::models::questions::requests::{
    AddQuestionRequest, QuestionPatch, ReorderQuestionRequest, ReplaceQuestionsRequest,
};
use crate::models::responses::requests::SubmitResponseRequest;
use crate::services::{FormService, QuestionService, ResponseService};
use crate::utils::SafeIDI64;

static FORM_SERVICE: Lazy<FormService> = Lazy::new(FormService::new_lazy);
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);
static RESPONSE_SERVICE: Lazy<ResponseService> = Lazy::new(ResponseService::new_lazy);

// 创建表单
pub async fn create_form(
    req: HttpRequest,
    body: web::Json<CreateFormRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    FORM_SERVICE
        .create_form(&req, &user, body.into_inner())
        .await
}

// 表单详情（含题目）
pub async fn get_form(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    FORM_SERVICE.get_form(&req, &user, path.0).await
}

pub async fn update_form(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateFormRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    FORM_SERVICE
        .update_form(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn delete_form(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    FORM_SERVICE.delete_form(&req, &user, path.0).await
}

// 保存整个题目集
pub async fn save_form(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<SaveFormRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    FORM_SERVICE
        .save_form(&req, &user, path.0, body.into_inner())
        .await
}

// 发送表单
pub async fn send_form(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<SendFormRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    FORM_SERVICE
        .send_form(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn duplicate_form(
    req: HttpRequest,
    path: SafeIDI64,
    body: Option<web::Json<DuplicateFormRequest>>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    FORM_SERVICE.duplicate_form(&req, &user, path.0, body).await
}

pub async fn add_question(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<AddQuestionRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    QUESTION_SERVICE
        .add_question(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn replace_questions(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReplaceQuestionsRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    QUESTION_SERVICE
        .replace_questions(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn reorder_questions(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReorderQuestionRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    QUESTION_SERVICE
        .reorder_questions(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn update_question(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<QuestionPatch>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    let (form_id, question_id) = path.into_inner();
    QUESTION_SERVICE
        .update_question(&req, &user, form_id, question_id, body.into_inner())
        .await
}

pub async fn delete_question(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    let (form_id, question_id) = path.into_inner();
    QUESTION_SERVICE
        .delete_question(&req, &user, form_id, question_id)
        .await
}

// 学生提交作答
pub async fn submit_response(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<SubmitResponseRequest>,
) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    RESPONSE_SERVICE
        .submit_response(&req, &user, path.0, body.into_inner())
        .await
}

pub async fn get_my_response(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user = current_user(&req)?;
    RESPONSE_SERVICE.get_my_response(&req, &user, path.0).await
}

// 配置路由
pub fn configure_forms_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/forms")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::post().to(create_form)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_form))
                    .route(web::put().to(update_form))
                    .route(web::delete().to(delete_form)),
            )
            .service(web::resource("/{id}/save").route(web::post().to(save_form)))
            .service(web::resource("/{id}/send").route(web::post().to(send_form)))
            .service(web::resource("/{id}/duplicate").route(web::post().to(duplicate_form)))
            .service(
                web::resource("/{id}/questions")
                    .route(web::post().to(add_question))
                    .route(web::put().to(replace_questions)),
            )
            .service(
                web::resource("/{id}/questions/reorder").route(web::post().to(reorder_questions)),
            )
            .service(
                web::resource("/{id}/questions/{question_id}")
                    .route(web::patch().to(update_question))
                    .route(web::delete().to(delete_question)),
            )
            .service(web::resource("/{id}/responses").route(web::post().to(submit_response)))
            .service(web::resource("/{id}/responses/me").route(web::get().to(get_my_response))),
    );
}
