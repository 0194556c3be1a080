pub mod edit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::AppContext;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::questions::requests::{
    AddQuestionRequest, QuestionPatch, ReorderQuestionRequest, ReplaceQuestionsRequest,
};

pub struct QuestionService;

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn add_question(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: AddQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let question = edit::add_question(&ctx, user, form_id, req.question_type).await?;
        Ok(HttpResponse::Created().json(ApiResponse::success(question, "题目已添加")))
    }

    pub async fn update_question(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        question_id: i64,
        patch: QuestionPatch,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let question = edit::update_question(&ctx, user, form_id, question_id, patch).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(question, "题目已更新")))
    }

    pub async fn delete_question(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let questions = edit::delete_question(&ctx, user, form_id, question_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(questions, "题目已删除")))
    }

    pub async fn reorder_questions(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: ReorderQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let questions = edit::reorder_questions(&ctx, user, form_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(questions, "题目顺序已更新")))
    }

    pub async fn replace_questions(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        form_id: i64,
        req: ReplaceQuestionsRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let questions = edit::replace_questions(&ctx, user, form_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(questions, "题目已保存")))
    }
}
