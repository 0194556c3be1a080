//! 概念模板：考试题引用的概念条目集合

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::context::{AppContext, ensure_permission};
use crate::errors::{AcademyError, FieldError, Result};
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::concept_templates::{
    entities::{ConceptItem, ConceptTemplate, NewConceptTemplate, TemplateStatus},
    requests::CreateConceptTemplateRequest,
};
use crate::permissions::Action;

pub async fn create_concept_template(
    ctx: &AppContext,
    user: &CurrentUser,
    req: CreateConceptTemplateRequest,
) -> Result<ConceptTemplate> {
    let actor = ctx.actor(req.group_id, user.id).await?;
    ensure_permission(actor, Action::CreateTemplate, None)?;

    let items: Vec<ConceptItem> = req
        .items
        .into_iter()
        .filter(|item| !item.text.trim().is_empty())
        .enumerate()
        .map(|(i, item)| ConceptItem {
            text: item.text.trim().to_string(),
            description: item.description,
            order_index: i as i32,
        })
        .collect();

    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError::new("name", "must not be empty"));
    }
    if req.concept_count <= 0 {
        errors.push(FieldError::new("concept_count", "must be a positive number"));
    }
    if items.is_empty() {
        errors.push(FieldError::new("items", "at least one concept item is required"));
    }
    if !errors.is_empty() {
        return Err(AcademyError::InvalidFields(errors));
    }

    let template = ctx
        .storage
        .create_concept_template(NewConceptTemplate {
            name: req.name.trim().to_string(),
            group_id: req.group_id,
            creator_id: user.id,
            concept_count: req.concept_count,
            status: TemplateStatus::Completed,
            items,
        })
        .await?;
    info!("群组 {} 新建概念模板 {}", template.group_id, template.id);
    Ok(template)
}

pub async fn list_concept_templates(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
) -> Result<Vec<ConceptTemplate>> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::ViewTemplate, None)?;
    ctx.storage.list_concept_templates(group_id).await
}

pub async fn get_concept_template(
    ctx: &AppContext,
    user: &CurrentUser,
    template_id: i64,
) -> Result<ConceptTemplate> {
    let template = ctx
        .storage
        .get_concept_template(template_id)
        .await?
        .ok_or_else(|| AcademyError::not_found("Concept template not found"))?;
    let actor = ctx.actor(template.group_id, user.id).await?;
    ensure_permission(actor, Action::ViewTemplate, None)?;
    Ok(template)
}

pub struct ConceptTemplateService;

impl ConceptTemplateService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn create_template(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        req: CreateConceptTemplateRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let template = create_concept_template(&ctx, user, req).await?;
        Ok(HttpResponse::Created().json(ApiResponse::success(template, "模板创建成功")))
    }

    pub async fn list_templates(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let templates = list_concept_templates(&ctx, user, group_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(templates, "查询成功")))
    }

    pub async fn get_template(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        template_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let template = get_concept_template(&ctx, user, template_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(template, "查询成功")))
    }
}
