use serde::Deserialize;

use crate::models::questions::entities::ConceptItemDraft;

/// 单独创建概念模板
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConceptTemplateRequest {
    pub group_id: i64,
    pub name: String,
    pub concept_count: i32,
    pub items: Vec<ConceptItemDraft>,
}
