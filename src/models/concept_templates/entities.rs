use serde::{Deserialize, Serialize};

// 概念模板状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatus {
    Draft,
    Completed,
}

impl std::fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateStatus::Draft => write!(f, "draft"),
            TemplateStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TemplateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TemplateStatus::Draft),
            "completed" => Ok(TemplateStatus::Completed),
            _ => Err(format!("Invalid template status: {s}")),
        }
    }
}

// 模板条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptItem {
    pub text: String,
    pub description: String,
    pub order_index: i32,
}

// 概念模板
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptTemplate {
    pub id: i64,
    pub name: String,
    pub group_id: i64,
    pub creator_id: i64,
    pub concept_count: i32,
    pub status: TemplateStatus,
    pub items: Vec<ConceptItem>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的概念模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConceptTemplate {
    pub name: String,
    pub group_id: i64,
    pub creator_id: i64,
    pub concept_count: i32,
    pub status: TemplateStatus,
    pub items: Vec<ConceptItem>,
}
