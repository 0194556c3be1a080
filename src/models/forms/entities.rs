use serde::{Deserialize, Serialize};

use crate::models::questions::entities::Question;
use crate::models::supervisions::entities::SupervisionAssignment;
use crate::workflow::question_set::TemplatePlan;

// 表单状态：draft -> save -> send，只能前进
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Draft,
    Save,
    Send,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Save => "save",
            FormStatus::Send => "send",
        }
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FormStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(FormStatus::Draft),
            "save" => Ok(FormStatus::Save),
            "send" => Ok(FormStatus::Send),
            _ => Err(format!("Invalid form status: {s}")),
        }
    }
}

// 表单
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Form {
    pub id: i64,
    pub group_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: FormStatus,
    pub supervision_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 表单接收对象
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormTarget {
    Class { class_id: i64 },
    User { user_id: i64 },
}

impl FormTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            FormTarget::Class { .. } => "class",
            FormTarget::User { .. } => "user",
        }
    }

    pub fn target_id(&self) -> i64 {
        match self {
            FormTarget::Class { class_id } => *class_id,
            FormTarget::User { user_id } => *user_id,
        }
    }

    pub fn from_parts(kind: &str, target_id: i64) -> Option<Self> {
        match kind {
            "class" => Some(FormTarget::Class {
                class_id: target_id,
            }),
            "user" => Some(FormTarget::User { user_id: target_id }),
            _ => None,
        }
    }
}

/// 新建表单
#[derive(Debug, Clone)]
pub struct NewForm {
    pub group_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// 创建表单时一次写入的全部内容
///
/// 表单、督导关系、骨架报告、初始题目及其新建模板在同一事务中落地。
#[derive(Debug, Clone)]
pub struct NewFormBundle {
    pub form: NewForm,
    pub supervision: SupervisionAssignment,
    pub questions: Vec<Question>,
    pub templates: Vec<TemplatePlan>,
}
