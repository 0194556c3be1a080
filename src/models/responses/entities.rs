use serde::{Deserialize, Serialize};

/// 选择题“其他”选项的保留值
pub const OTHER_OPTION: &str = "__other__";

/// 考试题的单条作答，`number` 对应概念模板条目编号（从 1 开始）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamEntry {
    pub number: i32,
    #[serde(default)]
    pub answer: String,
}

/// 作答值，与题型一一对应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerValue {
    Text {
        text: String,
    },
    Rating {
        value: i32,
    },
    Choice {
        selected: Vec<String>,
        #[serde(default)]
        other_text: Option<String>,
    },
    Exam {
        entries: Vec<ExamEntry>,
    },
}

impl AnswerValue {
    /// 是否为空作答（用于必答校验）
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text { text } => text.trim().is_empty(),
            AnswerValue::Rating { .. } => false,
            AnswerValue::Choice { selected, .. } => selected.is_empty(),
            AnswerValue::Exam { entries } => entries.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    pub question_id: i64,
    pub value: AnswerValue,
}

// 表单作答
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormResponse {
    pub id: i64,
    pub form_id: i64,
    pub responder_id: i64,
    pub answers: Vec<Answer>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的作答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFormResponse {
    pub form_id: i64,
    pub responder_id: i64,
    pub answers: Vec<Answer>,
}
