//! 题目类型系统
//!
//! 每种题型只携带自己的配置，题型切换时整体替换配置，不会残留其他题型的字段。

use serde::{Deserialize, Serialize};

/// 题型标签
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Rating,
    Choice,
    Exam,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Rating => "rating",
            QuestionType::Choice => "choice",
            QuestionType::Exam => "exam",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(QuestionType::Text),
            "rating" => Ok(QuestionType::Rating),
            "choice" => Ok(QuestionType::Choice),
            "exam" => Ok(QuestionType::Exam),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

/// 文本题的展示形式，仅影响前端输入框，不约束内容
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextSubtype {
    #[default]
    Text,
    Textarea,
}

/// 新建概念模板时随题目提交的条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ConceptItemDraft {
    pub text: String,
    #[serde(default)]
    pub description: String,
}

/// 考试题引用的概念模板：复用已有模板，或随表单保存时新建
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExamTemplateRef {
    Existing {
        template_id: i64,
    },
    New {
        name: String,
        items: Vec<ConceptItemDraft>,
    },
}

impl ExamTemplateRef {
    pub fn use_existing(&self) -> bool {
        matches!(self, ExamTemplateRef::Existing { .. })
    }

    pub fn template_id(&self) -> Option<i64> {
        match self {
            ExamTemplateRef::Existing { template_id } => Some(*template_id),
            ExamTemplateRef::New { .. } => None,
        }
    }
}

/// 题型配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionConfig {
    Text {
        subtype: TextSubtype,
        max_length: i32,
    },
    Rating {
        rating_max: i32,
        rating_step: i32,
    },
    Choice {
        options: Vec<String>,
        multiple: bool,
        allow_other: bool,
    },
    Exam {
        total_questions: i32,
        template: ExamTemplateRef,
    },
}

impl QuestionConfig {
    pub const DEFAULT_MAX_LENGTH: i32 = 100;
    pub const DEFAULT_RATING_MAX: i32 = 5;
    pub const DEFAULT_RATING_STEP: i32 = 1;
    pub const DEFAULT_EXAM_TOTAL: i32 = 10;

    /// 新建题目时各题型的默认配置
    pub fn default_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Text => QuestionConfig::Text {
                subtype: TextSubtype::Text,
                max_length: Self::DEFAULT_MAX_LENGTH,
            },
            QuestionType::Rating => QuestionConfig::Rating {
                rating_max: Self::DEFAULT_RATING_MAX,
                rating_step: Self::DEFAULT_RATING_STEP,
            },
            QuestionType::Choice => QuestionConfig::Choice {
                options: vec![String::new()],
                multiple: false,
                allow_other: false,
            },
            QuestionType::Exam => QuestionConfig::Exam {
                total_questions: Self::DEFAULT_EXAM_TOTAL,
                template: ExamTemplateRef::New {
                    name: String::new(),
                    items: Vec::new(),
                },
            },
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionConfig::Text { .. } => QuestionType::Text,
            QuestionConfig::Rating { .. } => QuestionType::Rating,
            QuestionConfig::Choice { .. } => QuestionType::Choice,
            QuestionConfig::Exam { .. } => QuestionType::Exam,
        }
    }
}

/// 题目
///
/// `id` 为空表示尚未持久化的新题目。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: Option<i64>,
    pub form_id: i64,
    pub order_index: i32,
    pub is_required: bool,
    pub question_text: String,
    pub config: QuestionConfig,
}

impl Question {
    pub fn new(form_id: i64, order_index: i32, question_type: QuestionType) -> Self {
        Self {
            id: None,
            form_id,
            order_index,
            is_required: false,
            question_text: String::new(),
            config: QuestionConfig::default_for(question_type),
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.config.question_type()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
