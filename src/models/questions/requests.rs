use serde::Deserialize;

use super::entities::{ConceptItemDraft, QuestionConfig, QuestionType, TextSubtype};

/// 完整题目输入（保存整个题目集时使用）
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionInput {
    pub id: Option<i64>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub question_text: String,
    pub config: QuestionConfig,
}

/// 新增题目请求
#[derive(Debug, Clone, Deserialize)]
pub struct AddQuestionRequest {
    pub question_type: QuestionType,
}

/// 局部更新题目
///
/// 题型相关字段必须属于（更新后的）题型，否则按字段报错。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionPatch {
    pub question_type: Option<QuestionType>,
    pub question_text: Option<String>,
    pub is_required: Option<bool>,
    // 文本题
    pub subtype: Option<TextSubtype>,
    pub max_length: Option<i32>,
    // 评分题
    pub rating_max: Option<i32>,
    pub rating_step: Option<i32>,
    // 选择题
    pub options: Option<Vec<String>>,
    pub multiple: Option<bool>,
    pub allow_other: Option<bool>,
    // 考试题
    pub total_questions: Option<i32>,
    pub exam_use_existing: Option<bool>,
    pub exam_concept_template_id: Option<i64>,
    pub exam_new_template_name: Option<String>,
    pub exam_concept_items: Option<Vec<ConceptItemDraft>>,
}

/// 调整题目顺序
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderQuestionRequest {
    pub from: usize,
    pub to: usize,
}

/// 整体替换题目集
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceQuestionsRequest {
    pub questions: Vec<QuestionInput>,
}
