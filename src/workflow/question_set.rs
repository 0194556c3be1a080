//! 考试题的概念模板依赖
//!
//! 新建模板的考试题在写入前必须先落地模板，再把题目改为引用该模板。

use crate::models::concept_templates::entities::{
    ConceptItem, ConceptTemplate, NewConceptTemplate, TemplateStatus,
};
use crate::models::questions::entities::{ExamTemplateRef, Question, QuestionConfig};

pub const FALLBACK_TEMPLATE_NAME: &str = "Concept template";

/// 需要先创建的模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePlan {
    /// 题目在题目集中的位置
    pub question_index: usize,
    pub template: NewConceptTemplate,
}

/// 找出需要新建模板的考试题（至少一个非空条目）
pub fn plan_exam_templates(
    questions: &[Question],
    group_id: i64,
    creator_id: i64,
) -> Vec<TemplatePlan> {
    questions
        .iter()
        .enumerate()
        .filter_map(|(index, question)| {
            let QuestionConfig::Exam {
                total_questions,
                template: ExamTemplateRef::New { name, items },
            } = &question.config
            else {
                return None;
            };

            let items: Vec<ConceptItem> = items
                .iter()
                .filter(|item| !item.text.trim().is_empty())
                .enumerate()
                .map(|(position, item)| ConceptItem {
                    text: item.text.trim().to_string(),
                    description: item.description.clone(),
                    order_index: position as i32,
                })
                .collect();
            if items.is_empty() {
                return None;
            }

            let name = [name.trim(), question.question_text.trim()]
                .into_iter()
                .find(|n| !n.is_empty())
                .unwrap_or(FALLBACK_TEMPLATE_NAME)
                .to_string();

            Some(TemplatePlan {
                question_index: index,
                template: NewConceptTemplate {
                    name,
                    group_id,
                    creator_id,
                    concept_count: *total_questions,
                    status: TemplateStatus::Completed,
                    items,
                },
            })
        })
        .collect()
}

/// 将题目改为引用已存在的模板
pub fn bind_template(question: &mut Question, template_id: i64) {
    if let QuestionConfig::Exam { template, .. } = &mut question.config {
        *template = ExamTemplateRef::Existing { template_id };
    }
}

/// 题目引用的已有模板 id
pub fn referenced_templates(questions: &[Question]) -> Vec<i64> {
    let mut ids: Vec<i64> = questions
        .iter()
        .filter_map(|q| match &q.config {
            QuestionConfig::Exam { template, .. } => template.template_id(),
            _ => None,
        })
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// 复制表单时复制模板，避免新旧表单共享同一行
pub fn copy_template(
    source: &ConceptTemplate,
    group_id: i64,
    creator_id: i64,
) -> NewConceptTemplate {
    NewConceptTemplate {
        name: source.name.clone(),
        group_id,
        creator_id,
        concept_count: source.concept_count,
        status: source.status,
        items: source.items.clone(),
    }
}
