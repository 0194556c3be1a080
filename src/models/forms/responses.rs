use serde::Serialize;

use super::entities::{Form, FormTarget};
use crate::models::common::pagination::PaginationInfo;
use crate::models::questions::entities::Question;
use crate::models::reports::entities::Report;
use crate::models::supervisions::entities::SupervisionMapping;

/// 表单详情（含题目与接收对象）
#[derive(Debug, Clone, Serialize)]
pub struct FormWithQuestions {
    pub form: Form,
    pub questions: Vec<Question>,
    pub targets: Vec<FormTarget>,
}

/// 创建表单的完整结果
#[derive(Debug, Clone, Serialize)]
pub struct FormBundle {
    pub form: Form,
    pub questions: Vec<Question>,
    pub supervision: Option<SupervisionMapping>,
    pub report: Report,
}

/// 表单列表响应
#[derive(Debug, Clone, Serialize)]
pub struct FormListResponse {
    pub items: Vec<Form>,
    pub pagination: PaginationInfo,
}
