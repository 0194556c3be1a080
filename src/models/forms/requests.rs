use serde::Deserialize;

use super::entities::{FormStatus, FormTarget};
use crate::models::common::pagination::PaginationQuery;
use crate::models::questions::requests::QuestionInput;

/// 创建表单请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFormRequest {
    pub group_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 一审兼职教师
    pub time_teacher_id: Option<i64>,
    /// 二审教师
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

/// 更新表单基本信息
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFormRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// 保存表单（提交完整题目集，状态变为 save）
#[derive(Debug, Clone, Deserialize)]
pub struct SaveFormRequest {
    pub questions: Vec<QuestionInput>,
}

/// 发送表单
#[derive(Debug, Clone, Deserialize)]
pub struct SendFormRequest {
    #[serde(default)]
    pub targets: Vec<FormTarget>,
}

/// 复制表单
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicateFormRequest {
    /// 是否在标题后追加复制后缀，默认追加
    pub append_suffix: Option<bool>,
}

/// 表单列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize)]
pub struct FormListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<FormStatus>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct FormListQuery {
    pub group_id: i64,
    pub page: u64,
    pub size: u64,
    pub status: Option<FormStatus>,
}
