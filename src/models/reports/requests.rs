use serde::Deserialize;

use super::entities::ReportStage;
use crate::models::common::pagination::{
    PaginationQuery, default_page, default_size, deserialize_string_to_i64,
};

/// 审阅请求：写入当前阶段的评语，`complete` 为真时结束本阶段
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewReportRequest {
    pub comment: Option<String>,
    #[serde(default)]
    pub complete: bool,
}

/// 驳回请求，由审阅人明确指定退回的阶段
#[derive(Debug, Clone, Deserialize)]
pub struct RejectReportRequest {
    pub reason: String,
    pub target_stage: ReportStage,
}

/// 重新打开已完成的报告（仅管理员）
#[derive(Debug, Clone, Deserialize)]
pub struct ReopenReportRequest {
    pub target_stage: ReportStage,
}

/// 报告列表查询参数（HTTP 请求）
///
/// 含数值过滤字段，不能用 `flatten` 嵌入分页参数。
#[derive(Debug, Clone, Deserialize)]
pub struct ReportListParams {
    #[serde(default = "default_page", deserialize_with = "deserialize_string_to_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "deserialize_string_to_i64")]
    pub size: i64,
    pub form_id: Option<i64>,
    pub class_name: Option<String>,
    pub stage: Option<ReportStage>,
}

impl ReportListParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            size: self.size,
        }
    }
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct ReportListQuery {
    pub group_id: i64,
    pub form_id: Option<i64>,
    pub class_name: Option<String>,
    pub stage: Option<ReportStage>,
    pub responder_id: Option<i64>,
}
