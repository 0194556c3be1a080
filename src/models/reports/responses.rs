use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::{Report, ReportStage};
use crate::models::common::pagination::PaginationInfo;
use crate::models::groups::entities::Role;
use crate::permissions::{FieldAccessMode, can_access_form_field};

/// 按角色裁剪后的报告视图
///
/// 当前角色无权读取的字段为 `None`。
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub id: i64,
    pub form_id: i64,
    pub form_response_id: Option<i64>,
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    pub stage: ReportStage,
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub time_teacher_comment: Option<String>,
    pub teacher_comment: Option<String>,
    pub time_teacher_completed_at: Option<DateTime<Utc>>,
    pub teacher_completed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            form_id: report.form_id,
            form_response_id: report.form_response_id,
            student_name: report.student_name,
            class_name: report.class_name,
            stage: report.stage,
            time_teacher_id: report.time_teacher_id,
            teacher_id: report.teacher_id,
            time_teacher_comment: report.time_teacher_comment,
            teacher_comment: report.teacher_comment,
            time_teacher_completed_at: report.time_teacher_completed_at,
            teacher_completed_at: report.teacher_completed_at,
            rejected_at: report.rejected_at,
            rejection_reason: report.rejection_reason,
            updated_at: report.updated_at,
        }
    }
}

/// 报告列表响应
#[derive(Debug, Clone, Serialize)]
pub struct ReportListResponse {
    pub items: Vec<ReportView>,
    pub pagination: PaginationInfo,
}

impl ReportView {
    /// 按角色隐藏无权读取的评语
    pub fn for_role(report: Report, role: Role) -> Self {
        // 自己负责填写的字段总是返回，其余按读权限过滤
        let visible = |filled_by: Role| {
            can_access_form_field(role, filled_by, FieldAccessMode::Read)
                || can_access_form_field(role, filled_by, FieldAccessMode::Write)
        };
        let mut view = Self::from(report);
        if !visible(Role::PartTime) {
            view.time_teacher_comment = None;
        }
        if !visible(Role::Teacher) {
            view.teacher_comment = None;
        }
        view
    }
}
