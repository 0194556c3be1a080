use serde::Serialize;

use super::entities::FormResponse;
use crate::models::reports::responses::ReportView;

/// 提交作答的结果
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub response: FormResponse,
    pub report: ReportView,
}
