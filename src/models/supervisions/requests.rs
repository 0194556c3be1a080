use serde::Deserialize;

/// 指派督导请求
#[derive(Debug, Clone, Deserialize)]
pub struct AssignSupervisionRequest {
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
}
