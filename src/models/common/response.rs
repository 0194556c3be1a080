use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ErrorCode;

/// 所有接口共用的响应信封
///
/// 成功时 `code` 为 0；失败时 `data` 只在携带逐字段校验错误时出现。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    fn build(code: ErrorCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, Some(data), message)
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self::build(code, Some(data), message)
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success as i32
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, None, message)
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(code, None, message)
    }
}
