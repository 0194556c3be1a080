pub mod common;
pub mod concept_templates;
pub mod forms;
pub mod groups;
pub mod notifications;
pub mod questions;
pub mod reports;
pub mod responses;
pub mod statistics;
pub mod supervisions;

pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

use serde::Serialize;

// 业务错误码
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    InternalServerError = 1006,
    DependencyFailed = 1007,
    InvalidState = 1008,
    // 表单
    FormIsSent = 3001,
}
