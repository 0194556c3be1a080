use serde::Deserialize;

use super::entities::Answer;

/// 提交作答
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponseRequest {
    pub answers: Vec<Answer>,
}
