use serde::{Deserialize, Serialize};

// 督导关系：一审兼职教师与二审教师的组合
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupervisionMapping {
    pub id: i64,
    pub group_id: i64,
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SupervisionMapping {
    /// 自然键，唯一约束建立在此列上
    pub fn assignment_key(
        group_id: i64,
        time_teacher_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> String {
        fn part(id: Option<i64>) -> String {
            id.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
        }
        format!("{group_id}:{}:{}", part(time_teacher_id), part(teacher_id))
    }
}

/// 待指派的审阅人组合，两者都为空时不建立督导关系
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupervisionAssignment {
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

impl SupervisionAssignment {
    pub fn new(time_teacher_id: Option<i64>, teacher_id: Option<i64>) -> Self {
        Self {
            time_teacher_id,
            teacher_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.time_teacher_id.is_none() && self.teacher_id.is_none()
    }
}
