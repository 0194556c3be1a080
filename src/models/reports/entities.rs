use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 报告审阅阶段
///
/// `Completed` 是终态，不参与阶段编号比较之外的数值运算。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportStage {
    #[serde(rename = "stage_0")]
    AwaitingStudent,
    #[serde(rename = "stage_1")]
    AwaitingPartTime,
    #[serde(rename = "stage_2")]
    AwaitingTeacher,
    #[serde(rename = "completed")]
    Completed,
}

impl ReportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStage::AwaitingStudent => "stage_0",
            ReportStage::AwaitingPartTime => "stage_1",
            ReportStage::AwaitingTeacher => "stage_2",
            ReportStage::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ReportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stage_0" => Ok(ReportStage::AwaitingStudent),
            "stage_1" => Ok(ReportStage::AwaitingPartTime),
            "stage_2" => Ok(ReportStage::AwaitingTeacher),
            "completed" => Ok(ReportStage::Completed),
            _ => Err(format!("Invalid report stage: {s}")),
        }
    }
}

// 报告
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub id: i64,
    pub group_id: i64,
    pub form_id: i64,
    pub form_response_id: Option<i64>,
    pub responder_id: Option<i64>,
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    pub stage: ReportStage,
    pub supervision_id: Option<i64>,
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub time_teacher_comment: Option<String>,
    pub teacher_comment: Option<String>,
    pub time_teacher_completed_at: Option<DateTime<Utc>>,
    pub teacher_completed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<i64>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待写入的报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub group_id: i64,
    pub form_id: i64,
    pub form_response_id: Option<i64>,
    pub responder_id: Option<i64>,
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    pub stage: ReportStage,
    pub supervision_id: Option<i64>,
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

impl NewReport {
    /// 随表单创建的骨架报告
    pub fn skeleton(
        group_id: i64,
        form_id: i64,
        supervision_id: Option<i64>,
        time_teacher_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Self {
        Self {
            group_id,
            form_id,
            form_response_id: None,
            responder_id: None,
            student_name: None,
            class_name: None,
            stage: ReportStage::AwaitingStudent,
            supervision_id,
            time_teacher_id,
            teacher_id,
        }
    }
}

/// 提交作答时对报告的写入
///
/// 报告的 `form_response_id` 以同一事务中写入的作答为准。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportWrite {
    /// 更新已有报告（认领骨架报告或重新提交），要求阶段仍为 `expected`
    Update {
        report: Box<Report>,
        expected: ReportStage,
    },
    /// 新建报告
    Create(NewReport),
}
