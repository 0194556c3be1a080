use serde::{Deserialize, Serialize};

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    FormSent,
    ReportSubmitted,
    ReportStageCompleted,
    ReportRejected,
    ReportReopened,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::FormSent => "form_sent",
            NotificationType::ReportSubmitted => "report_submitted",
            NotificationType::ReportStageCompleted => "report_stage_completed",
            NotificationType::ReportRejected => "report_rejected",
            NotificationType::ReportReopened => "report_reopened",
        }
    }

    /// 默认标题
    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::FormSent => "A new form is waiting for you",
            NotificationType::ReportSubmitted => "A report is ready for review",
            NotificationType::ReportStageCompleted => "A report moved to the next stage",
            NotificationType::ReportRejected => "A report was sent back",
            NotificationType::ReportReopened => "A report was reopened",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "form_sent" => Ok(NotificationType::FormSent),
            "report_submitted" => Ok(NotificationType::ReportSubmitted),
            "report_stage_completed" => Ok(NotificationType::ReportStageCompleted),
            "report_rejected" => Ok(NotificationType::ReportRejected),
            "report_reopened" => Ok(NotificationType::ReportReopened),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

// 通知
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的通知
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub payload: serde_json::Value,
}
