//! 报告实体

use sea_orm::entity::prelude::*;

use crate::errors::AcademyError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    pub form_id: i64,
    pub form_response_id: Option<i64>,
    pub responder_id: Option<i64>,
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    pub stage: String,
    pub supervision_id: Option<i64>,
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub time_teacher_comment: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_comment: Option<String>,
    pub time_teacher_completed_at: Option<i64>,
    pub teacher_completed_at: Option<i64>,
    pub rejected_at: Option<i64>,
    pub rejected_by: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forms::Entity",
        from = "Column::FormId",
        to = "super::forms::Column::Id"
    )]
    Form,
}

impl Related<super::forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 阶段无法识别时报错，避免把损坏的数据当作初始阶段继续流转
    pub fn into_report(
        self,
    ) -> crate::errors::Result<crate::models::reports::entities::Report> {
        use crate::models::reports::entities::{Report, ReportStage};

        let stage = self
            .stage
            .parse::<ReportStage>()
            .map_err(AcademyError::database_operation)?;

        Ok(Report {
            id: self.id,
            group_id: self.group_id,
            form_id: self.form_id,
            form_response_id: self.form_response_id,
            responder_id: self.responder_id,
            student_name: self.student_name,
            class_name: self.class_name,
            stage,
            supervision_id: self.supervision_id,
            time_teacher_id: self.time_teacher_id,
            teacher_id: self.teacher_id,
            time_teacher_comment: self.time_teacher_comment,
            teacher_comment: self.teacher_comment,
            time_teacher_completed_at: super::to_optional_datetime(self.time_teacher_completed_at),
            teacher_completed_at: super::to_optional_datetime(self.teacher_completed_at),
            rejected_at: super::to_optional_datetime(self.rejected_at),
            rejected_by: self.rejected_by,
            rejection_reason: self.rejection_reason,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reports::entities::ReportStage;

    fn row(stage: &str) -> Model {
        Model {
            id: 9,
            group_id: 1,
            form_id: 3,
            form_response_id: None,
            responder_id: Some(4),
            student_name: Some("Lin".into()),
            class_name: None,
            stage: stage.into(),
            supervision_id: Some(2),
            time_teacher_id: Some(3),
            teacher_id: None,
            time_teacher_comment: None,
            teacher_comment: None,
            time_teacher_completed_at: Some(1_700_000_000),
            teacher_completed_at: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_into_report_parses_stage() {
        let report = row("stage_1").into_report().unwrap();
        assert_eq!(report.stage, ReportStage::AwaitingPartTime);
        assert!(report.time_teacher_completed_at.is_some());
        assert!(report.teacher_completed_at.is_none());
    }

    #[test]
    fn test_into_report_rejects_unknown_stage() {
        let err = row("stage_9").into_report().unwrap_err();
        assert!(matches!(err, AcademyError::DatabaseOperation(_)));
    }
}
