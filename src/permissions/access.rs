use serde::{Deserialize, Serialize};

use crate::models::groups::entities::Role;
use crate::models::reports::entities::ReportStage;

/// 表单字段的访问方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccessMode {
    Read,
    Write,
}

/// 报告阶段上的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageAction {
    Read,
    Write,
    Review,
}

/// 判断角色能否读写由 `filled_by` 角色填写的字段
pub fn can_access_form_field(role: Role, filled_by: Role, mode: FieldAccessMode) -> bool {
    if matches!(role, Role::Admin | Role::Teacher) {
        return true;
    }

    match mode {
        FieldAccessMode::Read => matches!(
            (role, filled_by),
            (Role::PartTime, Role::Student) | (Role::Student, Role::Student)
        ),
        FieldAccessMode::Write => role == filled_by,
    }
}

/// 判断角色在某个阶段能否执行给定操作
pub fn can_access_report_stage(role: Role, stage: ReportStage, action: StageAction) -> bool {
    if role == Role::Admin {
        return true;
    }

    match stage {
        ReportStage::AwaitingStudent | ReportStage::Completed => action == StageAction::Read,
        ReportStage::AwaitingPartTime => action == StageAction::Read || role == Role::PartTime,
        ReportStage::AwaitingTeacher => action == StageAction::Read || role == Role::Teacher,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_one_is_written_by_part_time_only() {
        assert!(can_access_report_stage(
            Role::PartTime,
            ReportStage::AwaitingPartTime,
            StageAction::Write
        ));
        assert!(!can_access_report_stage(
            Role::Teacher,
            ReportStage::AwaitingPartTime,
            StageAction::Write
        ));
        assert!(can_access_report_stage(
            Role::Teacher,
            ReportStage::AwaitingPartTime,
            StageAction::Read
        ));
    }

    #[test]
    fn test_stage_two_is_reviewed_by_teacher() {
        assert!(can_access_report_stage(
            Role::Teacher,
            ReportStage::AwaitingTeacher,
            StageAction::Review
        ));
        assert!(!can_access_report_stage(
            Role::PartTime,
            ReportStage::AwaitingTeacher,
            StageAction::Review
        ));
    }

    #[test]
    fn test_terminal_and_initial_stages_are_read_only() {
        for role in [Role::Teacher, Role::PartTime, Role::Student] {
            for stage in [ReportStage::AwaitingStudent, ReportStage::Completed] {
                assert!(can_access_report_stage(role, stage, StageAction::Read));
                assert!(!can_access_report_stage(role, stage, StageAction::Write));
                assert!(!can_access_report_stage(role, stage, StageAction::Review));
            }
        }
        assert!(can_access_report_stage(
            Role::Admin,
            ReportStage::Completed,
            StageAction::Write
        ));
    }

    #[test]
    fn test_form_field_access() {
        use FieldAccessMode::{Read, Write};

        assert!(can_access_form_field(Role::Teacher, Role::PartTime, Write));
        assert!(can_access_form_field(Role::Admin, Role::Student, Write));

        assert!(can_access_form_field(Role::PartTime, Role::Student, Read));
        assert!(!can_access_form_field(Role::PartTime, Role::Student, Write));
        assert!(!can_access_form_field(Role::PartTime, Role::PartTime, Read));
        assert!(can_access_form_field(Role::PartTime, Role::PartTime, Write));
        assert!(!can_access_form_field(Role::PartTime, Role::Teacher, Read));

        assert!(can_access_form_field(Role::Student, Role::Student, Read));
        assert!(can_access_form_field(Role::Student, Role::Student, Write));
        assert!(!can_access_form_field(Role::Student, Role::PartTime, Read));
        assert!(!can_access_form_field(Role::Student, Role::Teacher, Read));
    }
}
