//! 报告阶段流转
//!
//! stage_0（待学生提交）-> stage_1（兼职教师一审）-> stage_2（教师二审）-> completed。
//! 所有流转都在内存中的完整报告上进行，调用方负责整体写回。

use chrono::{DateTime, Utc};

use crate::errors::{AcademyError, Result};
use crate::models::groups::entities::Role;
use crate::models::reports::entities::{Report, ReportStage};
use crate::permissions::{
    Action, StageAction, can_access_report_stage, permission_error_message,
};

/// 当前操作人
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// 学生提交信息
#[derive(Debug, Clone)]
pub struct Submission {
    pub responder_id: i64,
    pub form_response_id: i64,
    pub student_name: String,
    pub class_name: Option<String>,
}

/// 阶段对应的审阅动作
pub fn review_action(stage: ReportStage) -> Option<Action> {
    match stage {
        ReportStage::AwaitingPartTime => Some(Action::UpdateReportStage1),
        ReportStage::AwaitingTeacher => Some(Action::UpdateReportStage2),
        _ => None,
    }
}

fn stage_access(actor: Actor, stage: ReportStage, action: StageAction) -> Result<()> {
    if can_access_report_stage(actor.role, stage, action) {
        return Ok(());
    }
    let message = review_action(stage)
        .map(permission_error_message)
        .unwrap_or_else(|| permission_error_message(Action::UpdateReportStage1));
    Err(AcademyError::permission_denied(message))
}

/// 报告上指派的审阅人必须是当前操作人（管理员除外）
fn ensure_assigned(report: &Report, actor: Actor) -> Result<()> {
    if actor.role == Role::Admin {
        return Ok(());
    }
    let assigned = match report.stage {
        ReportStage::AwaitingPartTime => report.time_teacher_id,
        ReportStage::AwaitingTeacher => report.teacher_id,
        _ => None,
    };
    match assigned {
        Some(id) if id != actor.user_id => Err(AcademyError::permission_denied(
            "This report is assigned to another reviewer",
        )),
        _ => Ok(()),
    }
}

fn ensure_under_review(report: &Report) -> Result<()> {
    match report.stage {
        ReportStage::AwaitingPartTime | ReportStage::AwaitingTeacher => Ok(()),
        ReportStage::AwaitingStudent => Err(AcademyError::invalid_state(
            "Report is waiting for the student's response",
        )),
        ReportStage::Completed => Err(AcademyError::invalid_state("Report is already completed")),
    }
}

/// 学生提交作答：stage_0 -> stage_1
pub fn submit(report: &mut Report, submission: Submission, now: DateTime<Utc>) -> Result<()> {
    if report.stage != ReportStage::AwaitingStudent {
        return Err(AcademyError::invalid_state(
            "Report has already been submitted",
        ));
    }
    if let Some(responder) = report.responder_id
        && responder != submission.responder_id
    {
        return Err(AcademyError::permission_denied(permission_error_message(
            Action::RespondForm,
        )));
    }

    report.responder_id = Some(submission.responder_id);
    report.form_response_id = Some(submission.form_response_id);
    report.student_name = Some(submission.student_name);
    report.class_name = submission.class_name;
    report.stage = ReportStage::AwaitingPartTime;
    report.updated_at = now;
    Ok(())
}

/// 写入当前阶段的评语
pub fn write_comment(
    report: &mut Report,
    actor: Actor,
    comment: String,
    now: DateTime<Utc>,
) -> Result<()> {
    ensure_under_review(report)?;
    stage_access(actor, report.stage, StageAction::Write)?;
    ensure_assigned(report, actor)?;

    match report.stage {
        ReportStage::AwaitingPartTime => report.time_teacher_comment = Some(comment),
        ReportStage::AwaitingTeacher => report.teacher_comment = Some(comment),
        _ => {}
    }
    report.updated_at = now;
    Ok(())
}

/// 结束当前阶段，返回新的阶段
pub fn complete_stage(
    report: &mut Report,
    actor: Actor,
    now: DateTime<Utc>,
) -> Result<ReportStage> {
    ensure_under_review(report)?;
    stage_access(actor, report.stage, StageAction::Review)?;
    ensure_assigned(report, actor)?;

    match report.stage {
        ReportStage::AwaitingPartTime => {
            report.time_teacher_completed_at = Some(now);
            report.stage = ReportStage::AwaitingTeacher;
        }
        ReportStage::AwaitingTeacher => {
            if report.time_teacher_completed_at.is_none() {
                return Err(AcademyError::invalid_state(
                    "First review must be completed before the second",
                ));
            }
            report.teacher_completed_at = Some(now);
            report.stage = ReportStage::Completed;
        }
        _ => {}
    }
    report.updated_at = now;
    Ok(report.stage)
}

/// 审阅：可选写入评语，`complete` 为真时结束本阶段
///
/// 返回流转后的阶段；评语与结束一起生效或一起失败。
pub fn review(
    report: &mut Report,
    actor: Actor,
    comment: Option<String>,
    complete: bool,
    now: DateTime<Utc>,
) -> Result<ReportStage> {
    let mut updated = report.clone();
    if let Some(comment) = comment {
        write_comment(&mut updated, actor, comment, now)?;
    }
    if complete {
        complete_stage(&mut updated, actor, now)?;
    } else {
        ensure_under_review(&updated)?;
        stage_access(actor, updated.stage, StageAction::Write)?;
        ensure_assigned(&updated, actor)?;
    }
    *report = updated;
    Ok(report.stage)
}

/// 清除目标阶段及之后的完成时间
fn clear_completions_from(report: &mut Report, target: ReportStage) {
    if target <= ReportStage::AwaitingPartTime {
        report.time_teacher_completed_at = None;
    }
    if target <= ReportStage::AwaitingTeacher {
        report.teacher_completed_at = None;
    }
}

/// 驳回到更早的阶段
pub fn reject(
    report: &mut Report,
    actor: Actor,
    reason: String,
    target: ReportStage,
    now: DateTime<Utc>,
) -> Result<()> {
    ensure_under_review(report)?;
    stage_access(actor, report.stage, StageAction::Review)?;
    ensure_assigned(report, actor)?;

    if reason.trim().is_empty() {
        return Err(AcademyError::invalid_field("reason", "must not be empty"));
    }
    if target >= report.stage {
        return Err(AcademyError::invalid_field(
            "target_stage",
            format!("must be earlier than {}", report.stage),
        ));
    }

    clear_completions_from(report, target);
    report.stage = target;
    report.rejected_at = Some(now);
    report.rejected_by = Some(actor.user_id);
    report.rejection_reason = Some(reason);
    report.updated_at = now;
    Ok(())
}

/// 管理员重新打开已完成的报告
pub fn reopen(
    report: &mut Report,
    actor: Actor,
    target: ReportStage,
    now: DateTime<Utc>,
) -> Result<()> {
    if actor.role != Role::Admin {
        return Err(AcademyError::permission_denied(permission_error_message(
            Action::ReopenReport,
        )));
    }
    if report.stage != ReportStage::Completed {
        return Err(AcademyError::invalid_state("Only completed reports can be reopened"));
    }
    if !matches!(
        target,
        ReportStage::AwaitingPartTime | ReportStage::AwaitingTeacher
    ) {
        return Err(AcademyError::invalid_field(
            "target_stage",
            "must be stage_1 or stage_2",
        ));
    }

    clear_completions_from(report, target);
    report.stage = target;
    report.updated_at = now;
    Ok(())
}

/// 教师完成时间不能早于兼职教师完成时间出现
pub fn completion_order_holds(report: &Report) -> bool {
    !(report.teacher_completed_at.is_some() && report.time_teacher_completed_at.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const STUDENT: i64 = 100;
    const PART_TIME: i64 = 200;
    const TEACHER: i64 = 300;
    const ADMIN: i64 = 1;

    fn report() -> Report {
        let now = Utc::now();
        Report {
            id: 1,
            group_id: 1,
            form_id: 1,
            form_response_id: None,
            responder_id: None,
            student_name: None,
            class_name: None,
            stage: ReportStage::AwaitingStudent,
            supervision_id: Some(5),
            time_teacher_id: Some(PART_TIME),
            teacher_id: Some(TEACHER),
            time_teacher_comment: None,
            teacher_comment: None,
            time_teacher_completed_at: None,
            teacher_completed_at: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn submission() -> Submission {
        Submission {
            responder_id: STUDENT,
            form_response_id: 9,
            student_name: "Kim".into(),
            class_name: Some("A1".into()),
        }
    }

    fn part_time() -> Actor {
        Actor::new(PART_TIME, Role::PartTime)
    }

    fn teacher() -> Actor {
        Actor::new(TEACHER, Role::Teacher)
    }

    fn admin() -> Actor {
        Actor::new(ADMIN, Role::Admin)
    }

    fn completed_report() -> Report {
        let mut r = report();
        let now = Utc::now();
        submit(&mut r, submission(), now).unwrap();
        review(&mut r, part_time(), Some("good".into()), true, now).unwrap();
        review(&mut r, teacher(), Some("great".into()), true, now).unwrap();
        r
    }

    #[test]
    fn test_happy_path() {
        let mut r = report();
        let t0 = Utc::now();
        submit(&mut r, submission(), t0).unwrap();
        assert_eq!(r.stage, ReportStage::AwaitingPartTime);
        assert_eq!(r.responder_id, Some(STUDENT));

        let t1 = t0 + Duration::minutes(5);
        let stage = review(&mut r, part_time(), Some("ok".into()), true, t1).unwrap();
        assert_eq!(stage, ReportStage::AwaitingTeacher);
        assert_eq!(r.time_teacher_completed_at, Some(t1));
        assert_eq!(r.time_teacher_comment.as_deref(), Some("ok"));

        let t2 = t1 + Duration::minutes(5);
        let stage = review(&mut r, teacher(), Some("fine".into()), true, t2).unwrap();
        assert_eq!(stage, ReportStage::Completed);
        assert_eq!(r.teacher_completed_at, Some(t2));
        assert!(completion_order_holds(&r));
    }

    #[test]
    fn test_stage_zero_rejects_reviewer_writes() {
        let mut r = report();
        let before = r.clone();
        let err = review(&mut r, part_time(), Some("early".into()), false, Utc::now()).unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));
        assert_eq!(r, before);
    }

    #[test]
    fn test_teacher_cannot_write_stage_one() {
        let mut r = report();
        submit(&mut r, submission(), Utc::now()).unwrap();
        let before = r.clone();

        let err = review(&mut r, teacher(), Some("skip".into()), true, Utc::now()).unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
        assert_eq!(r, before);
    }

    #[test]
    fn test_assigned_reviewer_must_match() {
        let mut r = report();
        submit(&mut r, submission(), Utc::now()).unwrap();

        let other = Actor::new(201, Role::PartTime);
        let err = complete_stage(&mut r, other, Utc::now()).unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        // 管理员可以代为审阅
        complete_stage(&mut r, admin(), Utc::now()).unwrap();
        assert_eq!(r.stage, ReportStage::AwaitingTeacher);
    }

    #[test]
    fn test_reject_to_stage_one_clears_first_completion() {
        let mut r = report();
        let now = Utc::now();
        submit(&mut r, submission(), now).unwrap();
        complete_stage(&mut r, part_time(), now).unwrap();

        reject(
            &mut r,
            teacher(),
            "missing details".into(),
            ReportStage::AwaitingPartTime,
            now,
        )
        .unwrap();
        assert_eq!(r.stage, ReportStage::AwaitingPartTime);
        assert_eq!(r.time_teacher_completed_at, None);
        assert_eq!(r.rejected_by, Some(TEACHER));
        assert_eq!(r.rejection_reason.as_deref(), Some("missing details"));

        // 被退回阶段的负责人重新获得写权限
        write_comment(&mut r, part_time(), "fixed".into(), now).unwrap();
        assert!(completion_order_holds(&r));
    }

    #[test]
    fn test_reject_to_stage_zero_allows_resubmission() {
        let mut r = report();
        let now = Utc::now();
        submit(&mut r, submission(), now).unwrap();

        reject(&mut r, part_time(), "incomplete".into(), ReportStage::AwaitingStudent, now).unwrap();
        assert_eq!(r.stage, ReportStage::AwaitingStudent);

        submit(&mut r, submission(), now).unwrap();
        assert_eq!(r.stage, ReportStage::AwaitingPartTime);
    }

    #[test]
    fn test_reject_target_must_be_earlier() {
        let mut r = report();
        let now = Utc::now();
        submit(&mut r, submission(), now).unwrap();

        for target in [ReportStage::AwaitingPartTime, ReportStage::Completed] {
            let err = reject(&mut r, part_time(), "no".into(), target, now).unwrap_err();
            assert!(matches!(err, AcademyError::InvalidFields(_)));
        }
        let err = reject(&mut r, part_time(), "  ".into(), ReportStage::AwaitingStudent, now)
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));
        assert_eq!(r.rejected_at, None);
    }

    #[test]
    fn test_completed_is_read_only_except_reopen() {
        let mut r = completed_report();
        let before = r.clone();

        assert!(review(&mut r, teacher(), Some("late".into()), false, Utc::now()).is_err());
        assert!(reject(&mut r, teacher(), "late".into(), ReportStage::AwaitingTeacher, Utc::now()).is_err());
        assert!(reopen(&mut r, teacher(), ReportStage::AwaitingTeacher, Utc::now()).is_err());
        assert_eq!(r, before);

        reopen(&mut r, admin(), ReportStage::AwaitingTeacher, Utc::now()).unwrap();
        assert_eq!(r.stage, ReportStage::AwaitingTeacher);
        assert!(r.time_teacher_completed_at.is_some());
        assert!(r.teacher_completed_at.is_none());

        let mut r = completed_report();
        reopen(&mut r, admin(), ReportStage::AwaitingPartTime, Utc::now()).unwrap();
        assert!(r.time_teacher_completed_at.is_none());
        assert!(r.teacher_completed_at.is_none());

        let mut r = completed_report();
        assert!(reopen(&mut r, admin(), ReportStage::AwaitingStudent, Utc::now()).is_err());
    }

    #[test]
    fn test_completion_order_holds_across_sequences() {
        let now = Utc::now();
        let steps: Vec<Box<dyn Fn(&mut Report) -> Result<()>>> = vec![
            Box::new(move |r: &mut Report| submit(r, submission(), now)),
            Box::new(move |r: &mut Report| complete_stage(r, part_time(), now).map(|_| ())),
            Box::new(move |r: &mut Report| {
                reject(r, teacher(), "again".into(), ReportStage::AwaitingPartTime, now)
            }),
            Box::new(move |r: &mut Report| complete_stage(r, part_time(), now).map(|_| ())),
            Box::new(move |r: &mut Report| complete_stage(r, teacher(), now).map(|_| ())),
            Box::new(move |r: &mut Report| reopen(r, admin(), ReportStage::AwaitingPartTime, now)),
            Box::new(move |r: &mut Report| complete_stage(r, teacher(), now).map(|_| ())),
            Box::new(move |r: &mut Report| complete_stage(r, part_time(), now).map(|_| ())),
            Box::new(move |r: &mut Report| complete_stage(r, teacher(), now).map(|_| ())),
        ];

        let mut r = report();
        for step in &steps {
            let _ = step(&mut r);
            assert!(completion_order_holds(&r));
        }
        assert_eq!(r.stage, ReportStage::Completed);
    }
}
