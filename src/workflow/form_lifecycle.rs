//! 表单生命周期：draft -> save -> send，只能前进

use crate::errors::{AcademyError, Result};
use crate::models::forms::entities::{Form, FormStatus};
use crate::models::questions::entities::Question;

use super::validation::validate_completeness;

pub const FORM_IS_SENT: &str = "Form is sent";

/// 已发送的表单不允许修改题目与基本信息
pub fn ensure_editable(status: FormStatus) -> Result<()> {
    if status == FormStatus::Send {
        Err(AcademyError::invalid_state(FORM_IS_SENT))
    } else {
        Ok(())
    }
}

/// 保存后的状态，draft 与 save 都进入 save
pub fn status_after_save(status: FormStatus) -> Result<FormStatus> {
    ensure_editable(status)?;
    Ok(FormStatus::Save)
}

/// 发送前检查：表单已持久化、至少一个接收对象、至少一个完整的题目
pub fn ensure_can_send(form: &Form, questions: &[Question], recipients: usize) -> Result<()> {
    ensure_editable(form.status)?;

    if form.id <= 0 {
        return Err(AcademyError::invalid_state(
            "Form must be saved before it can be sent",
        ));
    }
    if questions.is_empty() {
        return Err(AcademyError::invalid_field(
            "questions",
            "at least one question is required",
        ));
    }
    validate_completeness(questions)?;

    if recipients == 0 {
        return Err(AcademyError::invalid_field(
            "targets",
            "at least one class or member must receive the form",
        ));
    }

    Ok(())
}

/// 复制表单的标题
pub fn duplicate_title(title: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{title}{suffix}"),
        None => title.to_string(),
    }
}

/// 复制题目：去掉 id，全部视为新题目
pub fn duplicate_questions(questions: &[Question]) -> Vec<Question> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| Question {
            id: None,
            form_id: 0,
            order_index: i as i32,
            ..q.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{QuestionConfig, QuestionType};

    fn form(status: FormStatus) -> Form {
        let now = chrono::Utc::now();
        Form {
            id: 3,
            group_id: 1,
            creator_id: 1,
            title: "Weekly check".into(),
            description: None,
            status,
            supervision_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn complete_question() -> Question {
        let mut q = Question::new(3, 0, QuestionType::Rating);
        q.id = Some(10);
        q.question_text = "How was class?".into();
        q
    }

    #[test]
    fn test_status_only_moves_forward() {
        assert_eq!(status_after_save(FormStatus::Draft).unwrap(), FormStatus::Save);
        assert_eq!(status_after_save(FormStatus::Save).unwrap(), FormStatus::Save);
        let err = status_after_save(FormStatus::Send).unwrap_err();
        assert_eq!(err.message(), FORM_IS_SENT);
    }

    #[test]
    fn test_send_requires_recipients_and_questions() {
        let draft = form(FormStatus::Draft);
        let questions = vec![complete_question()];

        assert!(ensure_can_send(&draft, &questions, 2).is_ok());
        assert!(matches!(
            ensure_can_send(&draft, &questions, 0),
            Err(AcademyError::InvalidFields(_))
        ));
        assert!(matches!(
            ensure_can_send(&draft, &[], 2),
            Err(AcademyError::InvalidFields(_))
        ));

        let mut incomplete = complete_question();
        incomplete.question_text.clear();
        assert!(ensure_can_send(&draft, &[incomplete], 2).is_err());

        let sent = form(FormStatus::Send);
        assert!(matches!(
            ensure_can_send(&sent, &questions, 2),
            Err(AcademyError::InvalidState(_))
        ));
    }

    #[test]
    fn test_duplicate_strips_ids() {
        let mut second = complete_question();
        second.id = Some(11);
        second.order_index = 1;
        second.config = QuestionConfig::default_for(QuestionType::Text);

        let copies = duplicate_questions(&[complete_question(), second]);
        assert!(copies.iter().all(|q| q.is_new()));
        assert_eq!(copies[1].order_index, 1);
        assert_eq!(copies[1].question_type(), QuestionType::Text);

        assert_eq!(
            duplicate_title("Weekly check", Some(" [복사본]")),
            "Weekly check [복사본]"
        );
        assert_eq!(duplicate_title("Weekly check", None), "Weekly check");
    }
}
