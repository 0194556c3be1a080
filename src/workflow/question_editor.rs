//! 题目编辑器
//!
//! 持有一个表单的完整题目集和当前展开的题目指针。每次结构变化后
//! `order_index` 都会被重新编号为连续的 0..n-1。

use crate::errors::{AcademyError, FieldError, Result};
use crate::models::forms::entities::FormStatus;
use crate::models::questions::entities::{
    ExamTemplateRef, Question, QuestionConfig, QuestionType,
};
use crate::models::questions::requests::QuestionPatch;

use super::form_lifecycle::ensure_editable;
use super::validation::structural_errors;

#[derive(Debug, Clone)]
pub struct QuestionEditor {
    form_id: i64,
    status: FormStatus,
    questions: Vec<Question>,
    focused: Option<usize>,
}

impl QuestionEditor {
    /// 以存储中的题目初始化，按 `order_index` 排序后重新编号
    pub fn new(form_id: i64, status: FormStatus, mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| q.order_index);
        let mut editor = Self {
            form_id,
            status,
            questions,
            focused: None,
        };
        editor.renumber();
        editor
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focus(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(i) = index {
            self.check_index(i)?;
        }
        self.focused = index;
        Ok(())
    }

    /// 在末尾追加一个默认配置的题目，并展开它
    pub fn add_question(&mut self, question_type: QuestionType) -> Result<&Question> {
        ensure_editable(self.status)?;

        let index = self.questions.len();
        self.questions
            .push(Question::new(self.form_id, index as i32, question_type));
        self.focused = Some(index);
        Ok(&self.questions[index])
    }

    /// 局部更新题目
    ///
    /// 修改题型时配置整体替换为新题型的默认值，再应用补丁中的题型字段。
    /// 任一字段出错时题目保持不变。
    pub fn update_question(&mut self, index: usize, patch: QuestionPatch) -> Result<&Question> {
        ensure_editable(self.status)?;
        self.check_index(index)?;

        let mut updated = self.questions[index].clone();
        let errors = apply_patch(&mut updated, index, patch);
        if !errors.is_empty() {
            return Err(AcademyError::InvalidFields(errors));
        }

        let errors = structural_errors(&updated, index);
        if !errors.is_empty() {
            return Err(AcademyError::InvalidFields(errors));
        }

        self.questions[index] = updated;
        Ok(&self.questions[index])
    }

    /// 删除题目并修正展开指针
    pub fn delete_question(&mut self, index: usize) -> Result<Question> {
        ensure_editable(self.status)?;
        self.check_index(index)?;

        let removed = self.questions.remove(index);
        self.renumber();

        self.focused = match self.focused {
            Some(f) if f == index => None,
            Some(f) if f > index => Some(f - 1),
            other => other,
        };

        Ok(removed)
    }

    /// 将题目从 `from` 移动到 `to`，展开指针跟随被移动的题目
    pub fn move_question(&mut self, from: usize, to: usize) -> Result<()> {
        ensure_editable(self.status)?;
        self.check_index(from)?;
        self.check_index(to)?;

        if from == to {
            return Ok(());
        }

        let question = self.questions.remove(from);
        self.questions.insert(to, question);
        self.renumber();

        self.focused = self.focused.map(|f| {
            if f == from {
                to
            } else if from < f && f <= to {
                f - 1
            } else if to <= f && f < from {
                f + 1
            } else {
                f
            }
        });

        Ok(())
    }

    /// 按 id 查找题目位置
    pub fn position_of(&self, question_id: i64) -> Option<usize> {
        self.questions
            .iter()
            .position(|q| q.id == Some(question_id))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(AcademyError::not_found("Question not found"))
        }
    }

    fn renumber(&mut self) {
        for (i, question) in self.questions.iter_mut().enumerate() {
            question.order_index = i as i32;
        }
    }
}

fn not_applicable(index: usize, field: &str, question_type: QuestionType) -> FieldError {
    FieldError::new(
        format!("questions[{index}].{field}"),
        format!("does not apply to {question_type} questions"),
    )
}

fn apply_patch(question: &mut Question, index: usize, patch: QuestionPatch) -> Vec<FieldError> {
    if let Some(text) = patch.question_text {
        question.question_text = text;
    }
    if let Some(required) = patch.is_required {
        question.is_required = required;
    }
    if let Some(new_type) = patch.question_type
        && new_type != question.question_type()
    {
        question.config = QuestionConfig::default_for(new_type);
    }

    let question_type = question.question_type();

    // 不属于当前题型的字段逐个报错
    let foreign: [(&str, bool, QuestionType); 12] = [
        ("subtype", patch.subtype.is_some(), QuestionType::Text),
        ("max_length", patch.max_length.is_some(), QuestionType::Text),
        ("rating_max", patch.rating_max.is_some(), QuestionType::Rating),
        ("rating_step", patch.rating_step.is_some(), QuestionType::Rating),
        ("options", patch.options.is_some(), QuestionType::Choice),
        ("multiple", patch.multiple.is_some(), QuestionType::Choice),
        ("allow_other", patch.allow_other.is_some(), QuestionType::Choice),
        ("total_questions", patch.total_questions.is_some(), QuestionType::Exam),
        ("exam_use_existing", patch.exam_use_existing.is_some(), QuestionType::Exam),
        (
            "exam_concept_template_id",
            patch.exam_concept_template_id.is_some(),
            QuestionType::Exam,
        ),
        (
            "exam_new_template_name",
            patch.exam_new_template_name.is_some(),
            QuestionType::Exam,
        ),
        (
            "exam_concept_items",
            patch.exam_concept_items.is_some(),
            QuestionType::Exam,
        ),
    ];
    let mut errors: Vec<FieldError> = foreign
        .into_iter()
        .filter(|(_, present, owner)| *present && *owner != question_type)
        .map(|(field, _, _)| not_applicable(index, field, question_type))
        .collect();

    match &mut question.config {
        QuestionConfig::Text {
            subtype,
            max_length,
        } => {
            if let Some(v) = patch.subtype {
                *subtype = v;
            }
            if let Some(v) = patch.max_length {
                *max_length = v;
            }
        }
        QuestionConfig::Rating {
            rating_max,
            rating_step,
        } => {
            if let Some(v) = patch.rating_max {
                *rating_max = v;
            }
            if let Some(v) = patch.rating_step {
                *rating_step = v;
            }
        }
        QuestionConfig::Choice {
            options,
            multiple,
            allow_other,
        } => {
            if let Some(v) = patch.options {
                *options = v;
            }
            if let Some(v) = patch.multiple {
                *multiple = v;
            }
            if let Some(v) = patch.allow_other {
                *allow_other = v;
            }
        }
        QuestionConfig::Exam {
            total_questions,
            template,
        } => {
            if let Some(v) = patch.total_questions {
                *total_questions = v;
            }
            let use_existing = patch.exam_use_existing.unwrap_or(template.use_existing());
            if use_existing {
                for (field, present) in [
                    ("exam_new_template_name", patch.exam_new_template_name.is_some()),
                    ("exam_concept_items", patch.exam_concept_items.is_some()),
                ] {
                    if present {
                        errors.push(FieldError::new(
                            format!("questions[{index}].{field}"),
                            "only applies when creating a new template",
                        ));
                    }
                }
                match patch.exam_concept_template_id.or(template.template_id()) {
                    Some(template_id) => *template = ExamTemplateRef::Existing { template_id },
                    None => errors.push(FieldError::new(
                        format!("questions[{index}].exam_concept_template_id"),
                        "is required when reusing a template",
                    )),
                }
            } else {
                if patch.exam_concept_template_id.is_some() {
                    errors.push(FieldError::new(
                        format!("questions[{index}].exam_concept_template_id"),
                        "only applies when reusing a template",
                    ));
                }
                let (name, items) = match std::mem::replace(
                    template,
                    ExamTemplateRef::New {
                        name: String::new(),
                        items: Vec::new(),
                    },
                ) {
                    ExamTemplateRef::New { name, items } => (name, items),
                    ExamTemplateRef::Existing { .. } => (String::new(), Vec::new()),
                };
                *template = ExamTemplateRef::New {
                    name: patch.exam_new_template_name.unwrap_or(name),
                    items: patch.exam_concept_items.unwrap_or(items),
                };
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::ConceptItemDraft;

    fn draft_editor() -> QuestionEditor {
        QuestionEditor::new(1, FormStatus::Draft, Vec::new())
    }

    fn assert_dense(editor: &QuestionEditor) {
        let indexes: Vec<i32> = editor.questions().iter().map(|q| q.order_index).collect();
        let expected: Vec<i32> = (0..editor.len() as i32).collect();
        assert_eq!(indexes, expected);
    }

    #[test]
    fn test_add_then_delete_keeps_dense_order() {
        let mut editor = draft_editor();

        let choice = editor.add_question(QuestionType::Choice).unwrap();
        assert_eq!(choice.order_index, 0);
        assert_eq!(
            choice.config,
            QuestionConfig::Choice {
                options: vec![String::new()],
                multiple: false,
                allow_other: false,
            }
        );

        let rating = editor.add_question(QuestionType::Rating).unwrap();
        assert_eq!(rating.order_index, 1);
        assert_eq!(
            rating.config,
            QuestionConfig::Rating {
                rating_max: 5,
                rating_step: 1,
            }
        );

        editor.delete_question(0).unwrap();
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.questions()[0].order_index, 0);
        assert_eq!(editor.questions()[0].question_type(), QuestionType::Rating);
    }

    #[test]
    fn test_dense_order_over_mixed_operations() {
        let mut editor = draft_editor();
        for t in [
            QuestionType::Text,
            QuestionType::Rating,
            QuestionType::Choice,
            QuestionType::Exam,
            QuestionType::Text,
        ] {
            editor.add_question(t).unwrap();
            assert_dense(&editor);
        }
        editor.move_question(4, 0).unwrap();
        assert_dense(&editor);
        editor.delete_question(2).unwrap();
        assert_dense(&editor);
        editor.move_question(0, 3).unwrap();
        assert_dense(&editor);
        editor.delete_question(3).unwrap();
        assert_dense(&editor);
    }

    #[test]
    fn test_move_back_restores_order() {
        let mut editor = draft_editor();
        for t in [QuestionType::Text, QuestionType::Rating, QuestionType::Choice] {
            editor.add_question(t).unwrap();
        }
        let before: Vec<QuestionType> =
            editor.questions().iter().map(|q| q.question_type()).collect();

        editor.move_question(0, 2).unwrap();
        assert_eq!(editor.questions()[2].question_type(), QuestionType::Text);
        editor.move_question(2, 0).unwrap();

        let after: Vec<QuestionType> =
            editor.questions().iter().map(|q| q.question_type()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_focus_pointer_follows_structure() {
        let mut editor = draft_editor();
        for _ in 0..4 {
            editor.add_question(QuestionType::Text).unwrap();
        }

        editor.focus(Some(2)).unwrap();
        editor.delete_question(0).unwrap();
        assert_eq!(editor.focused(), Some(1));

        editor.delete_question(1).unwrap();
        assert_eq!(editor.focused(), None);

        editor.focus(Some(0)).unwrap();
        editor.delete_question(1).unwrap();
        assert_eq!(editor.focused(), Some(0));

        editor.add_question(QuestionType::Rating).unwrap();
        editor.add_question(QuestionType::Choice).unwrap();
        editor.focus(Some(0)).unwrap();
        editor.move_question(0, 2).unwrap();
        assert_eq!(editor.focused(), Some(2));
        editor.focus(Some(1)).unwrap();
        editor.move_question(2, 0).unwrap();
        assert_eq!(editor.focused(), Some(2));
    }

    #[test]
    fn test_type_change_replaces_config() {
        let mut editor = draft_editor();
        editor.add_question(QuestionType::Choice).unwrap();
        editor
            .update_question(
                0,
                QuestionPatch {
                    options: Some(vec!["A".into(), "B".into()]),
                    allow_other: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        let updated = editor
            .update_question(
                0,
                QuestionPatch {
                    question_type: Some(QuestionType::Rating),
                    rating_max: Some(7),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            updated.config,
            QuestionConfig::Rating {
                rating_max: 7,
                rating_step: 1,
            }
        );
    }

    #[test]
    fn test_foreign_fields_are_rejected_per_field() {
        let mut editor = draft_editor();
        editor.add_question(QuestionType::Text).unwrap();
        let before = editor.questions().to_vec();

        let err = editor
            .update_question(
                0,
                QuestionPatch {
                    question_text: Some("changed".into()),
                    rating_max: Some(5),
                    options: Some(vec!["x".into()]),
                    ..Default::default()
                },
            )
            .unwrap_err();

        match err {
            AcademyError::InvalidFields(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["questions[0].rating_max", "questions[0].options"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(editor.questions(), before.as_slice());
    }

    #[test]
    fn test_out_of_range_patch_is_rejected() {
        let mut editor = draft_editor();
        editor.add_question(QuestionType::Rating).unwrap();
        let err = editor
            .update_question(
                0,
                QuestionPatch {
                    rating_max: Some(2),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "E100");
    }

    #[test]
    fn test_exam_template_mode_switch() {
        let mut editor = draft_editor();
        editor.add_question(QuestionType::Exam).unwrap();

        let q = editor
            .update_question(
                0,
                QuestionPatch {
                    exam_new_template_name: Some("Week 1".into()),
                    exam_concept_items: Some(vec![ConceptItemDraft {
                        text: "cell".into(),
                        description: String::new(),
                    }]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matches!(
            &q.config,
            QuestionConfig::Exam { template: ExamTemplateRef::New { name, items }, .. }
                if name == "Week 1" && items.len() == 1
        ));

        let err = editor
            .update_question(
                0,
                QuestionPatch {
                    exam_use_existing: Some(true),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));

        let q = editor
            .update_question(
                0,
                QuestionPatch {
                    exam_use_existing: Some(true),
                    exam_concept_template_id: Some(42),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            q.config,
            QuestionConfig::Exam {
                total_questions: 10,
                template: ExamTemplateRef::Existing { template_id: 42 },
            }
        );
    }

    #[test]
    fn test_sent_form_rejects_every_mutation() {
        let mut draft = draft_editor();
        draft.add_question(QuestionType::Text).unwrap();
        draft.add_question(QuestionType::Rating).unwrap();
        let questions = draft.into_questions();

        let mut editor = QuestionEditor::new(1, FormStatus::Send, questions.clone());
        let patch = QuestionPatch {
            question_text: Some("edited".into()),
            ..Default::default()
        };

        let results = [
            editor.add_question(QuestionType::Choice).map(|_| ()),
            editor.update_question(0, patch).map(|_| ()),
            editor.delete_question(0).map(|_| ()),
            editor.move_question(0, 1),
        ];
        for result in results {
            let err = result.unwrap_err();
            assert!(matches!(err, AcademyError::InvalidState(_)));
            assert_eq!(err.message(), "Form is sent");
        }
        assert_eq!(editor.questions(), questions.as_slice());
    }
}
