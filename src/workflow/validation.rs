//! 题目与作答校验
//!
//! 结构校验（数值范围、选项数量）在每次持久化时执行；
//! 完整性校验（题干、选项文字、考试模板可解析）只在保存和发送时执行。

use std::collections::{HashMap, HashSet};

use crate::errors::{AcademyError, FieldError, Result};
use crate::models::questions::entities::{ExamTemplateRef, Question, QuestionConfig};
use crate::models::responses::entities::{Answer, AnswerValue, OTHER_OPTION};

pub const RATING_MAX_RANGE: (i32, i32) = (3, 10);
pub const RATING_STEP_RANGE: (i32, i32) = (1, 5);

fn question_field(index: usize, field: &str) -> String {
    format!("questions[{index}].{field}")
}

fn answer_field(question_id: i64) -> String {
    format!("answers[{question_id}]")
}

/// 单个题目的结构错误
pub fn structural_errors(question: &Question, index: usize) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match &question.config {
        QuestionConfig::Text { max_length, .. } => {
            if *max_length <= 0 {
                errors.push(FieldError::new(
                    question_field(index, "max_length"),
                    "must be a positive number",
                ));
            }
        }
        QuestionConfig::Rating {
            rating_max,
            rating_step,
        } => {
            let (min, max) = RATING_MAX_RANGE;
            if !(min..=max).contains(rating_max) {
                errors.push(FieldError::new(
                    question_field(index, "rating_max"),
                    format!("must be between {min} and {max}"),
                ));
            }
            let (min, max) = RATING_STEP_RANGE;
            if !(min..=max).contains(rating_step) {
                errors.push(FieldError::new(
                    question_field(index, "rating_step"),
                    format!("must be between {min} and {max}"),
                ));
            }
        }
        QuestionConfig::Choice { options, .. } => {
            if options.is_empty() {
                errors.push(FieldError::new(
                    question_field(index, "options"),
                    "at least one option is required",
                ));
            }
            if options.iter().any(|o| o == OTHER_OPTION) {
                errors.push(FieldError::new(
                    question_field(index, "options"),
                    "option label is reserved",
                ));
            }
        }
        QuestionConfig::Exam {
            total_questions,
            template,
        } => {
            if *total_questions <= 0 {
                errors.push(FieldError::new(
                    question_field(index, "total_questions"),
                    "must be a positive number",
                ));
            }
            if let ExamTemplateRef::Existing { template_id } = template
                && *template_id <= 0
            {
                errors.push(FieldError::new(
                    question_field(index, "exam_concept_template_id"),
                    "must reference a concept template",
                ));
            }
        }
    }

    errors
}

/// 单个题目的完整性错误（不含结构错误）
pub fn completeness_errors(question: &Question, index: usize) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if question.question_text.trim().is_empty() {
        errors.push(FieldError::new(
            question_field(index, "question_text"),
            "must not be empty",
        ));
    }

    match &question.config {
        QuestionConfig::Choice { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                if option.trim().is_empty() {
                    errors.push(FieldError::new(
                        question_field(index, &format!("options[{i}]")),
                        "must not be empty",
                    ));
                }
            }
        }
        QuestionConfig::Exam {
            template: ExamTemplateRef::New { items, .. },
            ..
        } => {
            if !items.iter().any(|item| !item.text.trim().is_empty()) {
                errors.push(FieldError::new(
                    question_field(index, "exam_concept_items"),
                    "at least one concept item is required",
                ));
            }
        }
        _ => {}
    }

    errors
}

/// 持久化前的结构校验
pub fn validate_structure(questions: &[Question]) -> Result<()> {
    let errors: Vec<FieldError> = questions
        .iter()
        .enumerate()
        .flat_map(|(i, q)| structural_errors(q, i))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AcademyError::InvalidFields(errors))
    }
}

/// 保存/发送前的完整校验（结构 + 完整性）
pub fn validate_completeness(questions: &[Question]) -> Result<()> {
    let errors: Vec<FieldError> = questions
        .iter()
        .enumerate()
        .flat_map(|(i, q)| {
            let mut errors = structural_errors(q, i);
            errors.extend(completeness_errors(q, i));
            errors
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AcademyError::InvalidFields(errors))
    }
}

/// 校验单个作答值
pub fn answer_errors(question: &Question, question_id: i64, value: &AnswerValue) -> Vec<FieldError> {
    let field = answer_field(question_id);
    let mut errors = Vec::new();

    match (&question.config, value) {
        (QuestionConfig::Text { max_length, .. }, AnswerValue::Text { text }) => {
            let length = text.chars().count();
            if length > *max_length as usize {
                errors.push(FieldError::new(
                    field,
                    format!("must be at most {max_length} characters"),
                ));
            }
        }
        (
            QuestionConfig::Rating {
                rating_max,
                rating_step,
            },
            AnswerValue::Rating { value },
        ) => {
            if !(0..=*rating_max).contains(value) {
                errors.push(FieldError::new(
                    field,
                    format!("must be between 0 and {rating_max}"),
                ));
            } else if *rating_step > 0 && value % rating_step != 0 {
                errors.push(FieldError::new(
                    field,
                    format!("must be a multiple of {rating_step}"),
                ));
            }
        }
        (
            QuestionConfig::Choice {
                options,
                multiple,
                allow_other,
            },
            AnswerValue::Choice {
                selected,
                other_text,
            },
        ) => {
            let mut seen = HashSet::new();
            for choice in selected {
                if !seen.insert(choice.as_str()) {
                    errors.push(FieldError::new(&field, "options must not repeat"));
                    continue;
                }
                let known = if choice == OTHER_OPTION {
                    *allow_other
                } else {
                    options.contains(choice)
                };
                if !known {
                    errors.push(FieldError::new(&field, "selection is not one of the options"));
                }
            }
            if !*multiple && selected.len() > 1 {
                errors.push(FieldError::new(&field, "exactly one option must be selected"));
            }
            let picked_other = selected.iter().any(|s| s == OTHER_OPTION);
            let other_blank = other_text
                .as_deref()
                .map(|t| t.trim().is_empty())
                .unwrap_or(true);
            if picked_other && other_blank {
                errors.push(FieldError::new(
                    format!("{field}.other_text"),
                    "must not be empty when \"other\" is selected",
                ));
            }
        }
        (QuestionConfig::Exam {
            total_questions, ..
        }, AnswerValue::Exam { entries }) => {
            let mut seen = HashSet::new();
            for entry in entries {
                if !(1..=*total_questions).contains(&entry.number) {
                    errors.push(FieldError::new(
                        &field,
                        format!("item number must be between 1 and {total_questions}"),
                    ));
                } else if !seen.insert(entry.number) {
                    errors.push(FieldError::new(&field, "item numbers must not repeat"));
                }
            }
        }
        (config, _) => {
            errors.push(FieldError::new(
                field,
                format!("expected a {} answer", config.question_type()),
            ));
        }
    }

    errors
}

/// 校验一份完整作答
///
/// 题目必须已持久化（有 id）；未知题目、重复作答、必答缺失都按字段报错。
pub fn validate_response(questions: &[Question], answers: &[Answer]) -> Result<()> {
    let by_id: HashMap<i64, &Question> = questions
        .iter()
        .filter_map(|q| q.id.map(|id| (id, q)))
        .collect();

    let mut errors = Vec::new();
    let mut answered = HashSet::new();

    for answer in answers {
        let field = answer_field(answer.question_id);
        let Some(question) = by_id.get(&answer.question_id) else {
            errors.push(FieldError::new(field, "unknown question"));
            continue;
        };
        if !answered.insert(answer.question_id) {
            errors.push(FieldError::new(field, "answered more than once"));
            continue;
        }
        if answer.value.is_empty() {
            continue;
        }
        errors.extend(answer_errors(question, answer.question_id, &answer.value));
    }

    for question in questions.iter().filter(|q| q.is_required) {
        let Some(id) = question.id else { continue };
        let filled = answers
            .iter()
            .any(|a| a.question_id == id && !a.value.is_empty());
        if !filled {
            errors.push(FieldError::new(answer_field(id), "this question is required"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AcademyError::InvalidFields(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{ConceptItemDraft, QuestionType, TextSubtype};
    use crate::models::responses::entities::ExamEntry;

    fn persisted(id: i64, config: QuestionConfig, required: bool) -> Question {
        Question {
            id: Some(id),
            form_id: 1,
            order_index: (id - 1) as i32,
            is_required: required,
            question_text: format!("Question {id}"),
            config,
        }
    }

    fn field_names(err: AcademyError) -> Vec<String> {
        match err {
            AcademyError::InvalidFields(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_rating_ranges_are_structural() {
        let mut q = Question::new(1, 0, QuestionType::Rating);
        q.config = QuestionConfig::Rating {
            rating_max: 11,
            rating_step: 0,
        };
        let fields = field_names(validate_structure(&[q]).unwrap_err());
        assert_eq!(
            fields,
            vec!["questions[0].rating_max", "questions[0].rating_step"]
        );
    }

    #[test]
    fn test_default_choice_is_structurally_valid_but_incomplete() {
        let q = Question::new(1, 0, QuestionType::Choice);
        assert!(validate_structure(std::slice::from_ref(&q)).is_ok());

        let fields = field_names(validate_completeness(&[q]).unwrap_err());
        assert!(fields.contains(&"questions[0].question_text".to_string()));
        assert!(fields.contains(&"questions[0].options[0]".to_string()));
    }

    #[test]
    fn test_new_exam_template_needs_items_to_be_complete() {
        let mut q = Question::new(1, 0, QuestionType::Exam);
        q.question_text = "Vocabulary".into();
        let fields = field_names(validate_completeness(std::slice::from_ref(&q)).unwrap_err());
        assert_eq!(fields, vec!["questions[0].exam_concept_items"]);

        q.config = QuestionConfig::Exam {
            total_questions: 3,
            template: ExamTemplateRef::New {
                name: "Week 1".into(),
                items: vec![ConceptItemDraft {
                    text: "photosynthesis".into(),
                    description: String::new(),
                }],
            },
        };
        assert!(validate_completeness(&[q]).is_ok());
    }

    #[test]
    fn test_text_answer_length_counts_characters() {
        let q = persisted(
            1,
            QuestionConfig::Text {
                subtype: TextSubtype::Textarea,
                max_length: 3,
            },
            false,
        );
        let ok = AnswerValue::Text {
            text: "가나다".into(),
        };
        assert!(answer_errors(&q, 1, &ok).is_empty());
        let long = AnswerValue::Text {
            text: "가나다라".into(),
        };
        assert_eq!(answer_errors(&q, 1, &long).len(), 1);
    }

    #[test]
    fn test_rating_answer_respects_step() {
        let q = persisted(
            1,
            QuestionConfig::Rating {
                rating_max: 10,
                rating_step: 2,
            },
            false,
        );
        assert!(answer_errors(&q, 1, &AnswerValue::Rating { value: 0 }).is_empty());
        assert!(answer_errors(&q, 1, &AnswerValue::Rating { value: 8 }).is_empty());
        assert_eq!(answer_errors(&q, 1, &AnswerValue::Rating { value: 3 }).len(), 1);
        assert_eq!(answer_errors(&q, 1, &AnswerValue::Rating { value: 12 }).len(), 1);
    }

    #[test]
    fn test_choice_answer_rules() {
        let q = persisted(
            1,
            QuestionConfig::Choice {
                options: vec!["A".into(), "B".into()],
                multiple: false,
                allow_other: true,
            },
            false,
        );
        let single = AnswerValue::Choice {
            selected: vec!["A".into()],
            other_text: None,
        };
        assert!(answer_errors(&q, 1, &single).is_empty());

        let two = AnswerValue::Choice {
            selected: vec!["A".into(), "B".into()],
            other_text: None,
        };
        assert_eq!(answer_errors(&q, 1, &two).len(), 1);

        let other_blank = AnswerValue::Choice {
            selected: vec![OTHER_OPTION.into()],
            other_text: Some("  ".into()),
        };
        let errors = answer_errors(&q, 1, &other_blank);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "answers[1].other_text");

        let unknown = AnswerValue::Choice {
            selected: vec!["C".into()],
            other_text: None,
        };
        assert_eq!(answer_errors(&q, 1, &unknown).len(), 1);
    }

    #[test]
    fn test_exam_answer_numbers() {
        let q = persisted(
            1,
            QuestionConfig::Exam {
                total_questions: 3,
                template: ExamTemplateRef::Existing { template_id: 9 },
            },
            false,
        );
        let entries = |numbers: &[i32]| AnswerValue::Exam {
            entries: numbers
                .iter()
                .map(|n| ExamEntry {
                    number: *n,
                    answer: "x".into(),
                })
                .collect(),
        };
        assert!(answer_errors(&q, 1, &entries(&[1, 3])).is_empty());
        assert_eq!(answer_errors(&q, 1, &entries(&[0, 4])).len(), 2);
        assert_eq!(answer_errors(&q, 1, &entries(&[2, 2])).len(), 1);
    }

    #[test]
    fn test_response_required_unknown_and_kind_mismatch() {
        let questions = vec![
            persisted(
                1,
                QuestionConfig::Rating {
                    rating_max: 5,
                    rating_step: 1,
                },
                true,
            ),
            persisted(
                2,
                QuestionConfig::Text {
                    subtype: TextSubtype::Text,
                    max_length: 100,
                },
                false,
            ),
        ];

        let answers = vec![
            Answer {
                question_id: 2,
                value: AnswerValue::Rating { value: 1 },
            },
            Answer {
                question_id: 7,
                value: AnswerValue::Text { text: "?".into() },
            },
        ];
        let fields = field_names(validate_response(&questions, &answers).unwrap_err());
        assert_eq!(fields, vec!["answers[2]", "answers[7]", "answers[1]"]);

        let answers = vec![Answer {
            question_id: 1,
            value: AnswerValue::Rating { value: 4 },
        }];
        assert!(validate_response(&questions, &answers).is_ok());
    }
}
