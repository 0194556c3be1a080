//! 内存存储实现
//!
//! 用于测试与本地试运行（`memory://`）。所有表放在同一把锁之后，
//! 多行写入先完成全部检查再落地，失败时不留下部分结果。

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginationInfo,
    concept_templates::entities::{ConceptTemplate, NewConceptTemplate},
    forms::{
        entities::{Form, FormStatus, FormTarget, NewFormBundle},
        requests::FormListQuery,
        responses::{FormBundle, FormListResponse},
    },
    groups::{
        entities::{Class, Group, GroupMember, Role},
        requests::{MemberListQuery, UpsertMemberRequest},
    },
    notifications::entities::{NewNotification, Notification},
    questions::entities::Question,
    reports::{
        entities::{NewReport, Report, ReportStage, ReportWrite},
        requests::ReportListQuery,
    },
    responses::entities::{FormResponse, NewFormResponse},
    supervisions::entities::SupervisionMapping,
};
use crate::storage::Storage;
use crate::workflow::FORM_IS_SENT;
use crate::workflow::question_set::{TemplatePlan, bind_template, referenced_templates};

const REPORT_CHANGED: &str = "Report was changed by someone else, please reload";

#[derive(Default)]
struct Tables {
    last_id: i64,
    groups: BTreeMap<i64, Group>,
    classes: BTreeMap<i64, Class>,
    members: BTreeMap<i64, GroupMember>,
    supervisions: BTreeMap<i64, SupervisionMapping>,
    forms: BTreeMap<i64, Form>,
    targets: BTreeMap<i64, Vec<FormTarget>>,
    templates: BTreeMap<i64, ConceptTemplate>,
    questions: BTreeMap<i64, Question>,
    responses: BTreeMap<i64, FormResponse>,
    reports: BTreeMap<i64, Report>,
    notifications: BTreeMap<i64, Notification>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn upsert_supervision(
        &mut self,
        group_id: i64,
        time_teacher_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> SupervisionMapping {
        let key = SupervisionMapping::assignment_key(group_id, time_teacher_id, teacher_id);
        if let Some(existing) = self.supervisions.values().find(|s| {
            SupervisionMapping::assignment_key(s.group_id, s.time_teacher_id, s.teacher_id) == key
        }) {
            return existing.clone();
        }

        let mapping = SupervisionMapping {
            id: self.next_id(),
            group_id,
            time_teacher_id,
            teacher_id,
            created_at: Utc::now(),
        };
        self.supervisions.insert(mapping.id, mapping.clone());
        mapping
    }

    fn build_template(&mut self, template: NewConceptTemplate) -> ConceptTemplate {
        ConceptTemplate {
            id: self.next_id(),
            name: template.name,
            group_id: template.group_id,
            creator_id: template.creator_id,
            concept_count: template.concept_count,
            status: template.status,
            items: template.items,
            created_at: Utc::now(),
        }
    }

    fn insert_report(&mut self, report: NewReport) -> Report {
        let now = Utc::now();
        let report = Report {
            id: self.next_id(),
            group_id: report.group_id,
            form_id: report.form_id,
            form_response_id: report.form_response_id,
            responder_id: report.responder_id,
            student_name: report.student_name,
            class_name: report.class_name,
            stage: report.stage,
            supervision_id: report.supervision_id,
            time_teacher_id: report.time_teacher_id,
            teacher_id: report.teacher_id,
            time_teacher_comment: None,
            teacher_comment: None,
            time_teacher_completed_at: None,
            teacher_completed_at: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.reports.insert(report.id, report.clone());
        report
    }

    /// 检查表单可写，返回可变引用
    fn editable_form(&mut self, form_id: i64) -> Result<&mut Form> {
        let form = self
            .forms
            .get_mut(&form_id)
            .ok_or_else(|| AcademyError::not_found("Form not found"))?;
        if form.status == FormStatus::Send {
            return Err(AcademyError::invalid_state(FORM_IS_SENT));
        }
        Ok(form)
    }

    fn form_questions(&self, form_id: i64) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .questions
            .values()
            .filter(|q| q.form_id == form_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.order_index);
        questions
    }

    /// 写入题目集：先准备模板并检查引用，全部通过后才修改表
    fn write_question_set(
        &mut self,
        form_id: i64,
        mut questions: Vec<Question>,
        templates: Vec<TemplatePlan>,
    ) -> Result<Vec<Question>> {
        let mut created = Vec::with_capacity(templates.len());
        for plan in templates {
            let template = self.build_template(plan.template);
            if let Some(question) = questions.get_mut(plan.question_index) {
                bind_template(question, template.id);
            }
            created.push(template);
        }

        let missing = referenced_templates(&questions).into_iter().any(|id| {
            !self.templates.contains_key(&id) && !created.iter().any(|t| t.id == id)
        });
        if missing {
            return Err(AcademyError::dependency_failure(
                "A referenced concept template does not exist",
            ));
        }

        for template in created {
            self.templates.insert(template.id, template);
        }

        let existing: HashSet<i64> = self
            .questions
            .values()
            .filter(|q| q.form_id == form_id)
            .filter_map(|q| q.id)
            .collect();

        let mut kept = HashSet::new();
        let mut saved = Vec::with_capacity(questions.len());
        for (index, mut question) in questions.into_iter().enumerate() {
            let id = match question.id {
                Some(id) if existing.contains(&id) => id,
                _ => self.next_id(),
            };
            kept.insert(id);
            question.id = Some(id);
            question.form_id = form_id;
            question.order_index = index as i32;
            self.questions.insert(id, question.clone());
            saved.push(question);
        }

        self.questions
            .retain(|id, q| q.form_id != form_id || kept.contains(id));
        Ok(saved)
    }
}

/// 内存存储
#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_group(
        &self,
        name: String,
        owner_id: i64,
        owner_display_name: String,
    ) -> Result<(Group, GroupMember)> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let group = Group {
            id: tables.next_id(),
            name,
            owner_id,
            created_at: now,
        };
        let member = GroupMember {
            id: tables.next_id(),
            group_id: group.id,
            user_id: owner_id,
            display_name: owner_display_name,
            role: Role::Admin,
            class_id: None,
            joined_at: now,
        };
        tables.groups.insert(group.id, group.clone());
        tables.members.insert(member.id, member.clone());
        Ok((group, member))
    }

    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>> {
        Ok(self.tables.lock().await.groups.get(&group_id).cloned())
    }

    async fn list_user_groups(&self, user_id: i64) -> Result<Vec<Group>> {
        let tables = self.tables.lock().await;
        let group_ids: HashSet<i64> = tables
            .members
            .values()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.group_id)
            .collect();
        let mut groups: Vec<Group> = tables
            .groups
            .values()
            .filter(|g| group_ids.contains(&g.id))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn create_class(&self, group_id: i64, name: String) -> Result<Class> {
        let mut tables = self.tables.lock().await;
        let class = Class {
            id: tables.next_id(),
            group_id,
            name,
            created_at: Utc::now(),
        };
        tables.classes.insert(class.id, class.clone());
        Ok(class)
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        Ok(self.tables.lock().await.classes.get(&class_id).cloned())
    }

    async fn list_classes(&self, group_id: i64) -> Result<Vec<Class>> {
        let tables = self.tables.lock().await;
        let mut classes: Vec<Class> = tables
            .classes
            .values()
            .filter(|c| c.group_id == group_id)
            .cloned()
            .collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(classes)
    }

    async fn upsert_member(
        &self,
        group_id: i64,
        req: UpsertMemberRequest,
    ) -> Result<GroupMember> {
        let mut tables = self.tables.lock().await;
        if let Some(member) = tables
            .members
            .values_mut()
            .find(|m| m.group_id == group_id && m.user_id == req.user_id)
        {
            member.display_name = req.display_name;
            member.role = req.role;
            member.class_id = req.class_id;
            return Ok(member.clone());
        }

        let member = GroupMember {
            id: tables.next_id(),
            group_id,
            user_id: req.user_id,
            display_name: req.display_name,
            role: req.role,
            class_id: req.class_id,
            joined_at: Utc::now(),
        };
        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn get_member(&self, group_id: i64, user_id: i64) -> Result<Option<GroupMember>> {
        Ok(self
            .tables
            .lock()
            .await
            .members
            .values()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_members(
        &self,
        group_id: i64,
        query: MemberListQuery,
    ) -> Result<Vec<GroupMember>> {
        let tables = self.tables.lock().await;
        let mut members: Vec<GroupMember> = tables
            .members
            .values()
            .filter(|m| m.group_id == group_id)
            .filter(|m| query.class_id.is_none() || m.class_id == query.class_id)
            .filter(|m| query.role.is_none_or(|role| m.role == role))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(members)
    }

    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.members.len();
        tables
            .members
            .retain(|_, m| !(m.group_id == group_id && m.user_id == user_id));
        Ok(tables.members.len() < before)
    }

    async fn upsert_supervision(
        &self,
        group_id: i64,
        time_teacher_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Result<SupervisionMapping> {
        Ok(self
            .tables
            .lock()
            .await
            .upsert_supervision(group_id, time_teacher_id, teacher_id))
    }

    async fn get_supervision_by_id(&self, id: i64) -> Result<Option<SupervisionMapping>> {
        Ok(self.tables.lock().await.supervisions.get(&id).cloned())
    }

    async fn create_form_bundle(&self, bundle: NewFormBundle) -> Result<FormBundle> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();

        // 题目引用检查在写入任何行之前完成
        let known_missing = referenced_templates(&bundle.questions)
            .into_iter()
            .any(|id| !tables.templates.contains_key(&id));
        if known_missing {
            return Err(AcademyError::dependency_failure(
                "A referenced concept template does not exist",
            ));
        }

        let group_id = bundle.form.group_id;
        let supervision = (!bundle.supervision.is_empty()).then(|| {
            tables.upsert_supervision(
                group_id,
                bundle.supervision.time_teacher_id,
                bundle.supervision.teacher_id,
            )
        });
        let supervision_id = supervision.as_ref().map(|s| s.id);

        let form = Form {
            id: tables.next_id(),
            group_id,
            creator_id: bundle.form.creator_id,
            title: bundle.form.title,
            description: bundle.form.description,
            status: FormStatus::Draft,
            supervision_id,
            created_at: now,
            updated_at: now,
        };
        tables.forms.insert(form.id, form.clone());

        let questions = tables.write_question_set(form.id, bundle.questions, bundle.templates)?;
        let report = tables.insert_report(NewReport::skeleton(
            group_id,
            form.id,
            supervision_id,
            bundle.supervision.time_teacher_id,
            bundle.supervision.teacher_id,
        ));

        Ok(FormBundle {
            form,
            questions,
            supervision,
            report,
        })
    }

    async fn get_form_by_id(&self, form_id: i64) -> Result<Option<Form>> {
        Ok(self.tables.lock().await.forms.get(&form_id).cloned())
    }

    async fn list_forms_with_pagination(&self, query: FormListQuery) -> Result<FormListResponse> {
        let tables = self.tables.lock().await;
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut forms: Vec<Form> = tables
            .forms
            .values()
            .filter(|f| f.group_id == query.group_id)
            .filter(|f| query.status.is_none_or(|s| f.status == s))
            .cloned()
            .collect();
        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        let total = forms.len() as u64;
        let items = forms
            .into_iter()
            .skip(((page - 1) * size) as usize)
            .take(size as usize)
            .collect();
        Ok(FormListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    async fn list_group_forms(&self, group_id: i64) -> Result<Vec<Form>> {
        Ok(self
            .tables
            .lock()
            .await
            .forms
            .values()
            .filter(|f| f.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn update_form_details(
        &self,
        form_id: i64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<Form>> {
        let mut tables = self.tables.lock().await;
        let Some(form) = tables.forms.get_mut(&form_id) else {
            return Ok(None);
        };
        if form.status == FormStatus::Send {
            return Err(AcademyError::invalid_state(FORM_IS_SENT));
        }
        if let Some(title) = title {
            form.title = title;
        }
        if let Some(description) = description {
            form.description = Some(description);
        }
        form.updated_at = Utc::now();
        Ok(Some(form.clone()))
    }

    async fn delete_form(&self, form_id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        tables.reports.retain(|_, r| r.form_id != form_id);
        tables.responses.retain(|_, r| r.form_id != form_id);
        tables.targets.remove(&form_id);
        tables.questions.retain(|_, q| q.form_id != form_id);
        Ok(tables.forms.remove(&form_id).is_some())
    }

    async fn replace_questions(
        &self,
        form_id: i64,
        questions: Vec<Question>,
        templates: Vec<TemplatePlan>,
        status: FormStatus,
    ) -> Result<Vec<Question>> {
        let mut tables = self.tables.lock().await;
        tables.editable_form(form_id)?;

        let saved = tables.write_question_set(form_id, questions, templates)?;
        let form = tables.editable_form(form_id)?;
        form.status = status;
        form.updated_at = Utc::now();
        Ok(saved)
    }

    async fn list_questions(&self, form_id: i64) -> Result<Vec<Question>> {
        Ok(self.tables.lock().await.form_questions(form_id))
    }

    async fn send_form(&self, form_id: i64, targets: Vec<FormTarget>) -> Result<Form> {
        let mut tables = self.tables.lock().await;
        let form = tables.editable_form(form_id)?;
        form.status = FormStatus::Send;
        form.updated_at = Utc::now();
        let form = form.clone();
        tables.targets.insert(form_id, targets);
        Ok(form)
    }

    async fn list_form_targets(&self, form_id: i64) -> Result<Vec<FormTarget>> {
        Ok(self
            .tables
            .lock()
            .await
            .targets
            .get(&form_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_concept_template(
        &self,
        template: NewConceptTemplate,
    ) -> Result<ConceptTemplate> {
        let mut tables = self.tables.lock().await;
        let template = tables.build_template(template);
        tables.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn get_concept_template(&self, template_id: i64) -> Result<Option<ConceptTemplate>> {
        Ok(self.tables.lock().await.templates.get(&template_id).cloned())
    }

    async fn list_concept_templates(&self, group_id: i64) -> Result<Vec<ConceptTemplate>> {
        let tables = self.tables.lock().await;
        let mut templates: Vec<ConceptTemplate> = tables
            .templates
            .values()
            .filter(|t| t.group_id == group_id)
            .cloned()
            .collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(templates)
    }

    async fn get_response(
        &self,
        form_id: i64,
        responder_id: i64,
    ) -> Result<Option<FormResponse>> {
        Ok(self
            .tables
            .lock()
            .await
            .responses
            .values()
            .find(|r| r.form_id == form_id && r.responder_id == responder_id)
            .cloned())
    }

    async fn submit_response(
        &self,
        response: NewFormResponse,
        report: ReportWrite,
    ) -> Result<(FormResponse, Report)> {
        let mut tables = self.tables.lock().await;

        // 报告比较并设置在写作答之前检查
        if let ReportWrite::Update { report, expected } = &report {
            let current = tables
                .reports
                .get(&report.id)
                .ok_or_else(|| AcademyError::not_found("Report not found"))?;
            let claimable = current
                .responder_id
                .is_none_or(|id| id == response.responder_id);
            if current.stage != *expected || !claimable {
                return Err(AcademyError::conflict(REPORT_CHANGED));
            }
        }

        let existing_id = tables
            .responses
            .values()
            .find(|r| r.form_id == response.form_id && r.responder_id == response.responder_id)
            .map(|r| r.id);
        let id = match existing_id {
            Some(id) => id,
            None => tables.next_id(),
        };
        let saved = FormResponse {
            id,
            form_id: response.form_id,
            responder_id: response.responder_id,
            answers: response.answers,
            submitted_at: Utc::now(),
        };
        tables.responses.insert(id, saved.clone());

        let report = match report {
            ReportWrite::Update { mut report, .. } => {
                report.form_response_id = Some(saved.id);
                tables.reports.insert(report.id, (*report).clone());
                *report
            }
            ReportWrite::Create(mut new_report) => {
                new_report.form_response_id = Some(saved.id);
                tables.insert_report(new_report)
            }
        };
        Ok((saved, report))
    }

    async fn get_report_by_id(&self, report_id: i64) -> Result<Option<Report>> {
        Ok(self.tables.lock().await.reports.get(&report_id).cloned())
    }

    async fn find_unclaimed_report(&self, form_id: i64) -> Result<Option<Report>> {
        Ok(self
            .tables
            .lock()
            .await
            .reports
            .values()
            .find(|r| {
                r.form_id == form_id
                    && r.responder_id.is_none()
                    && r.stage == ReportStage::AwaitingStudent
            })
            .cloned())
    }

    async fn find_report_by_responder(
        &self,
        form_id: i64,
        responder_id: i64,
    ) -> Result<Option<Report>> {
        Ok(self
            .tables
            .lock()
            .await
            .reports
            .values()
            .find(|r| r.form_id == form_id && r.responder_id == Some(responder_id))
            .cloned())
    }

    async fn list_reports(&self, query: ReportListQuery) -> Result<Vec<Report>> {
        let tables = self.tables.lock().await;
        let mut reports: Vec<Report> = tables
            .reports
            .values()
            .filter(|r| r.group_id == query.group_id)
            .filter(|r| query.form_id.is_none_or(|id| r.form_id == id))
            .filter(|r| {
                query
                    .class_name
                    .as_ref()
                    .is_none_or(|c| r.class_name.as_ref() == Some(c))
            })
            .filter(|r| query.stage.is_none_or(|s| r.stage == s))
            .filter(|r| query.responder_id.is_none() || r.responder_id == query.responder_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(reports)
    }

    async fn save_report(&self, report: Report, expected: ReportStage) -> Result<Report> {
        let mut tables = self.tables.lock().await;
        let current = tables
            .reports
            .get_mut(&report.id)
            .ok_or_else(|| AcademyError::not_found("Report not found"))?;
        if current.stage != expected {
            return Err(AcademyError::conflict(REPORT_CHANGED));
        }
        let created_at = current.created_at;
        *current = Report {
            created_at,
            ..report
        };
        Ok(current.clone())
    }

    async fn create_notification(&self, req: NewNotification) -> Result<Notification> {
        let mut tables = self.tables.lock().await;
        let notification = Notification {
            id: tables.next_id(),
            user_id: req.user_id,
            notification_type: req.notification_type,
            title: req.title,
            payload: req.payload,
            is_read: false,
            created_at: Utc::now(),
        };
        tables
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .values()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        match tables.notifications.get_mut(&notification_id) {
            Some(n) if n.user_id == user_id => {
                n.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::entities::NewForm;
    use crate::models::questions::entities::{
        ConceptItemDraft, ExamTemplateRef, QuestionConfig, QuestionType,
    };
    use crate::models::supervisions::entities::SupervisionAssignment;
    use crate::workflow::question_set::plan_exam_templates;

    fn bundle(questions: Vec<Question>) -> NewFormBundle {
        let templates = plan_exam_templates(&questions, 1, 7);
        NewFormBundle {
            form: NewForm {
                group_id: 1,
                creator_id: 7,
                title: "Weekly check".into(),
                description: None,
            },
            supervision: SupervisionAssignment::new(Some(20), Some(30)),
            questions,
            templates,
        }
    }

    fn exam_question() -> Question {
        let mut q = Question::new(0, 0, QuestionType::Exam);
        q.question_text = "Unit test".into();
        q.config = QuestionConfig::Exam {
            total_questions: 3,
            template: ExamTemplateRef::New {
                name: "Week 1".into(),
                items: vec![ConceptItemDraft {
                    text: "atom".into(),
                    description: String::new(),
                }],
            },
        };
        q
    }

    #[tokio::test]
    async fn test_supervision_upsert_returns_same_row() {
        let storage = MemoryStorage::new();
        let first = storage.upsert_supervision(1, Some(2), None).await.unwrap();
        let second = storage.upsert_supervision(1, Some(2), None).await.unwrap();
        let other = storage.upsert_supervision(1, Some(2), Some(3)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_ne!(first.id, other.id);
    }

    #[tokio::test]
    async fn test_bundle_creates_template_before_question() {
        let storage = MemoryStorage::new();
        let created = storage
            .create_form_bundle(bundle(vec![exam_question()]))
            .await
            .unwrap();

        let QuestionConfig::Exam { template, .. } = &created.questions[0].config else {
            panic!("expected exam question");
        };
        let template_id = template.template_id().expect("question must be rebound");
        let stored = storage.get_concept_template(template_id).await.unwrap();
        assert_eq!(stored.unwrap().items.len(), 1);

        assert_eq!(created.report.stage, ReportStage::AwaitingStudent);
        assert_eq!(created.report.supervision_id, created.form.supervision_id);
        assert_eq!(created.report.time_teacher_id, Some(20));
    }

    #[tokio::test]
    async fn test_missing_template_reference_writes_nothing() {
        let storage = MemoryStorage::new();
        let mut q = exam_question();
        q.config = QuestionConfig::Exam {
            total_questions: 3,
            template: ExamTemplateRef::Existing { template_id: 999 },
        };

        let err = storage.create_form_bundle(bundle(vec![q])).await.unwrap_err();
        assert!(matches!(err, AcademyError::DependencyFailure(_)));
        assert!(storage.list_group_forms(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sent_form_rejects_question_replacement() {
        let storage = MemoryStorage::new();
        let created = storage.create_form_bundle(bundle(vec![])).await.unwrap();
        let form_id = created.form.id;
        storage
            .send_form(form_id, vec![FormTarget::User { user_id: 5 }])
            .await
            .unwrap();

        let err = storage
            .replace_questions(
                form_id,
                vec![Question::new(form_id, 0, QuestionType::Text)],
                vec![],
                FormStatus::Save,
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), FORM_IS_SENT);
        assert!(storage.list_questions(form_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_report_compares_stage() {
        let storage = MemoryStorage::new();
        let created = storage.create_form_bundle(bundle(vec![])).await.unwrap();

        let mut report = created.report.clone();
        report.stage = ReportStage::AwaitingPartTime;
        let err = storage
            .save_report(report.clone(), ReportStage::AwaitingTeacher)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::Conflict(_)));

        let saved = storage
            .save_report(report, ReportStage::AwaitingStudent)
            .await
            .unwrap();
        assert_eq!(saved.stage, ReportStage::AwaitingPartTime);
    }
}
