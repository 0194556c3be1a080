//! 服务测试共用的内存环境

use std::sync::Arc;

use super::context::AppContext;
use super::forms::{create::create_form, send::send_form};
use super::responses::submit::submit_response;
use crate::cache::object_cache::MokaCacheWrapper;
use crate::config::WorkflowConfig;
use crate::middlewares::CurrentUser;
use crate::models::forms::{
    entities::FormTarget,
    requests::{CreateFormRequest, SendFormRequest},
    responses::FormBundle,
};
use crate::models::questions::{
    entities::{QuestionConfig, QuestionType},
    requests::QuestionInput,
};
use crate::models::groups::{entities::Role, requests::UpsertMemberRequest};
use crate::models::reports::responses::ReportView;
use crate::models::responses::{
    entities::{Answer, AnswerValue},
    requests::SubmitResponseRequest,
};
use crate::storage::{Storage, memory_storage::MemoryStorage};

pub struct Fixture {
    pub ctx: AppContext,
    pub group_id: i64,
    pub class_id: i64,
    pub admin: CurrentUser,
    pub teacher: CurrentUser,
    pub part_time: CurrentUser,
    pub student: CurrentUser,
    pub other_student: CurrentUser,
}

pub fn user(id: i64, name: &str) -> CurrentUser {
    CurrentUser {
        id,
        name: name.to_string(),
    }
}

pub fn memory_context() -> AppContext {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    AppContext::new(
        storage,
        Arc::new(MokaCacheWrapper::new(1_000, 60)),
        60,
        WorkflowConfig::default(),
    )
}

/// 一个群组：管理员、教师、兼职教师，以及同班的两名学生
pub async fn fixture() -> Fixture {
    let ctx = memory_context();
    let admin = user(1, "Admin");
    let teacher = user(2, "Teacher Park");
    let part_time = user(3, "Tutor Lee");
    let student = user(4, "Student Kim");
    let other_student = user(5, "Student Choi");

    let (group, _) = ctx
        .storage
        .create_group("North Academy".into(), admin.id, admin.name.clone())
        .await
        .unwrap();
    let class = ctx
        .storage
        .create_class(group.id, "Class A".into())
        .await
        .unwrap();

    for (member, role, class_id) in [
        (&teacher, Role::Teacher, None),
        (&part_time, Role::PartTime, None),
        (&student, Role::Student, Some(class.id)),
        (&other_student, Role::Student, Some(class.id)),
    ] {
        ctx.storage
            .upsert_member(
                group.id,
                UpsertMemberRequest {
                    user_id: member.id,
                    display_name: member.name.clone(),
                    role,
                    class_id,
                },
            )
            .await
            .unwrap();
    }

    Fixture {
        ctx,
        group_id: group.id,
        class_id: class.id,
        admin,
        teacher,
        part_time,
        student,
        other_student,
    }
}

/// 一道必答评分题的建表请求
pub fn create_request(group_id: i64) -> CreateFormRequest {
    CreateFormRequest {
        group_id,
        title: "Weekly check".into(),
        description: None,
        time_teacher_id: None,
        teacher_id: None,
        questions: vec![QuestionInput {
            id: None,
            is_required: true,
            question_text: "How was class?".into(),
            config: QuestionConfig::default_for(QuestionType::Rating),
        }],
    }
}

/// 指派审阅人并发送给班级的表单
pub async fn sent_form(f: &Fixture) -> FormBundle {
    let mut req = create_request(f.group_id);
    req.time_teacher_id = Some(f.part_time.id);
    req.teacher_id = Some(f.teacher.id);
    let bundle = create_form(&f.ctx, &f.teacher, req).await.unwrap();

    send_form(
        &f.ctx,
        &f.teacher,
        bundle.form.id,
        SendFormRequest {
            targets: vec![FormTarget::Class {
                class_id: f.class_id,
            }],
        },
    )
    .await
    .unwrap();
    bundle
}

/// 学生作答后进入一审的报告
pub async fn submitted_report(f: &Fixture, student: &CurrentUser) -> (FormBundle, ReportView) {
    let bundle = sent_form(f).await;
    let report = submit_for(f, &bundle, student).await;
    (bundle, report)
}

/// 在已发送的表单上提交一份评分作答
pub async fn submit_for(f: &Fixture, bundle: &FormBundle, student: &CurrentUser) -> ReportView {
    let question_id = f.ctx.storage.list_questions(bundle.form.id).await.unwrap()[0]
        .id
        .unwrap();
    submit_response(
        &f.ctx,
        student,
        bundle.form.id,
        SubmitResponseRequest {
            answers: vec![Answer {
                question_id,
                value: AnswerValue::Rating { value: 4 },
            }],
        },
    )
    .await
    .unwrap()
    .report
}
