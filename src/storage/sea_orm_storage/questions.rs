//! 题目存储操作
//!
//! 题目集总是整体读取、整体写回：已有 id 原地更新，新题目插入，缺失的删除。

use std::collections::HashSet;

use super::concept_templates::{ensure_templates_exist, insert_concept_template};
use super::forms::claim_editable_form;
use super::{SeaOrmStorage, commit};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{AcademyError, Result};
use crate::models::forms::entities::FormStatus;
use crate::models::questions::entities::Question;
use crate::workflow::question_set::{TemplatePlan, bind_template, referenced_templates};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::error;

fn question_values(form_id: i64, order_index: i32, question: &Question) -> Result<ActiveModel> {
    Ok(ActiveModel {
        form_id: Set(form_id),
        order_index: Set(order_index),
        is_required: Set(question.is_required),
        question_text: Set(question.question_text.clone()),
        question_type: Set(question.question_type().to_string()),
        config: Set(serde_json::to_string(&question.config)?),
        ..Default::default()
    })
}

/// 写入题目集
///
/// 先创建新模板并把题目改为引用它，模板失败则整个写入失败。
pub(super) async fn write_question_set<C: ConnectionTrait>(
    conn: &C,
    form_id: i64,
    mut questions: Vec<Question>,
    templates: Vec<TemplatePlan>,
) -> Result<Vec<Question>> {
    for plan in templates {
        let template = insert_concept_template(conn, plan.template)
            .await
            .map_err(|e| {
                error!("为题目 {} 创建概念模板失败: {}", plan.question_index, e);
                AcademyError::dependency_failure("Concept template could not be created")
            })?;
        if let Some(question) = questions.get_mut(plan.question_index) {
            bind_template(question, template.id);
        }
    }
    ensure_templates_exist(conn, &referenced_templates(&questions)).await?;

    let existing: HashSet<i64> = Questions::find()
        .filter(Column::FormId.eq(form_id))
        .all(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("查询题目失败: {e}")))?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let mut kept = HashSet::new();
    let mut saved = Vec::with_capacity(questions.len());
    for (index, question) in questions.iter().enumerate() {
        let mut model = question_values(form_id, index as i32, question)?;
        let result = match question.id {
            Some(id) if existing.contains(&id) => {
                model.id = Set(id);
                kept.insert(id);
                model.update(conn).await
            }
            _ => model.insert(conn).await,
        }
        .map_err(|e| AcademyError::database_operation(format!("写入题目失败: {e}")))?;
        saved.push(result.into_question()?);
    }

    let removed: Vec<i64> = existing.difference(&kept).copied().collect();
    if !removed.is_empty() {
        Questions::delete_many()
            .filter(Column::Id.is_in(removed))
            .exec(conn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除题目失败: {e}")))?;
    }

    Ok(saved)
}

impl SeaOrmStorage {
    pub async fn replace_questions_impl(
        &self,
        form_id: i64,
        questions: Vec<Question>,
        templates: Vec<TemplatePlan>,
        status: FormStatus,
    ) -> Result<Vec<Question>> {
        let txn = self.begin().await?;
        claim_editable_form(&txn, form_id, Some(status)).await?;
        let saved = write_question_set(&txn, form_id, questions, templates).await?;
        commit(txn).await?;
        Ok(saved)
    }

    pub async fn list_questions_impl(&self, form_id: i64) -> Result<Vec<Question>> {
        Questions::find()
            .filter(Column::FormId.eq(form_id))
            .order_by_asc(Column::OrderIndex)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询题目列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_question())
            .collect()
    }
}
