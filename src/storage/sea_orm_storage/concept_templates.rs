//! 概念模板存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, commit};
use crate::entity::concept_items::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as ConceptItems,
};
use crate::entity::concept_templates::{ActiveModel, Column, Entity as ConceptTemplates};
use crate::errors::{AcademyError, Result};
use crate::models::concept_templates::entities::{ConceptTemplate, NewConceptTemplate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// 写入模板及其条目
pub(super) async fn insert_concept_template<C: ConnectionTrait>(
    conn: &C,
    template: NewConceptTemplate,
) -> Result<ConceptTemplate> {
    let model = ActiveModel {
        name: Set(template.name),
        group_id: Set(template.group_id),
        creator_id: Set(template.creator_id),
        concept_count: Set(template.concept_count),
        status: Set(template.status.to_string()),
        created_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| AcademyError::database_operation(format!("创建概念模板失败: {e}")))?;

    let mut items = Vec::with_capacity(template.items.len());
    for item in template.items {
        let saved = ItemActiveModel {
            template_id: Set(model.id),
            text: Set(item.text),
            description: Set(item.description),
            order_index: Set(item.order_index),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建模板条目失败: {e}")))?;
        items.push(saved);
    }

    Ok(model.into_template(items))
}

/// 模板必须存在，否则题目不能引用
pub(super) async fn ensure_templates_exist<C: ConnectionTrait>(
    conn: &C,
    template_ids: &[i64],
) -> Result<()> {
    if template_ids.is_empty() {
        return Ok(());
    }

    let found = ConceptTemplates::find()
        .filter(Column::Id.is_in(template_ids.iter().copied()))
        .count(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("查询概念模板失败: {e}")))?;

    if found as usize != template_ids.len() {
        return Err(AcademyError::dependency_failure(
            "A referenced concept template does not exist",
        ));
    }
    Ok(())
}

impl SeaOrmStorage {
    pub async fn create_concept_template_impl(
        &self,
        template: NewConceptTemplate,
    ) -> Result<ConceptTemplate> {
        let txn = self.begin().await?;
        let template = insert_concept_template(&txn, template).await?;
        commit(txn).await?;
        Ok(template)
    }

    pub async fn get_concept_template_impl(
        &self,
        template_id: i64,
    ) -> Result<Option<ConceptTemplate>> {
        let Some(model) = ConceptTemplates::find_by_id(template_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询概念模板失败: {e}")))?
        else {
            return Ok(None);
        };

        let items = ConceptItems::find()
            .filter(ItemColumn::TemplateId.eq(template_id))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询模板条目失败: {e}")))?;

        Ok(Some(model.into_template(items)))
    }

    pub async fn list_concept_templates_impl(&self, group_id: i64) -> Result<Vec<ConceptTemplate>> {
        let templates = ConceptTemplates::find()
            .filter(Column::GroupId.eq(group_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询概念模板列表失败: {e}")))?;

        if templates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = templates.iter().map(|t| t.id).collect();
        let mut items_by_template: HashMap<i64, Vec<_>> = HashMap::new();
        for item in ConceptItems::find()
            .filter(ItemColumn::TemplateId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询模板条目失败: {e}")))?
        {
            items_by_template
                .entry(item.template_id)
                .or_default()
                .push(item);
        }

        Ok(templates
            .into_iter()
            .map(|t| {
                let items = items_by_template.remove(&t.id).unwrap_or_default();
                t.into_template(items)
            })
            .collect())
    }
}
