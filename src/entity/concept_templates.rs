//! 概念模板实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "concept_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub group_id: i64,
    pub creator_id: i64,
    pub concept_count: i32,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::concept_items::Entity")]
    Items,
}

impl Related<super::concept_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_template(
        self,
        items: Vec<super::concept_items::Model>,
    ) -> crate::models::concept_templates::entities::ConceptTemplate {
        use crate::models::concept_templates::entities::{ConceptTemplate, TemplateStatus};

        let mut items: Vec<_> = items.into_iter().map(|m| m.into_item()).collect();
        items.sort_by_key(|item| item.order_index);

        ConceptTemplate {
            id: self.id,
            name: self.name,
            group_id: self.group_id,
            creator_id: self.creator_id,
            concept_count: self.concept_count,
            status: self
                .status
                .parse::<TemplateStatus>()
                .unwrap_or(TemplateStatus::Draft),
            items,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
