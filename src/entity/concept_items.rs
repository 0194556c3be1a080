//! 概念模板条目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "concept_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub template_id: i64,
    pub text: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub order_index: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::concept_templates::Entity",
        from = "Column::TemplateId",
        to = "super::concept_templates::Column::Id"
    )]
    Template,
}

impl Related<super::concept_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_item(self) -> crate::models::concept_templates::entities::ConceptItem {
        crate::models::concept_templates::entities::ConceptItem {
            text: self.text,
            description: self.description,
            order_index: self.order_index,
        }
    }
}
