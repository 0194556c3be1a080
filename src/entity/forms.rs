//! 表单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub supervision_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::form_targets::Entity")]
    Targets,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::form_targets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Targets.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_form(self) -> crate::models::forms::entities::Form {
        use crate::models::forms::entities::{Form, FormStatus};

        Form {
            id: self.id,
            group_id: self.group_id,
            creator_id: self.creator_id,
            title: self.title,
            description: self.description,
            status: self.status.parse::<FormStatus>().unwrap_or(FormStatus::Draft),
            supervision_id: self.supervision_id,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
