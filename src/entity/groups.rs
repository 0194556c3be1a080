//! 群组实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
    #[sea_orm(has_many = "super::group_members::Entity")]
    Members,
    #[sea_orm(has_many = "super::forms::Entity")]
    Forms,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_group(self) -> crate::models::groups::entities::Group {
        use crate::models::groups::entities::Group;

        Group {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
