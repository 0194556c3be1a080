//! 督导关系实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "supervision_mappings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    pub time_teacher_id: Option<i64>,
    pub teacher_id: Option<i64>,
    #[sea_orm(unique)]
    pub assignment_key: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_supervision(self) -> crate::models::supervisions::entities::SupervisionMapping {
        use crate::models::supervisions::entities::SupervisionMapping;

        SupervisionMapping {
            id: self.id,
            group_id: self.group_id,
            time_teacher_id: self.time_teacher_id,
            teacher_id: self.teacher_id,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
