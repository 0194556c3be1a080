//! 群组成员实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub role: String,
    pub class_id: Option<i64>,
    pub joined_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_member(self) -> crate::models::groups::entities::GroupMember {
        use crate::models::groups::entities::{GroupMember, Role};

        GroupMember {
            id: self.id,
            group_id: self.group_id,
            user_id: self.user_id,
            display_name: self.display_name,
            // 未知角色按最低权限处理
            role: self.role.parse::<Role>().unwrap_or(Role::Student),
            class_id: self.class_id,
            joined_at: super::to_datetime(self.joined_at),
        }
    }
}
