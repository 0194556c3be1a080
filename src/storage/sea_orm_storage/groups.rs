//! 群组、班级与成员存储操作

use super::{SeaOrmStorage, commit};
use crate::entity::classes::{
    ActiveModel as ClassActiveModel, Column as ClassColumn, Entity as Classes,
};
use crate::entity::group_members::{
    ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as GroupMembers,
};
use crate::entity::groups::{ActiveModel, Column, Entity as Groups};
use crate::errors::{AcademyError, Result};
use crate::models::groups::{
    entities::{Class, Group, GroupMember, Role},
    requests::{MemberListQuery, UpsertMemberRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建群组，创建者作为管理员加入
    pub async fn create_group_impl(
        &self,
        name: String,
        owner_id: i64,
        owner_display_name: String,
    ) -> Result<(Group, GroupMember)> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.begin().await?;

        let group = ActiveModel {
            name: Set(name),
            owner_id: Set(owner_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建群组失败: {e}")))?;

        let member = MemberActiveModel {
            group_id: Set(group.id),
            user_id: Set(owner_id),
            display_name: Set(owner_display_name),
            role: Set(Role::Admin.to_string()),
            class_id: Set(None),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("添加群组管理员失败: {e}")))?;

        commit(txn).await?;
        Ok((group.into_group(), member.into_member()))
    }

    /// 通过 ID 获取群组
    pub async fn get_group_by_id_impl(&self, group_id: i64) -> Result<Option<Group>> {
        let result = Groups::find_by_id(group_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询群组失败: {e}")))?;

        Ok(result.map(|m| m.into_group()))
    }

    /// 列出用户所在的群组
    pub async fn list_user_groups_impl(&self, user_id: i64) -> Result<Vec<Group>> {
        let group_ids: Vec<i64> = GroupMembers::find()
            .filter(MemberColumn::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询成员关系失败: {e}")))?
            .into_iter()
            .map(|m| m.group_id)
            .collect();

        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let groups = Groups::find()
            .filter(Column::Id.is_in(group_ids))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询群组列表失败: {e}")))?;

        Ok(groups.into_iter().map(|m| m.into_group()).collect())
    }

    /// 创建班级
    pub async fn create_class_impl(&self, group_id: i64, name: String) -> Result<Class> {
        let model = ClassActiveModel {
            group_id: Set(group_id),
            name: Set(name),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 列出群组内的班级
    pub async fn list_classes_impl(&self, group_id: i64) -> Result<Vec<Class>> {
        let classes = Classes::find()
            .filter(ClassColumn::GroupId.eq(group_id))
            .order_by_asc(ClassColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 添加或更新成员
    pub async fn upsert_member_impl(
        &self,
        group_id: i64,
        req: UpsertMemberRequest,
    ) -> Result<GroupMember> {
        let existing = GroupMembers::find()
            .filter(MemberColumn::GroupId.eq(group_id))
            .filter(MemberColumn::UserId.eq(req.user_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询成员失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut model = model.into_active_model();
                model.display_name = Set(req.display_name);
                model.role = Set(req.role.to_string());
                model.class_id = Set(req.class_id);
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| AcademyError::database_operation(format!("更新成员失败: {e}")))?
            }
            None => MemberActiveModel {
                group_id: Set(group_id),
                user_id: Set(req.user_id),
                display_name: Set(req.display_name),
                role: Set(req.role.to_string()),
                class_id: Set(req.class_id),
                joined_at: Set(chrono::Utc::now().timestamp()),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("添加成员失败: {e}")))?,
        };

        Ok(result.into_member())
    }

    /// 获取成员
    pub async fn get_member_impl(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<GroupMember>> {
        let result = GroupMembers::find()
            .filter(MemberColumn::GroupId.eq(group_id))
            .filter(MemberColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询成员失败: {e}")))?;

        Ok(result.map(|m| m.into_member()))
    }

    /// 列出成员
    pub async fn list_members_impl(
        &self,
        group_id: i64,
        query: MemberListQuery,
    ) -> Result<Vec<GroupMember>> {
        let mut select = GroupMembers::find().filter(MemberColumn::GroupId.eq(group_id));

        if let Some(class_id) = query.class_id {
            select = select.filter(MemberColumn::ClassId.eq(class_id));
        }
        if let Some(role) = query.role {
            select = select.filter(MemberColumn::Role.eq(role.to_string()));
        }

        let members = select
            .order_by_asc(MemberColumn::DisplayName)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询成员列表失败: {e}")))?;

        Ok(members.into_iter().map(|m| m.into_member()).collect())
    }

    /// 移除成员
    pub async fn remove_member_impl(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let result = GroupMembers::delete_many()
            .filter(MemberColumn::GroupId.eq(group_id))
            .filter(MemberColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("移除成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
