//! 成员管理，成员变更后清除成员缓存

use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::groups::{
    entities::{GroupMember, Role},
    requests::{MemberListQuery, UpsertMemberRequest},
};
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};

/// 添加成员或修改已有成员
///
/// 邀请新成员需要 `member:invite`；修改角色或授予管理员需要 `member:update_role`。
pub async fn upsert_member(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
    req: UpsertMemberRequest,
) -> Result<GroupMember> {
    let actor = ctx.actor(group_id, user.id).await?;
    let existing = ctx.storage.get_member(group_id, req.user_id).await?;

    let role_change = existing.as_ref().is_some_and(|m| m.role != req.role);
    let action = if role_change || req.role == Role::Admin {
        Action::UpdateMemberRole
    } else {
        Action::InviteMember
    };
    ensure_permission(actor, action, None)?;

    if req.display_name.trim().is_empty() {
        return Err(AcademyError::invalid_field("display_name", "must not be empty"));
    }
    if let Some(class_id) = req.class_id {
        let class = ctx.storage.get_class_by_id(class_id).await?;
        if class.is_none_or(|c| c.group_id != group_id) {
            return Err(AcademyError::invalid_field("class_id", "class is not in this group"));
        }
    }
    if role_change && let Some(group) = ctx.storage.get_group_by_id(group_id).await?
        && group.owner_id == req.user_id
    {
        return Err(AcademyError::invalid_state("The group owner must stay an admin"));
    }

    let member = ctx.storage.upsert_member(group_id, req).await?;
    ctx.membership.invalidate(group_id, member.user_id).await;
    info!(
        "群组 {} 成员 {} 角色为 {}",
        group_id, member.user_id, member.role
    );
    Ok(member)
}

pub async fn list_members(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
    query: MemberListQuery,
) -> Result<Vec<GroupMember>> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::ViewMembers, None)?;
    ctx.storage.list_members(group_id, query).await
}

pub async fn remove_member(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
    user_id: i64,
) -> Result<()> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::RemoveMember, None)?;

    let group = ctx
        .storage
        .get_group_by_id(group_id)
        .await?
        .ok_or_else(|| AcademyError::not_found("Group not found"))?;
    if group.owner_id == user_id {
        return Err(AcademyError::invalid_state("The group owner cannot be removed"));
    }
    if !ctx.storage.remove_member(group_id, user_id).await? {
        return Err(AcademyError::not_found("Member not found"));
    }
    ctx.membership.invalidate(group_id, user_id).await;
    info!("群组 {} 移除成员 {}", group_id, user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    fn member(user_id: i64, role: Role, class_id: Option<i64>) -> UpsertMemberRequest {
        UpsertMemberRequest {
            user_id,
            display_name: format!("User {user_id}"),
            role,
            class_id,
        }
    }

    #[tokio::test]
    async fn test_teacher_invites_but_cannot_promote() {
        let f = fixture().await;
        let added = upsert_member(&f.ctx, &f.teacher, f.group_id, member(30, Role::Student, Some(f.class_id)))
            .await
            .unwrap();
        assert_eq!(added.class_id, Some(f.class_id));

        let err = upsert_member(&f.ctx, &f.teacher, f.group_id, member(30, Role::Teacher, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        let err = upsert_member(&f.ctx, &f.teacher, f.group_id, member(31, Role::Admin, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_role_change_takes_effect_immediately() {
        let f = fixture().await;
        // 先读一次让角色进入缓存
        assert_eq!(f.ctx.actor(f.group_id, f.student.id).await.unwrap().role, Role::Student);

        upsert_member(&f.ctx, &f.admin, f.group_id, member(f.student.id, Role::PartTime, None))
            .await
            .unwrap();
        assert_eq!(f.ctx.actor(f.group_id, f.student.id).await.unwrap().role, Role::PartTime);

        remove_member(&f.ctx, &f.admin, f.group_id, f.student.id).await.unwrap();
        let err = f.ctx.actor(f.group_id, f.student.id).await.unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_owner_is_protected() {
        let f = fixture().await;
        let err = remove_member(&f.ctx, &f.admin, f.group_id, f.admin.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));

        let err = upsert_member(&f.ctx, &f.admin, f.group_id, member(f.admin.id, Role::Teacher, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_member_filters_and_class_check() {
        let f = fixture().await;
        let students = list_members(
            &f.ctx,
            &f.part_time,
            f.group_id,
            MemberListQuery {
                class_id: Some(f.class_id),
                role: Some(Role::Student),
            },
        )
        .await
        .unwrap();
        assert_eq!(students.len(), 2);

        let err = upsert_member(&f.ctx, &f.admin, f.group_id, member(40, Role::Student, Some(9_999)))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));

        let err = remove_member(&f.ctx, &f.admin, f.group_id, 404).await.unwrap_err();
        assert!(matches!(err, AcademyError::NotFound(_)));
    }
}
