use tracing::info;

use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::groups::{entities::Group, requests::CreateGroupRequest};
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};

/// 创建群组，创建者成为管理员
pub async fn create_group(
    ctx: &AppContext,
    user: &CurrentUser,
    req: CreateGroupRequest,
) -> Result<Group> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AcademyError::invalid_field("name", "must not be empty"));
    }
    let display_name = req
        .display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| user.name.clone());

    let (group, _) = ctx
        .storage
        .create_group(name.to_string(), user.id, display_name)
        .await?;
    info!("用户 {} 创建群组 {}", user.id, group.id);
    Ok(group)
}

pub async fn list_my_groups(ctx: &AppContext, user: &CurrentUser) -> Result<Vec<Group>> {
    ctx.storage.list_user_groups(user.id).await
}

pub async fn get_group(ctx: &AppContext, user: &CurrentUser, group_id: i64) -> Result<Group> {
    let group = ctx
        .storage
        .get_group_by_id(group_id)
        .await?
        .ok_or_else(|| AcademyError::not_found("Group not found"))?;
    let actor = ctx.actor(group.id, user.id).await?;
    ensure_permission(actor, Action::ViewGroup, None)?;
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::groups::entities::Role;
    use crate::services::test_support::{fixture, memory_context, user};

    #[tokio::test]
    async fn test_creator_becomes_admin() {
        let ctx = memory_context();
        let owner = user(8, "Director Han");
        let group = create_group(
            &ctx,
            &owner,
            CreateGroupRequest {
                name: "South Academy".into(),
                display_name: None,
            },
        )
        .await
        .unwrap();

        let member = ctx.member(group.id, owner.id).await.unwrap();
        assert_eq!(member.role, Role::Admin);
        assert_eq!(member.display_name, "Director Han");
        assert_eq!(list_my_groups(&ctx, &owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_group_visible_to_members_only() {
        let f = fixture().await;
        assert_eq!(
            get_group(&f.ctx, &f.student, f.group_id).await.unwrap().name,
            "North Academy"
        );
        let err = get_group(&f.ctx, &user(60, "Guest"), f.group_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));

        let err = create_group(
            &f.ctx,
            &f.student,
            CreateGroupRequest {
                name: "  ".into(),
                display_name: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::InvalidFields(_)));
    }
}
