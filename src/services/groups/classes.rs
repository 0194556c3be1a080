use crate::errors::{AcademyError, Result};
use crate::middlewares::CurrentUser;
use crate::models::groups::{entities::Class, requests::CreateClassRequest};
use crate::permissions::Action;
use crate::services::context::{AppContext, ensure_permission};

/// 创建班级，同一群组内班级名不能重复
pub async fn create_class(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
    req: CreateClassRequest,
) -> Result<Class> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::CreateClass, None)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AcademyError::invalid_field("name", "must not be empty"));
    }
    let existing = ctx.storage.list_classes(group_id).await?;
    if existing.iter().any(|c| c.name == name) {
        return Err(AcademyError::conflict(format!("Class '{name}' already exists")));
    }
    ctx.storage.create_class(group_id, name.to_string()).await
}

pub async fn list_classes(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
) -> Result<Vec<Class>> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::ViewClass, None)?;
    ctx.storage.list_classes(group_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    #[tokio::test]
    async fn test_class_names_are_unique() {
        let f = fixture().await;
        let class = create_class(
            &f.ctx,
            &f.teacher,
            f.group_id,
            CreateClassRequest {
                name: "Class B".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(class.group_id, f.group_id);

        let err = create_class(
            &f.ctx,
            &f.admin,
            f.group_id,
            CreateClassRequest {
                name: " Class A ".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::Conflict(_)));

        let names: Vec<String> = list_classes(&f.ctx, &f.student, f.group_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Class A", "Class B"]);
    }

    #[tokio::test]
    async fn test_part_time_cannot_create_class() {
        let f = fixture().await;
        let err = create_class(
            &f.ctx,
            &f.part_time,
            f.group_id,
            CreateClassRequest {
                name: "Class C".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }
}
