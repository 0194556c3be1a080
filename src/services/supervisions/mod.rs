//! 督导关系：一审兼职教师与二审教师的组合

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::context::{AppContext, ensure_permission};
use crate::errors::{AcademyError, FieldError, Result};
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::groups::entities::Role;
use crate::models::supervisions::{
    entities::SupervisionMapping, requests::AssignSupervisionRequest,
};
use crate::permissions::Action;

/// 审阅人必须是群组成员且角色匹配
pub(crate) async fn validate_reviewers(
    ctx: &AppContext,
    group_id: i64,
    time_teacher_id: Option<i64>,
    teacher_id: Option<i64>,
) -> Result<()> {
    let mut errors = Vec::new();
    for (field, user_id, expected) in [
        ("time_teacher_id", time_teacher_id, Role::PartTime),
        ("teacher_id", teacher_id, Role::Teacher),
    ] {
        let Some(user_id) = user_id else {
            continue;
        };
        let member = ctx.storage.get_member(group_id, user_id).await?;
        match member {
            Some(m) if m.role == expected => {}
            Some(_) => errors.push(FieldError::new(field, format!("must be a {expected} member"))),
            None => errors.push(FieldError::new(field, "is not a member of this group")),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AcademyError::InvalidFields(errors))
    }
}

/// 指派审阅人组合，两者都为空时不建立关系
pub async fn assign_supervision(
    ctx: &AppContext,
    user: &CurrentUser,
    group_id: i64,
    req: AssignSupervisionRequest,
) -> Result<Option<SupervisionMapping>> {
    let actor = ctx.actor(group_id, user.id).await?;
    ensure_permission(actor, Action::AssignSupervision, None)?;
    if req.time_teacher_id.is_none() && req.teacher_id.is_none() {
        return Ok(None);
    }
    validate_reviewers(ctx, group_id, req.time_teacher_id, req.teacher_id).await?;

    let mapping = ctx
        .storage
        .upsert_supervision(group_id, req.time_teacher_id, req.teacher_id)
        .await?;
    info!("群组 {} 督导关系 {}", group_id, mapping.id);
    Ok(Some(mapping))
}

pub async fn get_supervision(
    ctx: &AppContext,
    user: &CurrentUser,
    supervision_id: i64,
) -> Result<SupervisionMapping> {
    let mapping = ctx
        .storage
        .get_supervision_by_id(supervision_id)
        .await?
        .ok_or_else(|| AcademyError::not_found("Supervision not found"))?;
    let actor = ctx.actor(mapping.group_id, user.id).await?;
    ensure_permission(actor, Action::ViewMembers, None)?;
    Ok(mapping)
}

pub struct SupervisionService;

impl SupervisionService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn assign_supervision(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
        req: AssignSupervisionRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let mapping = assign_supervision(&ctx, user, group_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(mapping, "督导关系已保存")))
    }

    pub async fn get_supervision(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        supervision_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let mapping = get_supervision(&ctx, user, supervision_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(mapping, "查询成功")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    fn pair(time_teacher_id: Option<i64>, teacher_id: Option<i64>) -> AssignSupervisionRequest {
        AssignSupervisionRequest {
            time_teacher_id,
            teacher_id,
        }
    }

    #[tokio::test]
    async fn test_same_pair_maps_to_one_row() {
        let f = fixture().await;
        let req = pair(Some(f.part_time.id), Some(f.teacher.id));
        let first = assign_supervision(&f.ctx, &f.teacher, f.group_id, req.clone())
            .await
            .unwrap()
            .unwrap();
        let second = assign_supervision(&f.ctx, &f.admin, f.group_id, req)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.id, second.id);

        let partial = assign_supervision(&f.ctx, &f.teacher, f.group_id, pair(None, Some(f.teacher.id)))
            .await
            .unwrap()
            .unwrap();
        assert_ne!(partial.id, first.id);

        let fetched = get_supervision(&f.ctx, &f.part_time, first.id).await.unwrap();
        assert_eq!(fetched, first);
    }

    #[tokio::test]
    async fn test_empty_pair_creates_nothing() {
        let f = fixture().await;
        let mapping = assign_supervision(&f.ctx, &f.teacher, f.group_id, pair(None, None))
            .await
            .unwrap();
        assert!(mapping.is_none());
    }

    #[tokio::test]
    async fn test_roles_are_checked_per_field() {
        let f = fixture().await;
        let err = assign_supervision(
            &f.ctx,
            &f.teacher,
            f.group_id,
            pair(Some(f.teacher.id), Some(99)),
        )
        .await
        .unwrap_err();
        let AcademyError::InvalidFields(fields) = err else {
            panic!("expected field errors");
        };
        let names: Vec<&str> = fields.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["time_teacher_id", "teacher_id"]);

        let err = assign_supervision(&f.ctx, &f.part_time, f.group_id, pair(None, Some(f.teacher.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::PermissionDenied(_)));
    }
}
