//! 接收对象解析

use std::collections::BTreeSet;

use crate::errors::{FieldError, Result};
use crate::models::forms::entities::{Form, FormStatus, FormTarget};
use crate::models::groups::entities::Role;
use crate::models::groups::requests::MemberListQuery;
use crate::permissions::PermissionContext;
use crate::services::context::AppContext;
use crate::storage::Storage;
use crate::workflow::Actor;

/// 解析接收对象对应的用户，返回去重后的用户 id 与无法解析的对象
pub(crate) async fn collect_recipients(
    storage: &dyn Storage,
    group_id: i64,
    targets: &[FormTarget],
) -> Result<(Vec<i64>, Vec<FieldError>)> {
    let mut users = BTreeSet::new();
    let mut errors = Vec::new();

    for (i, target) in targets.iter().enumerate() {
        let field = format!("targets[{i}]");
        match *target {
            FormTarget::Class { class_id } => {
                let class = storage.get_class_by_id(class_id).await?;
                if class.is_none_or(|c| c.group_id != group_id) {
                    errors.push(FieldError::new(field, "class is not in this group"));
                    continue;
                }
                let members = storage
                    .list_members(
                        group_id,
                        MemberListQuery {
                            class_id: Some(class_id),
                            role: None,
                        },
                    )
                    .await?;
                users.extend(members.into_iter().map(|m| m.user_id));
            }
            FormTarget::User { user_id } => {
                if storage.get_member(group_id, user_id).await?.is_some() {
                    users.insert(user_id);
                } else {
                    errors.push(FieldError::new(field, "user is not a member of this group"));
                }
            }
        }
    }

    Ok((users.into_iter().collect(), errors))
}

/// 表单的权限上下文；学生只能访问已发送给自己的表单
pub(crate) async fn form_access_context(
    ctx: &AppContext,
    form: &Form,
    actor: Actor,
) -> Result<PermissionContext> {
    let mut context = PermissionContext::for_user(actor.user_id)
        .owned_by(form.creator_id)
        .in_group(form.group_id);

    if actor.role == Role::Student {
        let recipients = if form.status == FormStatus::Send {
            let targets = ctx.storage.list_form_targets(form.id).await?;
            collect_recipients(ctx.storage.as_ref(), form.group_id, &targets)
                .await?
                .0
        } else {
            Vec::new()
        };
        context = context.assigned_to(recipients);
    }

    Ok(context)
}
