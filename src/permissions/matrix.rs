use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use super::actions::{Action, Capability};
use crate::models::groups::entities::Role;

const TEACHER_ACTIONS: &[Action] = &[
    Action::ViewGroup,
    Action::ViewClass,
    Action::CreateClass,
    Action::UpdateClass,
    Action::ViewMembers,
    Action::InviteMember,
    Action::ViewStudent,
    Action::ViewForm,
    Action::CreateForm,
    Action::UpdateForm,
    Action::DeleteForm,
    Action::SendForm,
    Action::DuplicateForm,
    Action::CreateQuestion,
    Action::UpdateQuestion,
    Action::DeleteQuestion,
    Action::ViewTemplate,
    Action::CreateTemplate,
    Action::AssignSupervision,
    Action::ViewReport,
    Action::UpdateReportStage2,
    Action::RejectReport,
    Action::ViewStatistics,
];

const PART_TIME_ACTIONS: &[Action] = &[
    Action::ViewGroup,
    Action::ViewClass,
    Action::ViewMembers,
    Action::ViewStudent,
    Action::ViewForm,
    Action::ViewTemplate,
    Action::ViewReport,
    Action::UpdateReportStage1,
    Action::RejectReport,
    Action::ViewStatistics,
];

const STUDENT_ACTIONS: &[Action] = &[
    Action::ViewGroup,
    Action::ViewClass,
    Action::ViewForm,
    Action::RespondForm,
    Action::ViewReport,
];

/// 角色授权表，进程内只构建一次，之后只读
static ROLE_PERMISSIONS: Lazy<HashMap<Role, HashSet<Action>>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(Role::Admin, Action::ALL.iter().copied().collect());
    table.insert(Role::Teacher, TEACHER_ACTIONS.iter().copied().collect());
    table.insert(Role::PartTime, PART_TIME_ACTIONS.iter().copied().collect());
    table.insert(Role::Student, STUDENT_ACTIONS.iter().copied().collect());
    table
});

/// 获取角色的全部授权
pub fn role_permissions(role: Role) -> &'static HashSet<Action> {
    static EMPTY: Lazy<HashSet<Action>> = Lazy::new(HashSet::new);
    ROLE_PERMISSIONS.get(&role).unwrap_or(&EMPTY)
}

/// 上下文信息，用于在基础授权之上做归属/指派收窄
#[derive(Debug, Clone, Default)]
pub struct PermissionContext {
    pub owner_id: Option<i64>,
    pub user_id: Option<i64>,
    pub group_id: Option<i64>,
    pub class_id: Option<i64>,
    pub assigned_to: Option<Vec<i64>>,
}

impl PermissionContext {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn owned_by(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn in_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn in_class(mut self, class_id: Option<i64>) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn assigned_to(mut self, users: Vec<i64>) -> Self {
        self.assigned_to = Some(users);
        self
    }

    fn is_owner(&self) -> bool {
        matches!((self.owner_id, self.user_id), (Some(owner), Some(user)) if owner == user)
    }

    /// 未提供指派列表时放行，否则要求当前用户在列表中
    fn passes_assignment(&self) -> bool {
        match &self.assigned_to {
            None => true,
            Some(assigned) => self
                .user_id
                .map(|user| assigned.contains(&user))
                .unwrap_or(false),
        }
    }
}

/// 检查角色是否拥有某个动作的权限
///
/// 基础授权不存在时直接拒绝；提供上下文时再做收窄。
pub fn has_permission(role: Role, action: Action, context: Option<&PermissionContext>) -> bool {
    if !role_permissions(role).contains(&action) {
        return false;
    }

    let Some(ctx) = context else {
        return true;
    };

    if role == Role::Admin || ctx.is_owner() {
        return true;
    }

    match role {
        Role::Student
            if action.has_capability(Capability::Read)
                || action.has_capability(Capability::Respond) =>
        {
            ctx.passes_assignment()
        }
        Role::PartTime
            if action.has_capability(Capability::ClassScoped)
                || action.has_capability(Capability::StudentScoped) =>
        {
            ctx.passes_assignment()
        }
        _ => true,
    }
}

/// 任一动作有权限即可
pub fn has_any_permission(
    role: Role,
    actions: &[Action],
    context: Option<&PermissionContext>,
) -> bool {
    actions
        .iter()
        .any(|action| has_permission(role, *action, context))
}

/// 所有动作都必须有权限
pub fn has_all_permissions(
    role: Role,
    actions: &[Action],
    context: Option<&PermissionContext>,
) -> bool {
    actions
        .iter()
        .all(|action| has_permission(role, *action, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_respond_requires_assignment() {
        let assigned = PermissionContext::for_user(1).assigned_to(vec![1]);
        assert!(has_permission(
            Role::Student,
            Action::RespondForm,
            Some(&assigned)
        ));

        let other = PermissionContext::for_user(2).assigned_to(vec![1]);
        assert!(!has_permission(
            Role::Student,
            Action::RespondForm,
            Some(&other)
        ));
    }

    #[test]
    fn test_student_without_assignment_list_passes_through() {
        let ctx = PermissionContext::for_user(2);
        assert!(has_permission(Role::Student, Action::ViewForm, Some(&ctx)));
    }

    #[test]
    fn test_missing_base_grant_is_never_escalated() {
        // 归属关系也不能越过基础授权
        let owner = PermissionContext::for_user(5).owned_by(5);
        assert!(!has_permission(Role::Student, Action::SendForm, Some(&owner)));
        assert!(!has_permission(Role::PartTime, Action::UpdateReportStage2, None));
        assert!(!has_permission(Role::Teacher, Action::UpdateReportStage1, None));
    }

    #[test]
    fn test_owner_override_skips_assignment() {
        let ctx = PermissionContext::for_user(7)
            .owned_by(7)
            .assigned_to(vec![1, 2]);
        assert!(has_permission(Role::Student, Action::ViewReport, Some(&ctx)));
    }

    #[test]
    fn test_part_time_scoped_actions_require_assignment() {
        let outside = PermissionContext::for_user(3).assigned_to(vec![4]);
        assert!(!has_permission(
            Role::PartTime,
            Action::ViewClass,
            Some(&outside)
        ));
        assert!(!has_permission(
            Role::PartTime,
            Action::ViewStudent,
            Some(&outside)
        ));
        // 不带班级/学生标签的动作不受指派限制，审阅人指派由报告流转单独校验
        for action in [
            Action::ViewForm,
            Action::ViewReport,
            Action::UpdateReportStage1,
            Action::RejectReport,
            Action::ViewStatistics,
        ] {
            assert!(has_permission(Role::PartTime, action, Some(&outside)), "{action}");
        }

        let inside = PermissionContext::for_user(4).assigned_to(vec![4]);
        assert!(has_permission(
            Role::PartTime,
            Action::ViewClass,
            Some(&inside)
        ));
    }

    #[test]
    fn test_admin_always_passes() {
        let ctx = PermissionContext::for_user(1).assigned_to(vec![]);
        for action in Action::ALL {
            assert!(has_permission(Role::Admin, *action, Some(&ctx)));
            assert!(has_permission(Role::Admin, *action, None));
        }
    }

    #[test]
    fn test_teacher_context_passes_after_base_grant() {
        let ctx = PermissionContext::for_user(9).assigned_to(vec![1]);
        assert!(has_permission(
            Role::Teacher,
            Action::UpdateReportStage2,
            Some(&ctx)
        ));
    }

    #[test]
    fn test_permission_without_context_is_pure() {
        for role in Role::all_roles() {
            for action in Action::ALL {
                let first = has_permission(*role, *action, None);
                let second = has_permission(*role, *action, None);
                assert_eq!(first, second);
                assert_eq!(first, role_permissions(*role).contains(action));
            }
        }
    }

    #[test]
    fn test_composite_helpers() {
        let actions = [Action::SendForm, Action::ViewForm];
        assert!(has_any_permission(Role::Student, &actions, None));
        assert!(!has_all_permissions(Role::Student, &actions, None));
        assert!(has_all_permissions(Role::Teacher, &actions, None));
        assert!(!has_any_permission(Role::Student, &[], None));
        assert!(has_all_permissions(Role::Student, &[], None));
    }
}
