//! 权限模型
//!
//! 角色到动作的静态授权表，加上基于归属/指派关系的上下文收窄。
//! 所有检查都是纯函数：不抛错、不持有状态，无权限时返回 `false`，
//! 由调用方转换为 `PermissionDenied`。

pub mod access;
pub mod actions;
pub mod matrix;
pub mod messages;

pub use access::{FieldAccessMode, StageAction, can_access_form_field, can_access_report_stage};
pub use actions::{Action, Capability};
pub use matrix::{
    PermissionContext, has_all_permissions, has_any_permission, has_permission, role_permissions,
};
pub use messages::permission_error_message;
