use serde::Deserialize;

use super::entities::Role;

/// 创建群组请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    /// 创建者在群组中的显示名
    pub display_name: Option<String>,
}

/// 创建班级请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
}

/// 添加/更新成员请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertMemberRequest {
    pub user_id: i64,
    pub display_name: String,
    pub role: Role,
    pub class_id: Option<i64>,
}

/// 成员列表筛选
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberListQuery {
    pub class_id: Option<i64>,
    pub role: Option<Role>,
}
