use serde::{Deserialize, Serialize};

// 群组内角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,    // 管理员
    Teacher,  // 教师
    PartTime, // 兼职教师（一审）
    Student,  // 学生
}

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const PART_TIME: &'static str = "part_time";
    pub const STUDENT: &'static str = "student";

    pub fn all_roles() -> &'static [Role] {
        &[Role::Admin, Role::Teacher, Role::PartTime, Role::Student]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => Role::ADMIN,
            Role::Teacher => Role::TEACHER,
            Role::PartTime => Role::PART_TIME,
            Role::Student => Role::STUDENT,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Role>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的角色: '{s}'. 支持的角色: admin, teacher, part_time, student"
            ))
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Role::ADMIN => Ok(Role::Admin),
            Role::TEACHER => Ok(Role::Teacher),
            Role::PART_TIME => Ok(Role::PartTime),
            Role::STUDENT => Ok(Role::Student),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

// 群组（学院）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 班级
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 群组成员
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub role: Role,
    pub class_id: Option<i64>,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
