use serde::{Deserialize, Serialize};

/// 动作的能力标签，上下文收窄按标签判断，而不是按动作名做子串匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 只读访问
    Read,
    /// 学生作答
    Respond,
    /// 涉及班级范围的数据
    ClassScoped,
    /// 涉及学生个人的数据
    StudentScoped,
}

macro_rules! define_actions {
    ($(
        $variant:ident => $name:literal [$($cap:ident),*]
    ),* $(,)?) => {
        /// 固定的动作词汇表，命名格式为 `resource:verb`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Action {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl Action {
            pub const ALL: &'static [Action] = &[$(Action::$variant,)*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Action::$variant => $name,)*
                }
            }

            pub fn capabilities(&self) -> &'static [Capability] {
                match self {
                    $(Action::$variant => &[$(Capability::$cap),*],)*
                }
            }
        }

        impl std::str::FromStr for Action {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Action::$variant),)*
                    _ => Err(format!("Unknown action: {s}")),
                }
            }
        }
    };
}

define_actions! {
    ViewGroup => "group:view" [Read],
    UpdateGroup => "group:update" [],
    DeleteGroup => "group:delete" [],
    ViewClass => "class:view" [Read, ClassScoped],
    CreateClass => "class:create" [ClassScoped],
    UpdateClass => "class:update" [ClassScoped],
    DeleteClass => "class:delete" [ClassScoped],
    ViewMembers => "member:view" [Read],
    InviteMember => "member:invite" [],
    UpdateMemberRole => "member:update_role" [],
    RemoveMember => "member:remove" [],
    ViewStudent => "student:view" [Read, StudentScoped],
    ViewForm => "form:view" [Read],
    CreateForm => "form:create" [],
    UpdateForm => "form:update" [],
    DeleteForm => "form:delete" [],
    SendForm => "form:send" [],
    DuplicateForm => "form:duplicate" [],
    RespondForm => "form:respond" [Respond],
    CreateQuestion => "question:create" [],
    UpdateQuestion => "question:update" [],
    DeleteQuestion => "question:delete" [],
    ViewTemplate => "template:view" [Read],
    CreateTemplate => "template:create" [],
    AssignSupervision => "supervision:assign" [],
    ViewReport => "report:view" [Read],
    UpdateReportStage1 => "report:update_stage1" [],
    UpdateReportStage2 => "report:update_stage2" [],
    RejectReport => "report:reject" [],
    ReopenReport => "report:reopen" [],
    ViewStatistics => "statistics:view" [Read],
}

impl Action {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// 动作名中的资源部分
    pub fn resource(&self) -> &'static str {
        self.name().split(':').next().unwrap_or_default()
    }

    /// 动作名中的动词部分
    pub fn verb(&self) -> &'static str {
        self.name().split(':').nth(1).unwrap_or_default()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
