//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 逐字段的校验错误单独使用 `InvalidFields` 携带，便于前端高亮具体字段。

use std::fmt;

use serde::Serialize;

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// 字段路径，例如 `questions[2].rating_max`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义（外加固定的 `InvalidFields` 变体）
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_academy_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AcademyError {
            $($variant(String),)*
            InvalidFields(Vec<FieldError>),
        }

        impl AcademyError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AcademyError::$variant(_) => $code,)*
                    AcademyError::InvalidFields(_) => "E100",
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AcademyError::$variant(_) => $type_name,)*
                    AcademyError::InvalidFields(_) => "Validation Failure",
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> String {
                match self {
                    $(AcademyError::$variant(msg) => msg.clone(),)*
                    AcademyError::InvalidFields(fields) => fields
                        .iter()
                        .map(|f| format!("{}: {}", f.field, f.message))
                        .collect::<Vec<_>>()
                        .join("; "),
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AcademyError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AcademyError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_academy_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    StoragePluginNotFound("E010", "Storage Plugin Not Found"),
    Authentication("E012", "Authentication Error"),
    PermissionDenied("E013", "Permission Denied"),
    InvalidState("E014", "Invalid State"),
    DependencyFailure("E015", "Dependency Failure"),
    Conflict("E016", "Conflict"),
}

impl AcademyError {
    /// 单字段校验失败
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AcademyError::InvalidFields(vec![FieldError::new(field, message)])
    }

    /// 是否为基础设施错误（详情只写日志，不返回给调用方）
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AcademyError::CacheConnection(_)
                | AcademyError::DatabaseConfig(_)
                | AcademyError::DatabaseConnection(_)
                | AcademyError::DatabaseOperation(_)
                | AcademyError::Serialization(_)
                | AcademyError::StoragePluginNotFound(_)
        )
    }

    /// 面向用户的提示信息，内部错误统一替换为通用描述
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "Internal server error, please try again later".to_string()
        } else {
            self.message()
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AcademyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AcademyError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AcademyError {
    fn from(err: sea_orm::DbErr) -> Self {
        AcademyError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AcademyError {
    fn from(err: serde_json::Error) -> Self {
        AcademyError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AcademyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AcademyError::cache_connection("test").code(), "E001");
        assert_eq!(AcademyError::database_config("test").code(), "E003");
        assert_eq!(AcademyError::validation("test").code(), "E007");
        assert_eq!(AcademyError::permission_denied("test").code(), "E013");
        assert_eq!(AcademyError::invalid_state("test").code(), "E014");
        assert_eq!(AcademyError::invalid_field("a", "b").code(), "E100");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AcademyError::dependency_failure("test").error_type(),
            "Dependency Failure"
        );
        assert_eq!(
            AcademyError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_field_errors_message() {
        let err = AcademyError::InvalidFields(vec![
            FieldError::new("questions[0].rating_max", "must be between 3 and 10"),
            FieldError::new("title", "must not be empty"),
        ]);
        assert_eq!(
            err.message(),
            "questions[0].rating_max: must be between 3 and 10; title: must not be empty"
        );
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let err = AcademyError::database_operation("UNIQUE constraint failed: reports.id = 42");
        assert!(err.is_internal());
        assert!(!err.public_message().contains("42"));

        let err = AcademyError::invalid_state("Form is sent");
        assert_eq!(err.public_message(), "Form is sent");
    }

    #[test]
    fn test_format_simple() {
        let err = AcademyError::not_found("Report not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Report not found"));
    }
}
