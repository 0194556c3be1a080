//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行读写，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod classes;
pub mod concept_items;
pub mod concept_templates;
pub mod form_responses;
pub mod form_targets;
pub mod forms;
pub mod group_members;
pub mod groups;
pub mod notifications;
pub mod questions;
pub mod reports;
pub mod supervision_mappings;

use chrono::{DateTime, Utc};

/// 秒级时间戳转换为 UTC 时间
pub(crate) fn to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_default()
}

pub(crate) fn to_optional_datetime(timestamp: Option<i64>) -> Option<DateTime<Utc>> {
    timestamp.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
}
