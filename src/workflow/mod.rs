//! 表单与报告工作流的纯逻辑
//!
//! 不访问存储，只在内存中的完整数据上计算结果，由服务层负责加锁和落库。

pub mod form_lifecycle;
pub mod question_editor;
pub mod question_set;
pub mod report_stage;
pub mod stats;
pub mod validation;

pub use form_lifecycle::{FORM_IS_SENT, ensure_editable};
pub use question_editor::QuestionEditor;
pub use report_stage::{Actor, Submission};
