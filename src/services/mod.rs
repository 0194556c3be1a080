pub mod concept_templates;
pub mod context;
pub mod forms;
pub mod groups;
pub mod notifications;
pub mod notify;
pub mod questions;
pub mod reports;
pub mod response;
pub mod responses;
pub mod statistics;
pub mod supervisions;

#[cfg(test)]
pub(crate) mod test_support;

pub use concept_templates::ConceptTemplateService;
pub use context::AppContext;
pub use forms::FormService;
pub use groups::GroupService;
pub use notifications::NotificationService;
pub use questions::QuestionService;
pub use reports::ReportService;
pub use responses::ResponseService;
pub use statistics::StatisticsService;
pub use supervisions::SupervisionService;
