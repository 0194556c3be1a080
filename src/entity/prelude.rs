//! 预导入模块，方便使用

pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::concept_items::{
    ActiveModel as ConceptItemActiveModel, Entity as ConceptItems, Model as ConceptItemModel,
};
pub use super::concept_templates::{
    ActiveModel as ConceptTemplateActiveModel, Entity as ConceptTemplates,
    Model as ConceptTemplateModel,
};
pub use super::form_responses::{
    ActiveModel as FormResponseActiveModel, Entity as FormResponses, Model as FormResponseModel,
};
pub use super::form_targets::{
    ActiveModel as FormTargetActiveModel, Entity as FormTargets, Model as FormTargetModel,
};
pub use super::forms::{ActiveModel as FormActiveModel, Entity as Forms, Model as FormModel};
pub use super::group_members::{
    ActiveModel as GroupMemberActiveModel, Entity as GroupMembers, Model as GroupMemberModel,
};
pub use super::groups::{ActiveModel as GroupActiveModel, Entity as Groups, Model as GroupModel};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::reports::{ActiveModel as ReportActiveModel, Entity as Reports, Model as ReportModel};
pub use super::supervision_mappings::{
    ActiveModel as SupervisionMappingActiveModel, Entity as SupervisionMappings,
    Model as SupervisionMappingModel,
};
