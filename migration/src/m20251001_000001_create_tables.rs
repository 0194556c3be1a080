use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建群组表
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(ColumnDef::new(Groups::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Groups::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::GroupId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建群组成员表
        manager
            .create_table(
                Table::create()
                    .table(GroupMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupMembers::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GroupMembers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(GroupMembers::DisplayName).string().not_null())
                    .col(ColumnDef::new(GroupMembers::Role).string().not_null())
                    .col(ColumnDef::new(GroupMembers::ClassId).big_integer().null())
                    .col(
                        ColumnDef::new(GroupMembers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupMembers::Table, GroupMembers::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupMembers::Table, GroupMembers::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建督导关系表，自然键唯一
        manager
            .create_table(
                Table::create()
                    .table(SupervisionMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupervisionMappings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SupervisionMappings::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupervisionMappings::TimeTeacherId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupervisionMappings::TeacherId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupervisionMappings::AssignmentKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SupervisionMappings::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SupervisionMappings::Table, SupervisionMappings::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建表单表
        manager
            .create_table(
                Table::create()
                    .table(Forms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Forms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Forms::GroupId).big_integer().not_null())
                    .col(ColumnDef::new(Forms::CreatorId).big_integer().not_null())
                    .col(ColumnDef::new(Forms::Title).string().not_null())
                    .col(ColumnDef::new(Forms::Description).text().null())
                    .col(ColumnDef::new(Forms::Status).string().not_null())
                    .col(ColumnDef::new(Forms::SupervisionId).big_integer().null())
                    .col(ColumnDef::new(Forms::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Forms::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Forms::Table, Forms::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Forms::Table, Forms::SupervisionId)
                            .to(SupervisionMappings::Table, SupervisionMappings::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建表单接收对象表
        manager
            .create_table(
                Table::create()
                    .table(FormTargets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormTargets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormTargets::FormId).big_integer().not_null())
                    .col(ColumnDef::new(FormTargets::TargetKind).string().not_null())
                    .col(ColumnDef::new(FormTargets::TargetId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormTargets::Table, FormTargets::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建概念模板表
        manager
            .create_table(
                Table::create()
                    .table(ConceptTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConceptTemplates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConceptTemplates::Name).string().not_null())
                    .col(
                        ColumnDef::new(ConceptTemplates::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConceptTemplates::CreatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConceptTemplates::ConceptCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConceptTemplates::Status).string().not_null())
                    .col(
                        ColumnDef::new(ConceptTemplates::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ConceptTemplates::Table, ConceptTemplates::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建概念模板条目表
        manager
            .create_table(
                Table::create()
                    .table(ConceptItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConceptItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConceptItems::TemplateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConceptItems::Text).string().not_null())
                    .col(ColumnDef::new(ConceptItems::Description).text().not_null())
                    .col(ColumnDef::new(ConceptItems::OrderIndex).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ConceptItems::Table, ConceptItems::TemplateId)
                            .to(ConceptTemplates::Table, ConceptTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目表，题型配置以 JSON 保存
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::FormId).big_integer().not_null())
                    .col(ColumnDef::new(Questions::OrderIndex).integer().not_null())
                    .col(ColumnDef::new(Questions::IsRequired).boolean().not_null())
                    .col(ColumnDef::new(Questions::QuestionText).text().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(ColumnDef::new(Questions::Config).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作答表
        manager
            .create_table(
                Table::create()
                    .table(FormResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormResponses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormResponses::FormId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FormResponses::ResponderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FormResponses::Answers).text().not_null())
                    .col(
                        ColumnDef::new(FormResponses::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormResponses::Table, FormResponses::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建报告表
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::GroupId).big_integer().not_null())
                    .col(ColumnDef::new(Reports::FormId).big_integer().not_null())
                    .col(ColumnDef::new(Reports::FormResponseId).big_integer().null())
                    .col(ColumnDef::new(Reports::ResponderId).big_integer().null())
                    .col(ColumnDef::new(Reports::StudentName).string().null())
                    .col(ColumnDef::new(Reports::ClassName).string().null())
                    .col(ColumnDef::new(Reports::Stage).string().not_null())
                    .col(ColumnDef::new(Reports::SupervisionId).big_integer().null())
                    .col(ColumnDef::new(Reports::TimeTeacherId).big_integer().null())
                    .col(ColumnDef::new(Reports::TeacherId).big_integer().null())
                    .col(ColumnDef::new(Reports::TimeTeacherComment).text().null())
                    .col(ColumnDef::new(Reports::TeacherComment).text().null())
                    .col(
                        ColumnDef::new(Reports::TimeTeacherCompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Reports::TeacherCompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Reports::RejectedAt).big_integer().null())
                    .col(ColumnDef::new(Reports::RejectedBy).big_integer().null())
                    .col(ColumnDef::new(Reports::RejectionReason).text().null())
                    .col(ColumnDef::new(Reports::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Reports::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reports::Table, Reports::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reports::Table, Reports::FormResponseId)
                            .to(FormResponses::Table, FormResponses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reports::Table, Reports::SupervisionId)
                            .to(SupervisionMappings::Table, SupervisionMappings::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建通知表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Payload).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_group_members_group_user")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::GroupId)
                    .col(GroupMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_form_targets_unique")
                    .table(FormTargets::Table)
                    .col(FormTargets::FormId)
                    .col(FormTargets::TargetKind)
                    .col(FormTargets::TargetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_form_responses_form_responder")
                    .table(FormResponses::Table)
                    .col(FormResponses::FormId)
                    .col(FormResponses::ResponderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 骨架报告的 responder_id 为空，不受唯一约束影响
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reports_form_responder")
                    .table(Reports::Table)
                    .col(Reports::FormId)
                    .col(Reports::ResponderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classes_group_id")
                    .table(Classes::Table)
                    .col(Classes::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forms_group_id")
                    .table(Forms::Table)
                    .col(Forms::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_form_id")
                    .table(Questions::Table)
                    .col(Questions::FormId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_concept_items_template_id")
                    .table(ConceptItems::Table)
                    .col(ConceptItems::TemplateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reports_group_stage")
                    .table(Reports::Table)
                    .col(Reports::GroupId)
                    .col(Reports::Stage)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_user_id")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConceptItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConceptTemplates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormTargets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SupervisionMappings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
    Name,
    OwnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    Id,
    GroupId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupMembers {
    Table,
    Id,
    GroupId,
    UserId,
    DisplayName,
    Role,
    ClassId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum SupervisionMappings {
    Table,
    Id,
    GroupId,
    TimeTeacherId,
    TeacherId,
    AssignmentKey,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Forms {
    Table,
    Id,
    GroupId,
    CreatorId,
    Title,
    Description,
    Status,
    SupervisionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FormTargets {
    Table,
    Id,
    FormId,
    TargetKind,
    TargetId,
}

#[derive(DeriveIden)]
enum ConceptTemplates {
    Table,
    Id,
    Name,
    GroupId,
    CreatorId,
    ConceptCount,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ConceptItems {
    Table,
    Id,
    TemplateId,
    Text,
    Description,
    OrderIndex,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    FormId,
    OrderIndex,
    IsRequired,
    QuestionText,
    QuestionType,
    Config,
}

#[derive(DeriveIden)]
enum FormResponses {
    Table,
    Id,
    FormId,
    ResponderId,
    Answers,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    GroupId,
    FormId,
    FormResponseId,
    ResponderId,
    StudentName,
    ClassName,
    Stage,
    SupervisionId,
    TimeTeacherId,
    TeacherId,
    TimeTeacherComment,
    TeacherComment,
    TimeTeacherCompletedAt,
    TeacherCompletedAt,
    RejectedAt,
    RejectedBy,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    NotificationType,
    Title,
    Payload,
    IsRead,
    CreatedAt,
}
