//! 题目实体
//!
//! 题型配置以 JSON 文本保存，`question_type` 冗余一列便于筛选。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub form_id: i64,
    pub order_index: i32,
    pub is_required: bool,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub question_type: String,
    #[sea_orm(column_type = "Text")]
    pub config: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forms::Entity",
        from = "Column::FormId",
        to = "super::forms::Column::Id"
    )]
    Form,
}

impl Related<super::forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(
        self,
    ) -> crate::errors::Result<crate::models::questions::entities::Question> {
        use crate::models::questions::entities::{Question, QuestionConfig};

        let config: QuestionConfig = serde_json::from_str(&self.config)?;
        Ok(Question {
            id: Some(self.id),
            form_id: self.form_id,
            order_index: self.order_index,
            is_required: self.is_required,
            question_text: self.question_text,
            config,
        })
    }
}
