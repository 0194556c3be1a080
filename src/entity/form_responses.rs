//! 作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "form_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub form_id: i64,
    pub responder_id: i64,
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    pub submitted_at: i64,
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
    pub fn into_response(
        self,
    ) -> crate::errors::Result<crate::models::responses::entities::FormResponse> {
        use crate::models::responses::entities::FormResponse;

        Ok(FormResponse {
            id: self.id,
            form_id: self.form_id,
            responder_id: self.responder_id,
            answers: serde_json::from_str(&self.answers)?,
            submitted_at: super::to_datetime(self.submitted_at),
        })
    }
}
