//! 作答存储操作

use super::reports::{compare_and_save_report, insert_report};
use super::{SeaOrmStorage, commit};
use crate::entity::form_responses::{ActiveModel, Column, Entity as FormResponses};
use crate::errors::{AcademyError, Result};
use crate::models::reports::entities::{Report, ReportWrite};
use crate::models::responses::entities::{FormResponse, NewFormResponse};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};

impl SeaOrmStorage {
    pub async fn get_response_impl(
        &self,
        form_id: i64,
        responder_id: i64,
    ) -> Result<Option<FormResponse>> {
        FormResponses::find()
            .filter(Column::FormId.eq(form_id))
            .filter(Column::ResponderId.eq(responder_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询作答失败: {e}")))?
            .map(|m| m.into_response())
            .transpose()
    }

    /// 写入作答（按表单与作答人 upsert），并在同一事务中认领或新建报告
    pub async fn submit_response_impl(
        &self,
        response: NewFormResponse,
        report: ReportWrite,
    ) -> Result<(FormResponse, Report)> {
        let now = chrono::Utc::now().timestamp();
        let answers = serde_json::to_string(&response.answers)?;
        let txn = self.begin().await?;

        let existing = FormResponses::find()
            .filter(Column::FormId.eq(response.form_id))
            .filter(Column::ResponderId.eq(response.responder_id))
            .one(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询作答失败: {e}")))?;

        let saved = match existing {
            Some(model) => {
                let mut model = model.into_active_model();
                model.answers = Set(answers);
                model.submitted_at = Set(now);
                model.update(&txn).await
            }
            None => {
                ActiveModel {
                    form_id: Set(response.form_id),
                    responder_id: Set(response.responder_id),
                    answers: Set(answers),
                    submitted_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(|e| AcademyError::database_operation(format!("写入作答失败: {e}")))?
        .into_response()?;

        let report = match report {
            ReportWrite::Update {
                mut report,
                expected,
            } => {
                report.form_response_id = Some(saved.id);
                compare_and_save_report(&txn, &report, expected, Some(saved.responder_id)).await?
            }
            ReportWrite::Create(mut new_report) => {
                new_report.form_response_id = Some(saved.id);
                insert_report(&txn, new_report).await?
            }
        };

        commit(txn).await?;
        Ok((saved, report))
    }
}
