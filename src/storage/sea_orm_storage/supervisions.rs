//! 督导关系存储操作

use super::{SeaOrmStorage, commit};
use crate::entity::supervision_mappings::{ActiveModel, Column, Entity as SupervisionMappings};
use crate::errors::{AcademyError, Result};
use crate::models::supervisions::entities::SupervisionMapping;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

/// 按自然键 upsert 督导关系
///
/// 冲突时不写入，随后在同一连接上按键读回，供表单事务复用。
pub(super) async fn upsert_supervision_on<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
    time_teacher_id: Option<i64>,
    teacher_id: Option<i64>,
) -> Result<SupervisionMapping> {
    let key = SupervisionMapping::assignment_key(group_id, time_teacher_id, teacher_id);

    let model = ActiveModel {
        group_id: Set(group_id),
        time_teacher_id: Set(time_teacher_id),
        teacher_id: Set(teacher_id),
        assignment_key: Set(key.clone()),
        created_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    };

    SupervisionMappings::insert(model)
        .on_conflict(
            OnConflict::column(Column::AssignmentKey)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("写入督导关系失败: {e}")))?;

    SupervisionMappings::find()
        .filter(Column::AssignmentKey.eq(key))
        .one(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("查询督导关系失败: {e}")))?
        .map(|m| m.into_supervision())
        .ok_or_else(|| AcademyError::database_operation("督导关系写入后不可见"))
}

impl SeaOrmStorage {
    pub async fn upsert_supervision_impl(
        &self,
        group_id: i64,
        time_teacher_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Result<SupervisionMapping> {
        let txn = self.begin().await?;
        let mapping = upsert_supervision_on(&txn, group_id, time_teacher_id, teacher_id).await?;
        commit(txn).await?;
        Ok(mapping)
    }

    pub async fn get_supervision_by_id_impl(&self, id: i64) -> Result<Option<SupervisionMapping>> {
        let result = SupervisionMappings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询督导关系失败: {e}")))?;

        Ok(result.map(|m| m.into_supervision()))
    }
}
