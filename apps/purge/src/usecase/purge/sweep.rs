//! # カタログ駆動の一括削除
//!
//! カタログに登録されたワークフロー単位のエンティティを順に削除する。
//! 各エンティティで、ワークフロー ID が一致する行と、子孫（`W.` で始まる ID）の
//! 行をまとめて対象にする。

use std::sync::Arc;

use flowsweep_domain::{
    catalog::EntityCatalog,
    purge::{EntityPurgeCount, PurgeScope},
    workflow::WorkflowId,
};
use flowsweep_infra::{InfraError, db::TxContext, deletion::EntityRowDeleter};

use super::PurgeMode;

/// カタログ駆動の一括削除
pub struct CascadeSweeper {
    row_deleter: Arc<dyn EntityRowDeleter>,
    catalog:     Arc<EntityCatalog>,
}

impl CascadeSweeper {
    pub fn new(row_deleter: Arc<dyn EntityRowDeleter>, catalog: Arc<EntityCatalog>) -> Self {
        Self {
            row_deleter,
            catalog,
        }
    }

    /// ワークフロー単位のエンティティをカタログ順に削除する
    ///
    /// `keep_audit_records` が `true` の場合、監査エンティティはスキップし、
    /// 結果にも含めない。ワークフロー列を持たないエンティティは対象外。
    /// 途中で失敗した場合はエラーを返し、トランザクションの扱いは呼び出し元に任せる。
    pub async fn sweep(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
        keep_audit_records: bool,
        mode: PurgeMode,
    ) -> Result<Vec<EntityPurgeCount>, InfraError> {
        let mut counts = Vec::new();

        for entity in self.catalog.workflow_scoped() {
            if keep_audit_records && entity.is_audit() {
                tracing::debug!(entity = entity.name(), "監査ログを保持するためスキップ");
                continue;
            }

            let deleted = match mode {
                PurgeMode::Execute => {
                    self.row_deleter
                        .delete_by_workflow(tx, entity, workflow_id)
                        .await?
                }
                PurgeMode::Preview => {
                    self.row_deleter
                        .count_by_workflow(tx, entity, workflow_id)
                        .await?
                }
            };

            tracing::info!(entity = entity.name(), deleted, %mode, "エンティティを処理");
            counts.push(EntityPurgeCount {
                entity: entity.name(),
                scope: PurgeScope::Workflow,
                deleted,
            });
        }

        Ok(counts)
    }
}
