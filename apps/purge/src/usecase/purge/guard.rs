//! # 削除前ガード
//!
//! 定義レコードの存在と、定義ソースが削除済みであることを確認する。
//! 実行時は定義レコードを `FOR UPDATE` で取得するため、同じワークフローへの
//! 並行パージはここで直列化される。プレビューは何も変更しないため、
//! ロックを取らずに読み取る。

use std::sync::Arc;

use flowsweep_domain::{definition::WorkflowDefinitionRecord, workflow::WorkflowId};
use flowsweep_infra::{
    db::TxContext,
    definition_source::DefinitionSourceProbe,
    repository::WorkflowDefinitionRepository,
};

use super::PurgeMode;
use crate::error::PurgeError;

/// 削除前ガード
pub struct GuardChecker {
    definition_repo: Arc<dyn WorkflowDefinitionRepository>,
    source_probe:    Arc<dyn DefinitionSourceProbe>,
}

impl GuardChecker {
    pub fn new(
        definition_repo: Arc<dyn WorkflowDefinitionRepository>,
        source_probe: Arc<dyn DefinitionSourceProbe>,
    ) -> Self {
        Self {
            definition_repo,
            source_probe,
        }
    }

    /// 削除してよいか確認し、定義レコードを返す
    ///
    /// - 定義レコードがなければ `NotFound`
    /// - `fileloc` が記録されていて、そのファイルが存在すれば `StillActive`
    ///
    /// `fileloc` が未記録の場合はソース確認をせずに通す。
    /// 行ロックを取得するのは [`PurgeMode::Execute`] のときのみ。
    pub async fn check(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
        mode: PurgeMode,
    ) -> Result<WorkflowDefinitionRecord, PurgeError> {
        let found = match mode {
            PurgeMode::Execute => self.definition_repo.find_for_update(tx, workflow_id).await?,
            PurgeMode::Preview => self.definition_repo.find(tx, workflow_id).await?,
        };
        let record = found.ok_or_else(|| PurgeError::NotFound {
            workflow_id: workflow_id.clone(),
        })?;

        if record.is_sub_workflow() != workflow_id.is_sub_workflow() {
            tracing::warn!(
                %workflow_id,
                recorded = record.is_sub_workflow(),
                "サブワークフローフラグと ID の形式が一致しません。ID の形式を優先します"
            );
        }

        let Some(fileloc) = record.fileloc() else {
            return Ok(record);
        };

        if self.source_probe.exists(fileloc).await? {
            return Err(PurgeError::StillActive {
                workflow_id: workflow_id.clone(),
                fileloc:     fileloc.to_string(),
            });
        }

        Ok(record)
    }
}
