//! # ワークフロー定義レコード
//!
//! ローダーが定義ソース（ファイル）を解析した結果として永続化されるレコード。
//! パージの事前チェックはこのレコードの存在と `fileloc` を参照する。

use serde::{Deserialize, Serialize};

use crate::workflow::WorkflowId;

/// ワークフロー定義レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinitionRecord {
    workflow_id:     WorkflowId,
    fileloc:         Option<String>,
    is_sub_workflow: bool,
}

impl WorkflowDefinitionRecord {
    pub fn new(workflow_id: WorkflowId, fileloc: Option<String>, is_sub_workflow: bool) -> Self {
        Self {
            workflow_id,
            fileloc,
            is_sub_workflow,
        }
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    /// 定義ソースのパス（ローダーから見た絶対パス）
    ///
    /// 空文字列は未設定として扱う。
    pub fn fileloc(&self) -> Option<&str> {
        self.fileloc.as_deref().filter(|loc| !loc.is_empty())
    }

    /// ローダーがサブワークフローとして登録したか
    pub fn is_sub_workflow(&self) -> bool {
        self.is_sub_workflow
    }
}
