//! # パージエラー定義
//!
//! パージ処理で発生するエラーと、CLI の終了コードへの対応を定義する。
//!
//! | エラー | 終了コード | 再試行 |
//! |---|---|---|
//! | `InvalidInput` | 2 | 不可（入力を修正する） |
//! | `NotFound` | 3 | 不可（ID を修正する） |
//! | `StillActive` | 4 | 定義ソースを削除した後に再実行する |
//! | `Storage` | 1 | ストレージの状態による |

use flowsweep_domain::{DomainError, workflow::WorkflowId};
use flowsweep_infra::InfraError;
use thiserror::Error;
use tracing_error::SpanTrace;

/// パージ処理で発生するエラー
#[derive(Debug, Error)]
pub enum PurgeError {
    /// ワークフロー定義レコードが存在しない
    #[error("ワークフローが見つかりません: {workflow_id}")]
    NotFound { workflow_id: WorkflowId },

    /// 定義ソースがまだ存在する
    ///
    /// ローダーが定義を再登録し、削除直後に不整合な状態が作られるのを防ぐ。
    #[error(
        "ワークフロー {workflow_id} の定義ソースがまだ存在します。先に定義ファイルを削除してください: {fileloc}"
    )]
    StillActive {
        workflow_id: WorkflowId,
        fileloc:     String,
    },

    /// ストレージ（DB・ファイルシステム）エラー
    ///
    /// トランザクションはロールバックされ、何も削除されない。
    #[error("ストレージエラー: {0}")]
    Storage(#[from] InfraError),

    /// 不正な入力
    #[error("不正な入力: {0}")]
    InvalidInput(String),
}

impl PurgeError {
    /// 同じ入力のまま再試行して成功しうるか
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// CLI の終了コード
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Storage(_) => 1,
            Self::InvalidInput(_) => 2,
            Self::NotFound { .. } => 3,
            Self::StillActive { .. } => 4,
        }
    }

    /// ストレージエラーの発生時に捕捉された SpanTrace
    ///
    /// ガードやスイープのどのエンティティで失敗したかをログに残すために使う。
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Storage(e) => Some(e.span_trace()),
            _ => None,
        }
    }
}

impl From<DomainError> for PurgeError {
    fn from(error: DomainError) -> Self {
        Self::InvalidInput(error.to_string())
    }
}
