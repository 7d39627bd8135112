//! # Flowsweep ドメイン層
//!
//! ワークフローメタデータ削除（パージ）の中核となる型を定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: ワークフロー ID・タスク ID を検証済み Newtype で表現する
//! - **エンティティカタログ**: 削除対象のコレクションを静的に列挙する。
//!   属性の有無を実行時に調べるのではなく、登録時に能力（ワークフロー ID 列、
//!   タスク ID 列、監査ログかどうか）を明示する
//! - **インフラ非依存**: DB やファイルシステムには一切依存しない
//!
//! ## 依存関係の方向
//!
//! ```text
//! purge → infra → domain
//!   └──────────────↗
//! ```
//!
//! ## モジュール構成
//!
//! - [`catalog`] - エンティティ記述子とカタログ
//! - [`definition`] - ワークフロー定義レコード
//! - [`error`] - ドメイン層エラー
//! - [`purge`] - パージ要求と結果
//! - [`workflow`] - ワークフロー ID / タスク ID
//!
//! ## 使用例
//!
//! ```rust
//! use flowsweep_domain::{purge::PurgeRequest, workflow::WorkflowId};
//!
//! let workflow_id = WorkflowId::new("daily_etl.load_task").unwrap();
//! let (parent, task) = workflow_id.split_sub_workflow().unwrap();
//! assert_eq!(parent.as_str(), "daily_etl");
//! assert_eq!(task.as_str(), "load_task");
//!
//! let request = PurgeRequest::new(workflow_id);
//! assert!(request.keep_audit_records());
//! ```

#[macro_use]
mod macros;

pub mod catalog;
pub mod definition;
pub mod error;
pub mod purge;
pub mod workflow;

pub use error::DomainError;
