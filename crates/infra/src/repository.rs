//! # リポジトリ実装
//!
//! パージ処理が参照するレコードの読み取りを提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイトにのみ依存する
//! - **トランザクション必須**: 読み取りもパージと同じトランザクションで行い、
//!   行ロックを保持したまま削除に進む

pub mod workflow_definition_repository;

pub use workflow_definition_repository::{
    DEFINITION_TABLE,
    PostgresWorkflowDefinitionRepository,
    WorkflowDefinitionRepository,
};
