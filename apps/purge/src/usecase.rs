//! # ユースケース層
//!
//! ワークフローメタデータのパージを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・削除器・ソース確認を `Arc<dyn Trait>` で外部から注入
//! - **単一トランザクション**: ガードからすべての削除までを 1 つの `TxContext` で行う
//!
//! ## モジュール構成
//!
//! - `purge`: パージのコーディネーターと各ステップ

pub mod purge;

pub use purge::{
    CascadeSweeper,
    GuardChecker,
    HierarchyResolver,
    PurgeMode,
    WorkflowPurgeUseCaseImpl,
};
