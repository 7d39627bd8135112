//! # Flowsweep インフラ層
//!
//! 外部システム（PostgreSQL、ファイルシステム）との接続を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プールとトランザクション管理
//! - **リポジトリ実装**: ワークフロー定義レコードの読み取り
//! - **行削除**: エンティティ記述子に基づくワークフロー単位の削除・件数確認
//! - **定義ソース確認**: 定義ファイルがまだ存在するかの確認
//!
//! ## 依存関係
//!
//! ```text
//! purge → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、`TxContext`、`TransactionManager`
//! - [`definition_source`] - 定義ソースの存在確認
//! - [`deletion`] - エンティティ行の削除と標準カタログ
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use flowsweep_infra::{db, deletion::standard_catalog};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/flowsweep", 2).await?;
//!     let catalog = standard_catalog()?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod definition_source;
pub mod deletion;
pub mod error;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

pub use error::{InfraError, InfraErrorKind};
