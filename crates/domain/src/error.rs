//! # ドメイン層エラー定義
//!
//! 値オブジェクトの検証失敗やカタログ構築時の不整合を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## 使用例
//!
//! ```rust
//! use flowsweep_domain::DomainError;
//!
//! fn validate_name(name: &str) -> Result<(), DomainError> {
//!     if name.is_empty() {
//!         return Err(DomainError::Validation("名前は必須です".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値やカタログ定義がルールに違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 空のワークフロー ID
    /// - 文字数制限の超過
    /// - カタログ内のエンティティ名の重複
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
