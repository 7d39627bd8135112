//! # Flowsweep パージツール
//!
//! ワークフロー 1 件分のメタデータ（定義、実行履歴、タグ、監査ログなど）を
//! 単一トランザクションでまとめて削除する。
//!
//! ## モジュール構成
//!
//! - [`cli`] - コマンドライン引数の解析と結果出力
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - パージエラーと終了コード
//! - [`usecase`] - パージのユースケース

pub mod cli;
pub mod config;
pub mod error;
pub mod usecase;

pub use error::PurgeError;
