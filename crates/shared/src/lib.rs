//! # Flowsweep 共有ユーティリティ
//!
//! このクレートは、Flowsweep の各クレートで使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は feature で切り替える

pub mod observability;
