//! # パージツール設定
//!
//! 環境変数からパージツールの設定を読み込む。

use std::env;

use flowsweep_infra::definition_source::SourceRootMapping;
use thiserror::Error;

/// 接続プールのデフォルト上限
///
/// パージは単一トランザクションで完結するため、少数で足りる。
pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{key} の値が不正です: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{present} を設定する場合は {missing} も設定してください")]
    Incomplete {
        present: &'static str,
        missing: &'static str,
    },
}

/// パージツールの設定
#[derive(Debug, Clone)]
pub struct PurgeConfig {
    /// データベース接続 URL
    pub database_url:    String,
    /// 接続プールの上限
    pub max_connections: u32,
    /// 定義ソースのパス読み替え（未設定なら `fileloc` をそのまま確認する）
    pub source_mapping:  Option<SourceRootMapping>,
}

impl PurgeConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    key:   "DB_MAX_CONNECTIONS",
                    value: raw,
                })?,
        };

        let source_mapping = match (
            lookup("DEFINITIONS_STORED_ROOT"),
            lookup("DEFINITIONS_LOCAL_ROOT"),
        ) {
            (Some(stored), Some(local)) => Some(SourceRootMapping::new(stored, local)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Incomplete {
                    present: "DEFINITIONS_STORED_ROOT",
                    missing: "DEFINITIONS_LOCAL_ROOT",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete {
                    present: "DEFINITIONS_LOCAL_ROOT",
                    missing: "DEFINITIONS_STORED_ROOT",
                });
            }
        };

        Ok(Self {
            database_url,
            max_connections,
            source_mapping,
        })
    }
}
