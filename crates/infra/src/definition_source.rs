//! # 定義ソースの存在確認
//!
//! ワークフロー定義の元になったファイルが、定義を読み込む環境にまだ存在するかを調べる。
//!
//! ## パスの読み替え
//!
//! 定義レコードの `fileloc` は、定義を解析したプロセスから見たパスで記録される。
//! パージを実行するホストでは同じファイルが別のディレクトリにマウントされている
//! ことがあるため、[`SourceRootMapping`] で記録時のルートをローカルのルートに
//! 読み替えてから確認する。
//!
//! ```text
//! fileloc:      /opt/scheduler/flows/etl/daily_etl.py
//! stored_root:  /opt/scheduler/flows
//! local_root:   /srv/flows
//! → 確認対象:   /srv/flows/etl/daily_etl.py
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::InfraError;

/// 定義ソース存在確認トレイト
#[async_trait]
pub trait DefinitionSourceProbe: Send + Sync {
    /// 定義ソースがまだ存在するかを返す
    async fn exists(&self, fileloc: &str) -> Result<bool, InfraError>;
}

/// 記録時のルートとローカルのルートの対応
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRootMapping {
    pub stored_root: PathBuf,
    pub local_root:  PathBuf,
}

impl SourceRootMapping {
    pub fn new(stored_root: impl Into<PathBuf>, local_root: impl Into<PathBuf>) -> Self {
        Self {
            stored_root: stored_root.into(),
            local_root:  local_root.into(),
        }
    }

    /// `fileloc` をローカルのパスに読み替える
    ///
    /// `stored_root` 配下にないパスはそのまま返す。
    pub fn resolve(&self, fileloc: &str) -> PathBuf {
        let path = Path::new(fileloc);
        match path.strip_prefix(&self.stored_root) {
            Ok(relative) => self.local_root.join(relative),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// ファイルシステム実装の DefinitionSourceProbe
#[derive(Debug, Clone, Default)]
pub struct FileSystemSourceProbe {
    mapping: Option<SourceRootMapping>,
}

impl FileSystemSourceProbe {
    /// `fileloc` をそのまま確認する Probe を作成する
    pub fn new() -> Self {
        Self { mapping: None }
    }

    /// ルートを読み替えて確認する Probe を作成する
    pub fn with_mapping(mapping: SourceRootMapping) -> Self {
        Self {
            mapping: Some(mapping),
        }
    }

    /// 確認対象のローカルパスを返す
    pub fn local_path(&self, fileloc: &str) -> PathBuf {
        match &self.mapping {
            Some(mapping) => mapping.resolve(fileloc),
            None => PathBuf::from(fileloc),
        }
    }
}

#[async_trait]
impl DefinitionSourceProbe for FileSystemSourceProbe {
    #[tracing::instrument(skip_all, level = "debug", fields(%fileloc))]
    async fn exists(&self, fileloc: &str) -> Result<bool, InfraError> {
        let path = self.local_path(fileloc);
        let exists = tokio::fs::try_exists(&path).await?;
        tracing::debug!(path = %path.display(), exists, "定義ソースの存在を確認");
        Ok(exists)
    }
}
