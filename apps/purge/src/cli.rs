//! # コマンドライン引数
//!
//! ```text
//! flowsweep-purge <WORKFLOW_ID> [--purge-audit-records] [--dry-run] [--yes]
//! ```
//!
//! 削除は取り消せないため、実削除には `--yes` を必須とする。
//! `--dry-run` の場合は件数のみを表示し、何も削除しない。

use std::ffi::OsString;

use clap::Parser;
use flowsweep_domain::{purge::PurgeOutcome, workflow::WorkflowId};
use serde::Serialize;
use thiserror::Error;

/// 引数・設定の誤りを表す終了コード
pub const USAGE_EXIT_CODE: u8 = 2;

/// ワークフローとサブワークフローのメタデータを単一トランザクションで削除する
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "flowsweep-purge", version)]
pub struct CliArgs {
    /// 削除するワークフロー ID（サブワークフローは `親.タスク` 形式）
    #[arg(value_parser = parse_workflow_id)]
    pub workflow_id:         WorkflowId,
    /// 監査ログも削除する（デフォルトは保持）
    #[arg(long)]
    pub purge_audit_records: bool,
    /// 削除せずに件数のみを表示する
    #[arg(long)]
    pub dry_run:             bool,
    /// 削除を確定する（--dry-run 以外では必須）
    #[arg(short = 'y', long)]
    pub yes:                 bool,
}

impl CliArgs {
    pub fn keep_audit_records(&self) -> bool {
        !self.purge_audit_records
    }
}

fn parse_workflow_id(raw: &str) -> Result<WorkflowId, String> {
    WorkflowId::new(raw).map_err(|e| e.to_string())
}

/// コマンドライン引数の解析エラー
#[derive(Debug, Error)]
pub enum CliError {
    /// clap による解析エラー（`--help` / `--version` の表示要求を含む）
    #[error(transparent)]
    Parse(#[from] clap::Error),

    #[error("削除を実行するには --yes を指定してください（件数の確認のみなら --dry-run）")]
    ConfirmationRequired,
}

impl CliError {
    /// プロセスの終了コード
    ///
    /// ヘルプ・バージョン表示は 0、それ以外は [`USAGE_EXIT_CODE`]。
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Parse(e) if !e.use_stderr() => 0,
            CliError::Parse(_) | CliError::ConfirmationRequired => USAGE_EXIT_CODE,
        }
    }

    /// エラー（またはヘルプ）を表示する
    pub fn print(&self) {
        match self {
            CliError::Parse(e) => {
                if let Err(io) = e.print() {
                    eprintln!("{e}\n({io})");
                }
            }
            CliError::ConfirmationRequired => eprintln!("エラー: {self}"),
        }
    }
}

/// 引数を解析する（先頭はプログラム名）
///
/// clap の解析に加え、`--dry-run` でない場合は `--yes` を要求する。
pub fn parse_args<I, T>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = CliArgs::try_parse_from(args)?;

    if !args.dry_run && !args.yes {
        return Err(CliError::ConfirmationRequired);
    }

    Ok(args)
}

/// stdout に出力する結果
#[derive(Debug, Serialize)]
pub struct PurgeReport<'a> {
    pub dry_run: bool,
    #[serde(flatten)]
    pub outcome: &'a PurgeOutcome,
}

/// 結果を JSON 文字列にする
pub fn render_report(outcome: &PurgeOutcome, dry_run: bool) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PurgeReport { dry_run, outcome })
}
