//! # flowsweep-purge
//!
//! ワークフロー 1 件分のメタデータを削除するコマンドラインツール。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `DEFINITIONS_STORED_ROOT` | No | `fileloc` に記録されたルート |
//! | `DEFINITIONS_LOCAL_ROOT` | No | 読み替え先のローカルルート（`DEFINITIONS_STORED_ROOT` と同時に設定） |
//! | `DB_MAX_CONNECTIONS` | No | 接続プールの上限（デフォルト: 2） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,flowsweep=debug`） |
//!
//! ## 実行方法
//!
//! ```bash
//! # 件数の確認のみ
//! cargo run -p flowsweep-purge -- daily_etl --dry-run
//!
//! # 削除（監査ログも含める）
//! cargo run -p flowsweep-purge -- daily_etl --purge-audit-records --yes
//! ```
//!
//! ## 終了コード
//!
//! | コード | 意味 |
//! |--------|------|
//! | 0 | 成功 |
//! | 1 | ストレージエラー、その他の失敗 |
//! | 2 | 引数・設定の誤り |
//! | 3 | ワークフローが存在しない |
//! | 4 | 定義ソースがまだ存在する |

use std::{process::ExitCode, sync::Arc};

use anyhow::Context as _;
use flowsweep_domain::purge::PurgeRequest;
use flowsweep_infra::{
    db::{self, PgTransactionManager},
    definition_source::FileSystemSourceProbe,
    deletion::{PostgresEntityRowDeleter, standard_catalog},
    repository::PostgresWorkflowDefinitionRepository,
};
use flowsweep_purge::{
    PurgeError,
    cli::{self, CliArgs, USAGE_EXIT_CODE},
    config::PurgeConfig,
    usecase::WorkflowPurgeUseCaseImpl,
};
use flowsweep_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env("flowsweep-purge"));

    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            e.print();
            return ExitCode::from(e.exit_code());
        }
    };

    let config = match PurgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("設定エラー: {e}");
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    match run(config, args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let purge_error = e.downcast_ref::<PurgeError>();
            let code = purge_error.map_or(1, PurgeError::exit_code);
            match purge_error.and_then(PurgeError::span_trace) {
                Some(span_trace) => tracing::error!(
                    error = %e,
                    exit_code = code,
                    %span_trace,
                    "パージに失敗しました"
                ),
                None => tracing::error!(error = %e, exit_code = code, "パージに失敗しました"),
            }
            eprintln!("エラー: {e:#}");
            ExitCode::from(code)
        }
    }
}

async fn run(config: PurgeConfig, args: CliArgs) -> anyhow::Result<()> {
    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("データベースへの接続に失敗しました")?;
    tracing::debug!(max_connections = config.max_connections, "接続プールを作成しました");

    let catalog = standard_catalog().context("標準カタログの構築に失敗しました")?;
    let source_probe = match config.source_mapping {
        Some(mapping) => FileSystemSourceProbe::with_mapping(mapping),
        None => FileSystemSourceProbe::new(),
    };

    let usecase = WorkflowPurgeUseCaseImpl::new(
        Arc::new(PgTransactionManager::new(pool)),
        Arc::new(PostgresWorkflowDefinitionRepository::new()),
        Arc::new(PostgresEntityRowDeleter::new()),
        Arc::new(source_probe),
        Arc::new(catalog),
    );

    let dry_run = args.dry_run;
    let keep_audit_records = args.keep_audit_records();
    let request = PurgeRequest::new(args.workflow_id).with_keep_audit_records(keep_audit_records);
    let outcome = if dry_run {
        usecase.preview(&request).await?
    } else {
        usecase.purge(&request).await?
    };

    println!("{}", cli::render_report(&outcome, dry_run)?);
    Ok(())
}
