//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するシードデータ投入・確認ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use flowsweep_domain::catalog::{EntityDescriptor, ExecutionHistoryKind};
use sqlx::PgPool;

pub fn task_instances() -> EntityDescriptor {
    EntityDescriptor::workflow_scoped("task_instances", "task_instances", "workflow_id")
        .with_task_column("task_id")
        .execution_history(ExecutionHistoryKind::TaskInstance)
}

pub fn workflow_runs() -> EntityDescriptor {
    EntityDescriptor::workflow_scoped("workflow_runs", "workflow_runs", "workflow_id")
        .with_task_column("task_id")
        .execution_history(ExecutionHistoryKind::WorkflowRun)
}

/// スキーマに存在しないテーブルを指す記述子（途中失敗の再現用）
pub fn missing_table() -> EntityDescriptor {
    EntityDescriptor::workflow_scoped("missing_table", "missing_table", "workflow_id")
}

pub async fn insert_definition(pool: &PgPool, workflow_id: &str, fileloc: Option<&str>) {
    sqlx::query(
        "INSERT INTO workflow_definitions (workflow_id, fileloc, is_sub_workflow) VALUES ($1, $2, $3)",
    )
    .bind(workflow_id)
    .bind(fileloc)
    .bind(workflow_id.contains('.'))
    .execute(pool)
    .await
    .expect("定義レコードの作成に失敗");
}

/// ワークフロー ID とタスク ID を持つ行を追加する
pub async fn insert_task_row(pool: &PgPool, table: &str, workflow_id: &str, task_id: Option<&str>) {
    sqlx::query(&format!(
        "INSERT INTO {table} (workflow_id, task_id) VALUES ($1, $2)"
    ))
    .bind(workflow_id)
    .bind(task_id)
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("{table} への行の作成に失敗: {e}"));
}

/// コミット済みの行のワークフロー ID 一覧（挿入順）
pub async fn workflow_ids(pool: &PgPool, table: &str) -> Vec<String> {
    sqlx::query_scalar(&format!("SELECT workflow_id FROM {table} ORDER BY id"))
        .fetch_all(pool)
        .await
        .unwrap_or_else(|e| panic!("{table} の読み取りに失敗: {e}"))
}
