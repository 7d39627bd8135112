//! テスト共通フィクスチャ
//!
//! パージのシナリオテストで共通利用するシードデータとユースケース生成ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::Arc;

use flowsweep_domain::{
    catalog::EntityCatalog,
    purge::PurgeRequest,
    workflow::WorkflowId,
};
use flowsweep_infra::{
    fake::{FakeWorkflowStore, StaticSourceProbe},
    repository::DEFINITION_TABLE,
};
use flowsweep_purge::usecase::WorkflowPurgeUseCaseImpl;

// =============================================================================
// シードデータ定数
// =============================================================================

pub const DAILY_ETL: &str = "daily_etl";
pub const LOAD_TASK: &str = "load_task";
pub const DAILY_ETL_LOAD_TASK: &str = "daily_etl.load_task";
pub const DAILY_ETL_V2: &str = "daily_etl_v2";
pub const DAILY_ETL_FILELOC: &str = "/flows/daily_etl.py";

/// `daily_etl` のシナリオデータ
///
/// タスクインスタンス 3 件、実行記録 1 件、監査ログ 2 件。
/// 名前が前方一致するだけの `daily_etl_v2` の行も含む。
pub fn seed_daily_etl(store: &FakeWorkflowStore) {
    store.insert_definition(DAILY_ETL, Some(DAILY_ETL_FILELOC));
    store.insert_row("task_instances", DAILY_ETL);
    store.insert_row("task_instances", DAILY_ETL);
    store.insert_row("task_instances", DAILY_ETL);
    store.insert_row("workflow_runs", DAILY_ETL);
    store.insert_row("event_logs", DAILY_ETL);
    store.insert_row("event_logs", DAILY_ETL);

    store.insert_definition(DAILY_ETL_V2, None);
    store.insert_row("task_instances", DAILY_ETL_V2);
    store.insert_row("event_logs", DAILY_ETL_V2);
}

/// `daily_etl.load_task` のシナリオデータ
///
/// 親 `(daily_etl, load_task)` で記録された実行記録 2 件と、
/// 同じ親の別タスクで記録された実行記録 1 件。
pub fn seed_daily_etl_load_task(store: &FakeWorkflowStore) {
    store.insert_definition(DAILY_ETL, None);
    store.insert_definition(DAILY_ETL_LOAD_TASK, None);
    store.insert_task_row("workflow_runs", DAILY_ETL, LOAD_TASK);
    store.insert_task_row("workflow_runs", DAILY_ETL, LOAD_TASK);
    store.insert_task_row("workflow_runs", DAILY_ETL, "extract_task");
}

pub fn purge_usecase(
    store: &FakeWorkflowStore,
    probe: StaticSourceProbe,
    catalog: EntityCatalog,
) -> WorkflowPurgeUseCaseImpl {
    WorkflowPurgeUseCaseImpl::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(probe),
        Arc::new(catalog),
    )
}

pub fn request(raw: &str, keep_audit_records: bool) -> PurgeRequest {
    PurgeRequest::new(WorkflowId::new(raw).unwrap()).with_keep_audit_records(keep_audit_records)
}

/// 定義テーブルと全テーブルのコミット済み行数（変更がないことの確認用）
pub fn snapshot(store: &FakeWorkflowStore, catalog: &EntityCatalog) -> Vec<(&'static str, usize)> {
    std::iter::once(DEFINITION_TABLE)
        .chain(catalog.iter().map(|entity| entity.table()))
        .map(|table| (table, store.count(table)))
        .collect()
}
