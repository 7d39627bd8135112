//! # テスト用インメモリストア
//!
//! ユースケーステストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! flowsweep-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! [`FakeWorkflowStore`] は 1 つのストアで [`TransactionManager`]、
//! [`WorkflowDefinitionRepository`]、[`EntityRowDeleter`] を実装する。
//! 削除は tx id 単位でステージングされ、コミット時にのみ反映される。
//! コミットせずに `TxContext` をドロップすると、ステージングは破棄される。
//! 定義レコードの行ロック取得回数も記録する（ロックの有無の検証用）。

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use flowsweep_domain::{
    catalog::EntityDescriptor,
    definition::WorkflowDefinitionRecord,
    workflow::{ParentTask, WorkflowId},
};

use crate::{
    db::{TransactionManager, TxContext},
    definition_source::DefinitionSourceProbe,
    deletion::{EntityRowDeleter, parent_task_columns, workflow_column},
    error::InfraError,
    repository::{DEFINITION_TABLE, WorkflowDefinitionRepository},
};

// ===== FakeWorkflowStore =====

#[derive(Debug, Clone)]
struct FakeRow {
    id:          u64,
    workflow_id: String,
    task_id:     Option<String>,
    fileloc:     Option<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    tables:         HashMap<String, Vec<FakeRow>>,
    staged:         HashMap<u64, HashSet<(String, u64)>>,
    failing_tables: HashSet<String>,
    next_row_id:    u64,
    next_tx_id:     u64,
    commits:        u64,
    locked_reads:   u64,
}

impl FakeState {
    fn insert(&mut self, table: &str, workflow_id: &str, task_id: Option<&str>, fileloc: Option<&str>) {
        self.next_row_id += 1;
        let row = FakeRow {
            id:          self.next_row_id,
            workflow_id: workflow_id.to_string(),
            task_id:     task_id.map(str::to_string),
            fileloc:     fileloc.map(str::to_string),
        };
        self.tables.entry(table.to_string()).or_default().push(row);
    }

    /// tx から見える行（コミット済みかつ、この tx でステージングされていない行）
    fn visible<'a>(&'a self, tx_id: u64, table: &'a str) -> impl Iterator<Item = &'a FakeRow> + 'a {
        let staged = self.staged.get(&tx_id);
        self.tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(move |row| !staged.is_some_and(|s| s.contains(&(table.to_string(), row.id))))
    }

    fn check_failure(&self, table: &str) -> Result<(), InfraError> {
        if self.failing_tables.contains(table) {
            return Err(InfraError::unexpected(format!("{table}: テスト用エラー")));
        }
        Ok(())
    }

    fn stage(&mut self, tx_id: u64, table: &str, ids: Vec<u64>) -> u64 {
        let count = ids.len() as u64;
        let staged = self.staged.entry(tx_id).or_default();
        staged.extend(ids.into_iter().map(|id| (table.to_string(), id)));
        count
    }

    fn apply(&mut self, tx_id: u64) {
        let Some(staged) = self.staged.remove(&tx_id) else {
            return;
        };
        for (table, rows) in &mut self.tables {
            rows.retain(|row| !staged.contains(&(table.clone(), row.id)));
        }
        self.commits += 1;
    }

    fn discard(&mut self, tx_id: u64) {
        self.staged.remove(&tx_id);
    }

    fn find_definition(
        &self,
        tx_id: u64,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowDefinitionRecord>, InfraError> {
        self.check_failure(DEFINITION_TABLE)?;

        Ok(self
            .visible(tx_id, DEFINITION_TABLE)
            .find(|row| row.workflow_id == workflow_id.as_str())
            .map(|row| {
                WorkflowDefinitionRecord::new(
                    workflow_id.clone(),
                    row.fileloc.clone(),
                    workflow_id.is_sub_workflow(),
                )
            }))
    }
}

fn fake_tx_id(tx: &TxContext) -> Result<u64, InfraError> {
    tx.fake_id()
        .ok_or_else(|| InfraError::unexpected("FakeWorkflowStore には fake の TxContext が必要です"))
}

fn matches_parent_task(row: &FakeRow, key: &ParentTask) -> bool {
    row.workflow_id == key.parent.as_str() && row.task_id.as_deref() == Some(key.task.as_str())
}

/// インメモリのワークフローメタデータストア
#[derive(Clone, Default)]
pub struct FakeWorkflowStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 定義レコードを追加する（定義テーブルの行として保存される）
    pub fn insert_definition(&self, workflow_id: &str, fileloc: Option<&str>) {
        self.state
            .lock()
            .unwrap()
            .insert(DEFINITION_TABLE, workflow_id, None, fileloc);
    }

    /// ワークフロー ID のみを持つ行を追加する
    pub fn insert_row(&self, table: &str, workflow_id: &str) {
        self.state
            .lock()
            .unwrap()
            .insert(table, workflow_id, None, None);
    }

    /// ワークフロー ID とタスク ID を持つ行を追加する
    pub fn insert_task_row(&self, table: &str, workflow_id: &str, task_id: &str) {
        self.state
            .lock()
            .unwrap()
            .insert(table, workflow_id, Some(task_id), None);
    }

    /// 指定テーブルへの操作を失敗させる
    pub fn fail_on(&self, table: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_tables
            .insert(table.to_string());
    }

    /// コミット済みの行数
    pub fn count(&self, table: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map_or(0, Vec::len)
    }

    /// コミット済みの行のうち、ワークフロー自身または子孫に属する行数
    pub fn count_covered(&self, table: &str, workflow_id: &WorkflowId) -> usize {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map_or(0, |rows| {
                rows.iter()
                    .filter(|row| workflow_id.covers(&row.workflow_id))
                    .count()
            })
    }

    /// コミット済みの行のワークフロー ID 一覧
    pub fn workflow_ids(&self, table: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(|rows| rows.iter().map(|row| row.workflow_id.clone()).collect())
            .unwrap_or_default()
    }

    /// コミットされたトランザクション数
    pub fn commit_count(&self) -> u64 {
        self.state.lock().unwrap().commits
    }

    /// 定義レコードの行ロックを取得した回数
    pub fn lock_count(&self) -> u64 {
        self.state.lock().unwrap().locked_reads
    }

    /// ステージングが残っているトランザクション数
    pub fn pending_tx_count(&self) -> usize {
        self.state.lock().unwrap().staged.len()
    }
}

#[async_trait]
impl TransactionManager for FakeWorkflowStore {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        let tx_id = {
            let mut state = self.state.lock().unwrap();
            state.next_tx_id += 1;
            state.next_tx_id
        };
        let on_commit = self.state.clone();
        let on_rollback = self.state.clone();
        Ok(TxContext::fake(
            tx_id,
            move || on_commit.lock().unwrap().apply(tx_id),
            move || {
                // ロックが poisoned（テストがパニック中）なら何もしない
                if let Ok(mut state) = on_rollback.lock() {
                    state.discard(tx_id);
                }
            },
        ))
    }
}

#[async_trait]
impl WorkflowDefinitionRepository for FakeWorkflowStore {
    async fn find_for_update(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowDefinitionRecord>, InfraError> {
        let tx_id = fake_tx_id(tx)?;
        let mut state = self.state.lock().unwrap();
        let record = state.find_definition(tx_id, workflow_id)?;
        state.locked_reads += 1;
        Ok(record)
    }

    async fn find(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowDefinitionRecord>, InfraError> {
        let tx_id = fake_tx_id(tx)?;
        self.state.lock().unwrap().find_definition(tx_id, workflow_id)
    }
}

#[async_trait]
impl EntityRowDeleter for FakeWorkflowStore {
    async fn delete_by_workflow(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        workflow_id: &WorkflowId,
    ) -> Result<u64, InfraError> {
        workflow_column(entity)?;
        let tx_id = fake_tx_id(tx)?;
        let mut state = self.state.lock().unwrap();
        state.check_failure(entity.table())?;

        let ids: Vec<u64> = state
            .visible(tx_id, entity.table())
            .filter(|row| workflow_id.covers(&row.workflow_id))
            .map(|row| row.id)
            .collect();
        Ok(state.stage(tx_id, entity.table(), ids))
    }

    async fn delete_by_parent_task(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        key: &ParentTask,
    ) -> Result<u64, InfraError> {
        parent_task_columns(entity)?;
        let tx_id = fake_tx_id(tx)?;
        let mut state = self.state.lock().unwrap();
        state.check_failure(entity.table())?;

        let ids: Vec<u64> = state
            .visible(tx_id, entity.table())
            .filter(|row| matches_parent_task(row, key))
            .map(|row| row.id)
            .collect();
        Ok(state.stage(tx_id, entity.table(), ids))
    }

    async fn count_by_workflow(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        workflow_id: &WorkflowId,
    ) -> Result<u64, InfraError> {
        workflow_column(entity)?;
        let tx_id = fake_tx_id(tx)?;
        let state = self.state.lock().unwrap();
        state.check_failure(entity.table())?;

        Ok(state
            .visible(tx_id, entity.table())
            .filter(|row| workflow_id.covers(&row.workflow_id))
            .count() as u64)
    }

    async fn count_by_parent_task(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        key: &ParentTask,
    ) -> Result<u64, InfraError> {
        parent_task_columns(entity)?;
        let tx_id = fake_tx_id(tx)?;
        let state = self.state.lock().unwrap();
        state.check_failure(entity.table())?;

        Ok(state
            .visible(tx_id, entity.table())
            .filter(|row| matches_parent_task(row, key))
            .count() as u64)
    }
}

// ===== StaticSourceProbe =====

/// 存在するパスを固定した DefinitionSourceProbe
#[derive(Clone, Default)]
pub struct StaticSourceProbe {
    existing: HashSet<String>,
    probed:   Arc<Mutex<Vec<String>>>,
}

impl StaticSourceProbe {
    /// どのパスも存在しない Probe
    pub fn empty() -> Self {
        Self::default()
    }

    /// 指定パスが存在する Probe
    pub fn with_existing<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            existing: paths.into_iter().map(Into::into).collect(),
            probed:   Arc::default(),
        }
    }

    /// 確認されたパスの一覧
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DefinitionSourceProbe for StaticSourceProbe {
    async fn exists(&self, fileloc: &str) -> Result<bool, InfraError> {
        self.probed.lock().unwrap().push(fileloc.to_string());
        Ok(self.existing.contains(fileloc))
    }
}
