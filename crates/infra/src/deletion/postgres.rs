//! # PostgresEntityRowDeleter
//!
//! エンティティ記述子のテーブル名・列名から DELETE / COUNT を組み立てて実行する。
//!
//! テーブル名・列名は起動時に構築したカタログ由来の値のみを受け付ける。
//! 識別子は二重引用符でクォートし、値は必ずバインドパラメータで渡す。

use async_trait::async_trait;
use flowsweep_domain::{
    catalog::EntityDescriptor,
    workflow::{ParentTask, WorkflowId},
};

use super::{EntityRowDeleter, parent_task_columns, workflow_column};
use crate::{db::TxContext, error::InfraError};

/// PostgreSQL 実装の EntityRowDeleter
#[derive(Debug, Clone, Default)]
pub struct PostgresEntityRowDeleter;

impl PostgresEntityRowDeleter {
    pub fn new() -> Self {
        Self
    }
}

/// SQL 識別子をクォートする（`"` は `""` にエスケープ）
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// ワークフロー ID の子孫に一致する LIKE パターン（`W.%`）
fn descendant_pattern(workflow_id: &WorkflowId) -> String {
    format!("{}%", workflow_id.descendant_prefix())
}

fn workflow_predicate(entity: &EntityDescriptor) -> Result<String, InfraError> {
    let column = quote_ident(workflow_column(entity)?);
    Ok(format!("{column} = $1 OR {column} LIKE $2"))
}

fn parent_task_predicate(entity: &EntityDescriptor) -> Result<String, InfraError> {
    let (workflow, task) = parent_task_columns(entity)?;
    Ok(format!(
        "{} = $1 AND {} = $2",
        quote_ident(workflow),
        quote_ident(task)
    ))
}

#[async_trait]
impl EntityRowDeleter for PostgresEntityRowDeleter {
    #[tracing::instrument(skip_all, level = "debug", fields(entity = entity.name(), %workflow_id))]
    async fn delete_by_workflow(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        workflow_id: &WorkflowId,
    ) -> Result<u64, InfraError> {
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            quote_ident(entity.table()),
            workflow_predicate(entity)?
        );
        let result = sqlx::query(&sql)
            .bind(workflow_id.as_str())
            .bind(descendant_pattern(workflow_id))
            .execute(tx.conn()?)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(entity = entity.name(), parent = %key.parent, task = %key.task)
    )]
    async fn delete_by_parent_task(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        key: &ParentTask,
    ) -> Result<u64, InfraError> {
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            quote_ident(entity.table()),
            parent_task_predicate(entity)?
        );
        let result = sqlx::query(&sql)
            .bind(key.parent.as_str())
            .bind(key.task.as_str())
            .execute(tx.conn()?)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(entity = entity.name(), %workflow_id))]
    async fn count_by_workflow(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        workflow_id: &WorkflowId,
    ) -> Result<u64, InfraError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            quote_ident(entity.table()),
            workflow_predicate(entity)?
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(workflow_id.as_str())
            .bind(descendant_pattern(workflow_id))
            .fetch_one(tx.conn()?)
            .await?;

        Ok(count as u64)
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(entity = entity.name(), parent = %key.parent, task = %key.task)
    )]
    async fn count_by_parent_task(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        key: &ParentTask,
    ) -> Result<u64, InfraError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            quote_ident(entity.table()),
            parent_task_predicate(entity)?
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(key.parent.as_str())
            .bind(key.task.as_str())
            .fetch_one(tx.conn()?)
            .await?;

        Ok(count as u64)
    }
}
