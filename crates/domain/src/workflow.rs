//! # ワークフロー識別子
//!
//! ワークフローとサブワークフローを識別する値オブジェクト。
//!
//! ## サブワークフローの表現
//!
//! 親ワークフローのタスクとして起動されるサブワークフローは、
//! `<親ワークフロー ID>.<タスク ID>` という ID を持つ。
//! 区切り文字 `.` の存在がネストを表す。
//!
//! ```text
//! daily_etl               ← 親ワークフロー
//! daily_etl.load_task     ← daily_etl の load_task として起動されたサブワークフロー
//! ```
//!
//! 親子の分割は **最後の** 区切り文字で行う。
//! `a.b.c` は親 `a.b`・タスク `c` と解釈される。

use serde::{Deserialize, Serialize};

/// サブワークフロー ID の区切り文字
pub const SUB_WORKFLOW_SEPARATOR: char = '.';

/// 識別子の最大文字数（DB の VARCHAR(250) に合わせる）
const MAX_ID_LENGTH: usize = 250;

define_validated_id! {
    /// ワークフロー ID（値オブジェクト）
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 250 文字
    ///
    /// LIKE のワイルドカード（`%`, `_`）はエスケープしない。
    /// これらを含む ID のプレフィックス照合は意図より広く一致しうる。
    pub struct WorkflowId {
        label: "ワークフロー ID",
        max_length: MAX_ID_LENGTH,
    }
}

define_validated_id! {
    /// タスク ID（値オブジェクト）
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 250 文字
    pub struct TaskId {
        label: "タスク ID",
        max_length: MAX_ID_LENGTH,
    }
}

impl WorkflowId {
    /// サブワークフローかどうか（ID に区切り文字を含むか）
    pub fn is_sub_workflow(&self) -> bool {
        self.0.contains(SUB_WORKFLOW_SEPARATOR)
    }

    /// サブワークフロー ID を親ワークフロー ID とタスク ID に分割する
    ///
    /// 最後の区切り文字で分割する。区切り文字を含まない場合、
    /// または分割後のいずれかが空になる場合（`".x"`, `"x."`）は `None` を返す。
    ///
    /// # 例
    ///
    /// ```rust
    /// use flowsweep_domain::workflow::WorkflowId;
    ///
    /// let id = WorkflowId::new("a.b.c").unwrap();
    /// let (parent, task) = id.split_sub_workflow().unwrap();
    /// assert_eq!(parent.as_str(), "a.b");
    /// assert_eq!(task.as_str(), "c");
    ///
    /// assert!(WorkflowId::new("daily_etl").unwrap().split_sub_workflow().is_none());
    /// ```
    pub fn split_sub_workflow(&self) -> Option<(WorkflowId, TaskId)> {
        let (parent, task) = self.0.rsplit_once(SUB_WORKFLOW_SEPARATOR)?;
        let parent = WorkflowId::new(parent).ok()?;
        let task = TaskId::new(task).ok()?;
        Some((parent, task))
    }

    /// 子孫（サブワークフロー）の ID が共通して持つプレフィックス（`"<id>."`）
    pub fn descendant_prefix(&self) -> String {
        format!("{}{}", self.0, SUB_WORKFLOW_SEPARATOR)
    }

    /// 指定された ID がこのワークフロー自身、またはその子孫かどうか
    ///
    /// 永続化層の `= id OR LIKE id || '.%'` と同じ判定をメモリ上で行う。
    pub fn covers(&self, candidate: &str) -> bool {
        candidate == self.0 || candidate.starts_with(&self.descendant_prefix())
    }
}

/// サブワークフローの親子関係
///
/// 実行履歴は、サブワークフローを起動した親ワークフローの ID と
/// 起動元タスクの ID で記録される。その行を特定するためのキー。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentTask {
    pub parent: WorkflowId,
    pub task:   TaskId,
}

impl From<(WorkflowId, TaskId)> for ParentTask {
    fn from((parent, task): (WorkflowId, TaskId)) -> Self {
        Self { parent, task }
    }
}
