//! Kanban board view over a project's tasks.
//!
//! Status moves are two-phase: [`Board::apply_status`] changes the local copy
//! right away and hands back a [`StatusChange`], which the caller must either
//! `confirm` once the remote write lands or `rollback` if it fails.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::models::{Task, TaskStatus};

/// Remote side of a status move.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    tasks: Vec<Task>,
}

/// One column of the board.
#[derive(Debug)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

/// A locally applied status move awaiting the server's verdict.
#[must_use = "a status change must be confirmed or rolled back"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    task_id: String,
    from: TaskStatus,
    to: TaskStatus,
}

impl StatusChange {
    pub fn confirm(self) {
        debug!(task_id = %self.task_id, status = %self.to, "status change confirmed");
    }

    /// Put the task back where it was. Returns false if the task is gone.
    pub fn rollback(self, board: &mut Board) -> bool {
        warn!(task_id = %self.task_id, from = %self.to, to = %self.from, "rolling back status change");
        match board.tasks.iter_mut().find(|t| t.id == self.task_id) {
            Some(task) => {
                task.status = self.from;
                true
            }
            None => false,
        }
    }
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn columns(&self) -> Vec<Column<'_>> {
        TaskStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                tasks: self.tasks.iter().filter(|t| t.status == status).collect(),
            })
            .collect()
    }

    /// Move a task locally. `None` when the task is unknown or already in `status`.
    pub fn apply_status(&mut self, task_id: &str, status: TaskStatus) -> Option<StatusChange> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        if task.status == status {
            return None;
        }
        let from = task.status;
        task.status = status;
        Some(StatusChange {
            task_id: task_id.to_string(),
            from,
            to: status,
        })
    }

    pub fn remove(&mut self, task_id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == task_id)?;
        Some(self.tasks.remove(idx))
    }
}

/// Apply a move locally, write it remotely, then confirm or roll back.
///
/// Returns `Ok(false)` when there was nothing to move.
pub async fn sync_status_change(
    backend: &dyn TaskBackend,
    board: &mut Board,
    task_id: &str,
    status: TaskStatus,
) -> Result<bool, ApiError> {
    let Some(change) = board.apply_status(task_id, status) else {
        return Ok(false);
    };

    match backend.update_task_status(task_id, status).await {
        Ok(()) => {
            change.confirm();
            Ok(true)
        }
        Err(e) => {
            change.rollback(board);
            Err(e)
        }
    }
}
