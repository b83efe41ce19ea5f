use std::fmt;
use thiserror::Error;

use crate::store::{StoreError, TaskId};

/// Which write a [`SyncError::Write`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
    Delete,
}

impl WriteOp {
    /// Progressive form used in log lines ("Error adding task").
    pub fn verb(&self) -> &'static str {
        match self {
            WriteOp::Create => "adding",
            WriteOp::Update => "updating",
            WriteOp::Delete => "deleting",
        }
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteOp::Create => "create",
            WriteOp::Update => "update",
            WriteOp::Delete => "delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to load tasks: {0}")]
    Fetch(#[source] StoreError),

    #[error("Failed to {op} task: {source}")]
    Write {
        op: WriteOp,
        #[source]
        source: StoreError,
    },

    #[error("Task not found: {0}")]
    UnknownTask(TaskId),
}

impl SyncError {
    pub fn is_fetch(&self) -> bool {
        matches!(self, SyncError::Fetch(_))
    }

    pub fn write_op(&self) -> Option<WriteOp> {
        match self {
            SyncError::Write { op, .. } => Some(*op),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
