//! Remote table store: task rows and the client seam
//!
//! The store is the source of truth. Everything here is a thin, typed view of
//! the `tasks` table contract; reconciliation lives in [`crate::sync`].

mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
mod rest;

pub use error::StoreError;
pub use rest::RestStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::future::Future;

/// Row identifier assigned by the store.
///
/// Opaque to the client. Hosted tables use either uuid (JSON string) or
/// identity (JSON integer) primary keys, so both decode into the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => TaskId(s),
            RawId::Signed(n) => TaskId(n.to_string()),
            RawId::Unsigned(n) => TaskId(n.to_string()),
        })
    }
}

/// A row of the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. The store fills in everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// The four calls the synchronizer makes against the remote table.
///
/// Each call is one round-trip. Implementations must not retry.
pub trait TaskStore: Send + Sync {
    /// All rows, newest `created_at` first.
    fn list(&self) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Insert one row and return it as stored (with `id`, `completed`, `created_at`).
    fn insert(&self, task: &NewTask) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Set `completed` on the row matching `id`. Matching nothing is not an error.
    fn set_completed(
        &self,
        id: &TaskId,
        completed: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete the row matching `id`. Matching nothing is not an error.
    fn delete(&self, id: &TaskId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
