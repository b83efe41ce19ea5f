//! In-process table store for tests
//!
//! Behaves like the hosted table: it assigns ids and timestamps on insert,
//! treats updates and deletes that match nothing as successes, and lists rows
//! newest first. Failures can be injected per call kind.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{NewTask, StoreError, Task, TaskId, TaskStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Insert,
    Update,
    Delete,
}

#[derive(Default)]
struct Table {
    rows: Vec<Task>,
    clock: Option<DateTime<Utc>>,
    next_ids: VecDeque<TaskId>,
    failing: HashSet<StoreOp>,
    calls: HashMap<StoreOp, usize>,
}

impl Table {
    fn tick(&mut self) -> DateTime<Utc> {
        let now = match self.clock {
            Some(last) => last + Duration::seconds(1),
            None => Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().unwrap_or_default(),
        };
        self.clock = Some(now);
        now
    }

    fn begin(&mut self, op: StoreOp) -> Result<(), StoreError> {
        *self.calls.entry(op).or_default() += 1;
        if self.failing.remove(&op) {
            return Err(StoreError::Unavailable(format!("injected {:?} failure", op)));
        }
        Ok(())
    }

    fn add_row(&mut self, title: &str) -> Task {
        let id = self
            .next_ids
            .pop_front()
            .unwrap_or_else(|| TaskId::new(uuid::Uuid::new_v4().to_string()));
        let task = Task {
            id,
            title: title.to_string(),
            completed: false,
            created_at: self.tick(),
        };
        self.rows.push(task.clone());
        task
    }
}

/// Cloning shares the underlying table.
#[derive(Clone, Default)]
pub struct MemoryStore {
    table: Arc<Mutex<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a row directly, bypassing call counting and failure injection.
    pub fn seed(&self, title: &str) -> Task {
        self.table().add_row(title)
    }

    /// Use `id` for the next inserted row instead of a random uuid.
    pub fn assign_next_id(&self, id: impl Into<String>) {
        self.table().next_ids.push_back(TaskId::new(id));
    }

    /// Make the next call of kind `op` fail.
    pub fn fail_next(&self, op: StoreOp) {
        self.table().failing.insert(op);
    }

    /// Number of calls of kind `op` received so far.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.table().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.table().calls.values().sum()
    }

    /// Rows as stored, newest first.
    pub fn rows(&self) -> Vec<Task> {
        let mut rows = self.table().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

impl TaskStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        self.table().begin(StoreOp::List)?;
        Ok(self.rows())
    }

    async fn insert(&self, task: &NewTask) -> Result<Task, StoreError> {
        let mut table = self.table();
        table.begin(StoreOp::Insert)?;
        Ok(table.add_row(&task.title))
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), StoreError> {
        let mut table = self.table();
        table.begin(StoreOp::Update)?;
        for row in table.rows.iter_mut().filter(|r| &r.id == id) {
            row.completed = completed;
        }
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        let mut table = self.table();
        table.begin(StoreOp::Delete)?;
        table.rows.retain(|r| &r.id != id);
        Ok(())
    }
}
