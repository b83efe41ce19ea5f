//! Task synchronization: keeps the local list consistent with the remote table
//!
//! Every public operation makes exactly one remote call and changes local
//! state only after that call succeeds. Failures are logged and returned;
//! the local list is left as it was.

mod error;
mod list;

pub use error::{Result, SyncError, WriteOp};
pub use list::TaskList;

use tracing::{debug, error};

use crate::store::{NewTask, StoreError, Task, TaskId, TaskStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}

pub struct TaskSynchronizer<S> {
    store: S,
    tasks: TaskList,
    state: LoadState,
    loaded: bool,
}

impl<S: TaskStore> TaskSynchronizer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: TaskList::new(),
            state: LoadState::Uninitialized,
            loaded: false,
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// True until the first load has finished, whatever its outcome.
    pub fn is_loading(&self) -> bool {
        self.state != LoadState::Ready
    }

    /// True when the most recent load failed (or none has succeeded yet
    /// after a failure). An empty list looks the same either way.
    pub fn load_failed(&self) -> bool {
        self.state == LoadState::Ready && !self.loaded
    }

    /// Fetch every row and replace the local list with it.
    ///
    /// On failure the local list is left untouched, which after start-up
    /// means empty.
    pub async fn load(&mut self) -> Result<usize> {
        if self.state == LoadState::Uninitialized {
            self.state = LoadState::Loading;
        }

        let fetched = self.store.list().await;
        self.state = LoadState::Ready;

        match fetched {
            Ok(tasks) => {
                debug!("Loaded {} tasks", tasks.len());
                self.tasks.replace_all(tasks);
                self.loaded = true;
                Ok(self.tasks.len())
            }
            Err(e) => {
                error!("Error loading tasks: {}", e);
                self.loaded = false;
                Err(SyncError::Fetch(e))
            }
        }
    }

    /// Insert a task and prepend the row the store returns.
    ///
    /// A title that is blank after trimming is ignored: `Ok(None)` and no
    /// remote call. The title is otherwise sent as given.
    pub async fn create(&mut self, title: &str) -> Result<Option<Task>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        match self.store.insert(&NewTask::new(title)).await {
            Ok(task) => {
                debug!("Created task {}", task.id);
                self.tasks.prepend(task.clone());
                Ok(Some(task))
            }
            Err(e) => Err(write_failed(WriteOp::Create, e)),
        }
    }

    /// Set `completed = !current_completed` on `id`, trusting the caller's
    /// view of the current value. Returns the new value.
    pub async fn toggle_complete(&mut self, id: &TaskId, current_completed: bool) -> Result<bool> {
        let completed = !current_completed;
        match self.store.set_completed(id, completed).await {
            Ok(()) => {
                if !self.tasks.set_completed(id, completed) {
                    debug!("Toggled task {} is not in the local list", id);
                }
                Ok(completed)
            }
            Err(e) => Err(write_failed(WriteOp::Update, e)),
        }
    }

    /// Flip `completed` on `id`, reading the current value from the local
    /// list at the moment of the write.
    pub async fn toggle(&mut self, id: &TaskId) -> Result<bool> {
        let current = self
            .tasks
            .get(id)
            .map(|t| t.completed)
            .ok_or_else(|| SyncError::UnknownTask(id.clone()))?;
        self.toggle_complete(id, current).await
    }

    /// Delete `id` remotely, then drop it from the local list. Returns
    /// whether a local row was removed; the remote call is made either way.
    pub async fn delete(&mut self, id: &TaskId) -> Result<bool> {
        match self.store.delete(id).await {
            Ok(()) => Ok(self.tasks.remove(id)),
            Err(e) => Err(write_failed(WriteOp::Delete, e)),
        }
    }
}

fn write_failed(op: WriteOp, source: StoreError) -> SyncError {
    error!("Error {} task: {}", op.verb(), source);
    SyncError::Write { op, source }
}
