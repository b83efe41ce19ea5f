//! Local, ordered mirror of the remote table

use crate::store::{Task, TaskId};

/// Tasks in display order (newest first).
///
/// The order is whatever the last full load returned, with later inserts
/// prepended. Nothing here re-sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn prepend(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Returns false when no row has this id.
    pub fn set_completed(&mut self, id: &TaskId, completed: bool) -> bool {
        let mut found = false;
        for task in self.tasks.iter_mut().filter(|t| &t.id == id) {
            task.completed = completed;
            found = true;
        }
        found
    }

    /// Returns false when no row has this id.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        self.tasks.len() != before
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Progress line, e.g. "1 of 3 completed".
    pub fn summary(&self) -> String {
        format!("{} of {} completed", self.completed_count(), self.len())
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}
