//! Background synchronizer for TUI responsiveness
//!
//! Owns the `TaskSynchronizer` in a tokio task so the UI keeps drawing while a
//! remote call is in flight. Requests are handled one at a time in arrival
//! order, so two toggles of the same row can never interleave.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::store::{Task, TaskId, TaskStore};
use crate::sync::{SyncError, TaskList, TaskSynchronizer};

#[derive(Debug, Clone, PartialEq)]
pub enum SyncRequest {
    Load,
    Create { title: String },
    Toggle { id: TaskId },
    Delete { id: TaskId },
}

#[derive(Debug)]
pub enum SyncOutcome {
    Loaded(usize),
    /// `None` when the title was blank and nothing was sent.
    Created(Option<Task>),
    Toggled { id: TaskId, completed: bool },
    Deleted { id: TaskId },
}

/// What the worker reports after each request.
#[derive(Debug)]
pub struct SyncReply {
    pub result: Result<SyncOutcome, SyncError>,
    /// The synchronizer's list after the request was handled.
    pub tasks: TaskList,
    pub loading: bool,
    pub load_failed: bool,
}

pub struct SyncWorker {
    request_tx: mpsc::UnboundedSender<SyncRequest>,
    reply_rx: mpsc::UnboundedReceiver<SyncReply>,
    _handle: JoinHandle<()>,
    in_flight: usize,
}

impl SyncWorker {
    /// Must be called from within a tokio runtime.
    pub fn spawn<S: TaskStore + 'static>(store: S) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<SyncRequest>();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel::<SyncReply>();

        let handle = tokio::spawn(async move {
            let mut sync = TaskSynchronizer::new(store);
            while let Some(request) = request_rx.recv().await {
                let result = Self::handle(&mut sync, request).await;
                let reply = SyncReply {
                    result,
                    tasks: sync.tasks().clone(),
                    loading: sync.is_loading(),
                    load_failed: sync.load_failed(),
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
        });

        Self {
            request_tx,
            reply_rx,
            _handle: handle,
            in_flight: 0,
        }
    }

    async fn handle<S: TaskStore>(
        sync: &mut TaskSynchronizer<S>,
        request: SyncRequest,
    ) -> Result<SyncOutcome, SyncError> {
        match request {
            SyncRequest::Load => sync.load().await.map(SyncOutcome::Loaded),
            SyncRequest::Create { title } => sync.create(&title).await.map(SyncOutcome::Created),
            SyncRequest::Toggle { id } => {
                let completed = sync.toggle(&id).await?;
                Ok(SyncOutcome::Toggled { id, completed })
            }
            SyncRequest::Delete { id } => {
                sync.delete(&id).await?;
                Ok(SyncOutcome::Deleted { id })
            }
        }
    }

    pub fn request(&mut self, request: SyncRequest) {
        if self.request_tx.send(request).is_ok() {
            self.in_flight += 1;
        } else {
            tracing::warn!("Sync worker has stopped; request dropped");
        }
    }

    pub fn try_recv(&mut self) -> Option<SyncReply> {
        match self.reply_rx.try_recv() {
            Ok(reply) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(reply)
            }
            Err(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }
}
