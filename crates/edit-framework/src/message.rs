//! # Editor Messages
//!
//! This module defines the message types exchanged between the `EditorClient` and
//! the `EditorActor`, plus the internal completion message a commit task sends back.

use crate::error::FrameworkError;
use crate::resource::{BatchFailure, BatchResource};
use crate::session::{CommitTicket, LedgerView, Phase};
use serde::Serialize;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the editor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Outcome of a commit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    /// Sequence number of the submitted batch; `None` when nothing was pending.
    pub seq: Option<u64>,
    /// Number of pairs written.
    pub committed: usize,
}

impl CommitReport {
    pub fn nothing_pending() -> Self {
        Self {
            seq: None,
            committed: 0,
        }
    }
}

/// Requests sent to the editor actor.
///
/// Each variant maps to one event of the edit session state machine, plus `Snapshot`
/// for reading. Every request carries a `respond_to` channel; `Commit` is answered only
/// once the backend has confirmed or rejected the batch.
#[derive(Debug)]
pub enum EditorRequest<T: BatchResource> {
    SetValue {
        id: T::Id,
        value: T::Value,
        respond_to: Response<Phase>,
    },
    Commit {
        respond_to: Response<CommitReport>,
    },
    Discard {
        respond_to: Response<usize>,
    },
    RefreshBaseline {
        values: Vec<(T::Id, T::Value)>,
        respond_to: Response<Phase>,
    },
    Snapshot {
        respond_to: Response<LedgerView<T::Id, T::Value>>,
    },
}

/// Sent by a commit task back to its actor.
pub(crate) struct Completion<T: BatchResource> {
    pub ticket: CommitTicket<T::Id, T::Value>,
    pub result: Result<(), BatchFailure<T::Id, FrameworkError>>,
    pub respond_to: Response<CommitReport>,
}
