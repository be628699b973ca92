//! # Editor Actor
//!
//! This module defines the `EditorActor`, the component that owns an [`EditSession`] and
//! drives it with messages from its clients. It is the single owner of the ledger: every
//! event is applied sequentially, so no locks are needed.
//!
//! Network boundaries never block the loop. A commit is handed to a spawned task and its
//! result comes back on an internal completion channel, which lets users keep editing
//! while a batch is outstanding.

use crate::client::EditorClient;
use crate::error::FrameworkError;
use crate::message::{CommitReport, Completion, EditorRequest, Response};
use crate::resource::{BatchFailure, BatchResource};
use crate::session::{CommitTicket, EditEvent, EditSession, Effect, LedgerView, SessionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Upper bound for a single batch commit unless configured otherwise.
pub const DEFAULT_COMMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// The actor that owns one edit session.
///
/// # Architecture Note
/// This struct is the "Server" half of the editor. It owns the session, the receiver end
/// of the request channel and the publisher of [`LedgerView`] snapshots.
///
/// **Ordering**: completions and requests are both processed by this one loop, so a
/// commit confirmation is fully applied before any baseline refresh queued after it.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `EditorActor::new()` to get the `actor` and its `client`.
/// 2.  **Wire**: Pass the resource context (e.g. a backend handle) into `actor.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// ```rust
/// use edit_framework::{BatchFailure, BatchResource, Change, EditorActor};
/// use async_trait::async_trait;
/// use std::time::Duration;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("never fails")]
/// struct Never;
///
/// struct Prices;
///
/// #[async_trait]
/// impl BatchResource for Prices {
///     type Id = u32;
///     type Value = u64;
///     type Context = ();
///     type Error = Never;
///
///     async fn commit(_: Vec<Change<u32, u64>>, _: &()) -> Result<(), BatchFailure<u32, Never>> {
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = EditorActor::<Prices>::new(8, Duration::from_secs(5));
///     tokio::spawn(actor.run(()));
///
///     client.refresh_baseline(vec![(1, 100)]).await.unwrap();
///     client.set_value(1, 120).await.unwrap();
///     let report = client.commit().await.unwrap();
///     assert_eq!(report.committed, 1);
/// }
/// ```
pub struct EditorActor<T: BatchResource> {
    receiver: mpsc::Receiver<EditorRequest<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    session: EditSession<T::Id, T::Value>,
    view: watch::Sender<LedgerView<T::Id, T::Value>>,
    commit_timeout: Duration,
}

impl<T: BatchResource> EditorActor<T> {
    /// Creates a new `EditorActor` and its associated `EditorClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the request channel. If the channel is full,
    ///   client calls wait until there is space.
    /// * `commit_timeout` - How long a single batch commit may take before it is
    ///   reported as failed.
    pub fn new(buffer_size: usize, commit_timeout: Duration) -> (Self, EditorClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(LedgerView::default());
        let actor = Self {
            receiver,
            completions,
            completion_tx,
            session: EditSession::default(),
            view,
            commit_timeout,
        };
        let client = EditorClient::new(sender, view_rx);
        (actor, client)
    }

    /// Runs the event loop until every client is dropped.
    ///
    /// An in-flight commit is awaited before the loop exits so its outcome is still applied
    /// and answered.
    pub async fn run(mut self, context: T::Context) {
        let context = Arc::new(context);
        // Extract just the type name (e.g., "StockLevels" instead of "crm_admin::inventory::StockLevels")
        let resource = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(resource, "Editor started");

        let mut open = true;
        loop {
            tokio::select! {
                biased;
                Some(done) = self.completions.recv() => self.finish_commit(resource, done),
                msg = self.receiver.recv(), if open => match msg {
                    Some(msg) => self.handle(resource, msg, &context),
                    None => open = false,
                },
                else => break,
            }

            if !open && self.session.in_flight().is_none() {
                break;
            }
        }

        info!(
            resource,
            pending = self.session.ledger().pending().len(),
            "Shutdown"
        );
    }

    fn handle(&mut self, resource: &str, msg: EditorRequest<T>, context: &Arc<T::Context>) {
        match msg {
            EditorRequest::SetValue {
                id,
                value,
                respond_to,
            } => {
                debug!(resource, %id, ?value, "ValueChanged");
                if let Err(e) = T::validate(&id, &value) {
                    warn!(resource, %id, error = %e, "Value rejected");
                    let _ = respond_to.send(Err(FrameworkError::Rejected {
                        id: id.to_string(),
                        reason: Box::new(e),
                    }));
                    return;
                }
                let result = self
                    .apply(resource, EditEvent::ValueChanged { id, value })
                    .map(|_| self.session.phase())
                    .map_err(FrameworkError::from);
                let _ = respond_to.send(result);
            }
            EditorRequest::Commit { respond_to } => {
                debug!(resource, "CommitRequested");
                match self.apply(resource, EditEvent::CommitRequested) {
                    Ok(Effect::Submit(ticket)) => {
                        info!(resource, seq = ticket.seq, size = ticket.batch.len(), "Commit submitted");
                        self.submit(ticket, respond_to, context.clone());
                    }
                    Ok(Effect::None) => {
                        debug!(resource, "Nothing to commit");
                        let _ = respond_to.send(Ok(CommitReport::nothing_pending()));
                    }
                    Err(e) => {
                        let _ = respond_to.send(Err(e.into()));
                    }
                }
            }
            EditorRequest::Discard { respond_to } => {
                let dropped = self.session.ledger().pending().len();
                debug!(resource, dropped, "DiscardRequested");
                let result = self
                    .apply(resource, EditEvent::DiscardRequested)
                    .map(|_| dropped)
                    .map_err(FrameworkError::from);
                let _ = respond_to.send(result);
            }
            EditorRequest::RefreshBaseline { values, respond_to } => {
                debug!(resource, size = values.len(), "BaselineRefreshed");
                let result = self
                    .apply(resource, EditEvent::BaselineRefreshed { values })
                    .map(|_| self.session.phase())
                    .map_err(FrameworkError::from);
                let _ = respond_to.send(result);
            }
            EditorRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.session.view()));
            }
        }
    }

    fn submit(
        &self,
        ticket: CommitTicket<T::Id, T::Value>,
        respond_to: Response<CommitReport>,
        context: Arc<T::Context>,
    ) {
        let completion_tx = self.completion_tx.clone();
        let timeout = self.commit_timeout;
        tokio::spawn(async move {
            let batch = ticket.batch.clone();
            let result = match tokio::time::timeout(timeout, T::commit(batch, &context)).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(failure)) => Err(BatchFailure::new(FrameworkError::resource(
                    failure.error,
                ))
                .with_applied(failure.applied)),
                Err(_) => Err(BatchFailure::new(FrameworkError::CommitTimeout(timeout))),
            };
            let _ = completion_tx.send(Completion {
                ticket,
                result,
                respond_to,
            });
        });
    }

    fn finish_commit(&mut self, resource: &str, done: Completion<T>) {
        let seq = done.ticket.seq;
        let size = done.ticket.batch.len();
        match done.result {
            Ok(()) => {
                let result = self
                    .apply(resource, EditEvent::CommitSucceeded { seq })
                    .map(|_| CommitReport {
                        seq: Some(seq),
                        committed: size,
                    })
                    .map_err(FrameworkError::from);
                if result.is_ok() {
                    info!(resource, seq, size, "Commit confirmed");
                }
                let _ = done.respond_to.send(result);
            }
            Err(failure) => {
                warn!(
                    resource,
                    seq,
                    size,
                    applied = failure.applied.len(),
                    error = %failure.error,
                    "Commit failed"
                );
                let applied = failure.applied;
                let outcome = self.apply(resource, EditEvent::CommitFailed { seq, applied });
                let error = match outcome {
                    Ok(_) => failure.error,
                    Err(e) => e.into(),
                };
                let _ = done.respond_to.send(Err(error));
            }
        }
    }

    /// Applies one event and publishes the resulting view.
    fn apply(
        &mut self,
        resource: &str,
        event: EditEvent<T::Id, T::Value>,
    ) -> Result<Effect<T::Id, T::Value>, SessionError> {
        match self.session.handle(event) {
            Ok(effect) => {
                self.view.send_replace(self.session.view());
                Ok(effect)
            }
            Err(e) => {
                warn!(resource, error = %e, "Event refused");
                Err(e)
            }
        }
    }
}
