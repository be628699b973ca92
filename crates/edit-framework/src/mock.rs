//! # Mock Framework & Testing Guide
//!
//! Utilities for testing domain clients in isolation, without spawning an editor actor.
//!
//! ## When to use Mocks vs the Real Actor
//!
//! | Feature | Mock | Real Actor |
//! |---------|------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real ledger | Real ledger and commit protocol |
//! | **Use Case** | Logic *around* the client (parsing, mapping errors) | The commit protocol itself |
//!
//! ## Pattern 0: Client Logic Test (Pure Mock)
//!
//! ```rust
//! use edit_framework::mock::{create_mock_client, expect_set_value};
//! use edit_framework::{BatchFailure, BatchResource, Change, Phase};
//! use async_trait::async_trait;
//!
//! #[derive(Debug, thiserror::Error)] #[error("err")] struct E;
//! struct Prices;
//!
//! #[async_trait]
//! impl BatchResource for Prices {
//!     type Id = u32; type Value = u64; type Context = (); type Error = E;
//!     async fn commit(_: Vec<Change<u32, u64>>, _: &()) -> Result<(), BatchFailure<u32, E>> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, mut requests) = create_mock_client::<Prices>(10);
//!     let task = tokio::spawn(async move { client.set_value(1, 250).await });
//!
//!     let (id, value, responder) = expect_set_value(&mut requests).await.unwrap();
//!     assert_eq!((id, value), (1, 250));
//!     responder.send(Ok(Phase::Dirty)).unwrap();
//!
//!     assert_eq!(task.await.unwrap().unwrap(), Phase::Dirty);
//! }
//! ```
//!
//! ## Pattern 1: Real Actor, Scripted Resource
//!
//! Implement [`BatchResource`](crate::BatchResource) with a `Context` that records batches
//! and scripts failures, then drive the real [`EditorActor`](crate::EditorActor).
//! See `tests/editor_actor_test.rs`.
//!
//! ## Pattern 2: Full System
//!
//! Spin up the whole application against an in-memory backend; see the application
//! crate's integration tests.

use crate::client::EditorClient;
use crate::error::FrameworkError;
use crate::message::{CommitReport, EditorRequest};
use crate::resource::BatchResource;
use crate::session::{LedgerView, Phase};
use tokio::sync::{mpsc, oneshot, watch};

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a client and the receiver its requests arrive on.
///
/// The client's view channel stays at the default (clean, empty) view.
pub fn create_mock_client<T: BatchResource>(
    buffer_size: usize,
) -> (EditorClient<T>, mpsc::Receiver<EditorRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_view_tx, view_rx) = watch::channel(LedgerView::default());
    (EditorClient::new(sender, view_rx), receiver)
}

/// Helper to verify that the next message is a SetValue request
pub async fn expect_set_value<T: BatchResource>(
    receiver: &mut mpsc::Receiver<EditorRequest<T>>,
) -> Option<(T::Id, T::Value, Responder<Phase>)> {
    match receiver.recv().await {
        Some(EditorRequest::SetValue {
            id,
            value,
            respond_to,
        }) => Some((id, value, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Commit request
pub async fn expect_commit<T: BatchResource>(
    receiver: &mut mpsc::Receiver<EditorRequest<T>>,
) -> Option<Responder<CommitReport>> {
    match receiver.recv().await {
        Some(EditorRequest::Commit { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Discard request
pub async fn expect_discard<T: BatchResource>(
    receiver: &mut mpsc::Receiver<EditorRequest<T>>,
) -> Option<Responder<usize>> {
    match receiver.recv().await {
        Some(EditorRequest::Discard { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a RefreshBaseline request
pub async fn expect_refresh<T: BatchResource>(
    receiver: &mut mpsc::Receiver<EditorRequest<T>>,
) -> Option<(Vec<(T::Id, T::Value)>, Responder<Phase>)> {
    match receiver.recv().await {
        Some(EditorRequest::RefreshBaseline { values, respond_to }) => Some((values, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Snapshot request
pub async fn expect_snapshot<T: BatchResource>(
    receiver: &mut mpsc::Receiver<EditorRequest<T>>,
) -> Option<Responder<LedgerView<T::Id, T::Value>>> {
    match receiver.recv().await {
        Some(EditorRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}
