//! # Editor Client
//!
//! This module defines the generic client for communicating with an editor actor.

use crate::error::FrameworkError;
use crate::message::{CommitReport, EditorRequest};
use crate::resource::BatchResource;
use crate::session::{LedgerView, Phase};
use tokio::sync::{mpsc, oneshot, watch};

/// ## EditorClient
///
/// The `EditorClient<T>` provides a type‑safe, async API for interacting with an
/// `EditorActor<T>`. It forwards requests over a Tokio mpsc channel and returns results
/// via oneshot channels. The client is cheap to clone and can be shared across tasks.
///
/// * **Cloneable** – holds only a sender and a view receiver.
/// * **Async API** – all methods resolve to `Result<…, FrameworkError>`.
/// * **Observable** – [`subscribe`](Self::subscribe) yields every published [`LedgerView`].
pub struct EditorClient<T: BatchResource> {
    sender: mpsc::Sender<EditorRequest<T>>,
    view: watch::Receiver<LedgerView<T::Id, T::Value>>,
}

impl<T: BatchResource> Clone for EditorClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            view: self.view.clone(),
        }
    }
}

impl<T: BatchResource> EditorClient<T> {
    pub fn new(
        sender: mpsc::Sender<EditorRequest<T>>,
        view: watch::Receiver<LedgerView<T::Id, T::Value>>,
    ) -> Self {
        Self { sender, view }
    }

    /// Records a proposed value. Returns the phase after the edit.
    pub async fn set_value(&self, id: T::Id, value: T::Value) -> Result<Phase, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EditorRequest::SetValue {
                id,
                value,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Submits every pending edit as one batch and waits for the backend's answer.
    ///
    /// Fails fast with `SessionError::CommitInFlight` if another batch is outstanding.
    pub async fn commit(&self) -> Result<CommitReport, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EditorRequest::Commit { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Drops every pending edit. Returns how many were dropped.
    pub async fn discard_all(&self) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EditorRequest::Discard { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Delivers freshly fetched server values.
    pub async fn refresh_baseline(
        &self,
        values: Vec<(T::Id, T::Value)>,
    ) -> Result<Phase, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EditorRequest::RefreshBaseline { values, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn snapshot(&self) -> Result<LedgerView<T::Id, T::Value>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EditorRequest::Snapshot { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Receiver of the views published after every applied event.
    pub fn subscribe(&self) -> watch::Receiver<LedgerView<T::Id, T::Value>> {
        self.view.clone()
    }
}
