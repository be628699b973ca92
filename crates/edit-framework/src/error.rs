//! # Framework Errors
//!
//! This module defines the common error types used throughout the edit framework.
//! By centralizing error definitions, we ensure consistent error handling across
//! the editor actor and every client that talks to it.

use crate::session::SessionError;
use std::time::Duration;

/// Errors that can occur within the edit framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Editor closed")]
    ActorClosed,
    #[error("Editor dropped response channel")]
    ActorDropped,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Batch commit timed out after {0:?}")]
    CommitTimeout(Duration),
    #[error("Rejected value for {id}: {reason}")]
    Rejected {
        id: String,
        reason: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Resource error: {0}")]
    ResourceError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Wraps a resource-level error (e.g. a failed upsert) for transport to the client.
    pub fn resource<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FrameworkError::ResourceError(Box::new(error))
    }
}
