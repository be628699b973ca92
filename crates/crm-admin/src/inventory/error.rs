//! Error types for the inventory editor.

use crate::backend::BackendError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while editing or saving quantities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The typed text is not a non-negative whole number.
    #[error("Invalid quantity {input:?}: enter a whole number of 0 or more")]
    InvalidQuantity { input: String },

    /// Save was pressed while a previous save is still running.
    #[error("A save is already in progress")]
    SaveInProgress,

    /// The batch did not complete in time; edits are kept.
    #[error("Save timed out after {0:?}; your changes are still pending")]
    SaveTimedOut(Duration),

    /// The backend rejected (part of) the batch; unsaved edits are kept.
    #[error("Save failed: {0}")]
    SaveFailed(String),

    /// Loading products or stock failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An error occurred while communicating with the editor.
    #[error("Editor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for InventoryError {
    fn from(msg: String) -> Self {
        InventoryError::ActorCommunicationError(msg)
    }
}
