//! Error types for the product catalog.

use crate::backend::BackendError;
use crate::model::ProductId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Title is required")]
    TitleRequired,

    #[error("The selected file is empty")]
    EmptyImage,

    #[error("File name {0:?} has no extension")]
    MissingExtension(String),

    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
