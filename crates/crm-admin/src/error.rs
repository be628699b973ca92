//! Application-level error type.

use crate::backend::BackendError;
use crate::catalog::CatalogError;
use crate::inventory::InventoryError;
use crate::session::AuthError;
use crate::settings::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Task failed: {0}")]
    Task(String),
}
