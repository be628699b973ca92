//! # Backend Interfaces
//!
//! Persistence, file storage and identity are delegated to a hosted backend. The
//! application only sees the traits in this module, so the process-wide handle is an
//! `Arc<dyn Backend>` injected wherever it is needed: into the inventory editor's context,
//! the catalog service and the dashboard.
//!
//! - [`ProductStore`]: filtered listing, lookup and partial update of products
//! - [`InventoryStore`]: listing and non-atomic batch upsert of inventory rows
//! - [`ObjectStorage`]: public-read uploads and their URLs
//! - [`SessionProvider`]: resolves a session token to the signed-in admin
//!
//! [`MemoryBackend`] implements all four in memory and is used by the demo and the tests.

pub mod memory;

pub use memory::{BackendCall, MemoryBackend};

use crate::model::{
    FilterState, InventoryRecord, InventoryUpsert, Product, ProductId, ProductUpdate,
};
use crate::session::AdminUser;
use async_trait::async_trait;
use edit_framework::BatchFailure;
use thiserror::Error;

/// Errors reported by the hosted backend, surfaced verbatim to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Row not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Backend unavailable")]
    Unavailable,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products matching `filter`, ordered by title ascending.
    async fn list_products(&self, filter: &FilterState) -> Result<Vec<Product>, BackendError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BackendError>;

    /// Applies `update` and returns the stored product.
    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, BackendError>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn list_inventory(&self) -> Result<Vec<InventoryRecord>, BackendError>;

    /// Upserts every row keyed by `product_id`. Not atomic: on failure, the rows that
    /// were written anyway are reported in [`BatchFailure::applied`].
    async fn upsert_inventory(
        &self,
        rows: Vec<InventoryUpsert>,
    ) -> Result<(), BatchFailure<ProductId, BackendError>>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` under `key` with public-read access.
    async fn upload_public(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError>;

    fn public_url(&self, key: &str) -> String;
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The admin signed in with `token`, if any.
    async fn current_user(&self, token: &str) -> Result<Option<AdminUser>, BackendError>;
}

/// The full backend surface.
pub trait Backend: ProductStore + InventoryStore + ObjectStorage + SessionProvider {}

impl<T> Backend for T where T: ProductStore + InventoryStore + ObjectStorage + SessionProvider {}
