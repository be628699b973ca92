//! # Inventory Editor
//!
//! This module implements the inventory quantity editor on top of the edit framework.
//!
//! ## Overview
//!
//! Admins type new stock levels into a table of products. Each change is recorded as a
//! pending edit against the quantities last fetched from the backend; a single save sends
//! every pending edit as one batch upsert.
//!
//! ## Structure
//!
//! - [`entity`]: [`BatchResource`](edit_framework::BatchResource) implementation, [`StockLevels`]
//! - [`error`]: [`InventoryError`] type for type-safe error handling
//! - [`page`]: [`InventoryPage`], which loads, joins and renders the table
//! - [`new()`]: Factory function that creates the editor actor and client
//!
//! ## Usage
//!
//! ```rust
//! use crm_admin::backend::{Backend, MemoryBackend};
//! use crm_admin::clients::InventoryClient;
//! use crm_admin::inventory;
//! use crm_admin::model::{Product, ProductId};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend: Arc<dyn Backend> =
//!         Arc::new(MemoryBackend::default().with_product(Product::new(3, "Mug")));
//!
//!     let (actor, generic_client) = inventory::new(32, Duration::from_secs(15));
//!     let client = InventoryClient::new(generic_client);
//!     tokio::spawn(actor.run(backend));
//!
//!     client.refresh(vec![(ProductId(3), 0)]).await?;
//!     client.edit_quantity(ProductId(3), "12").await?;
//!     let report = client.save_all().await?;
//!     assert_eq!(report.committed, 1);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;
pub mod page;

pub use entity::*;
pub use error::*;
pub use page::*;

use crate::model::Quantity;
use edit_framework::{EditorActor, EditorClient};
use std::time::Duration;

/// Creates a new inventory editor actor and its client.
pub fn new(
    buffer_size: usize,
    commit_timeout: Duration,
) -> (EditorActor<StockLevels>, EditorClient<StockLevels>) {
    EditorActor::new(buffer_size, commit_timeout)
}

/// Parses the raw text of a quantity input.
///
/// Surrounding whitespace is ignored. Blank, negative, fractional and non-numeric input
/// is rejected before it can reach the ledger.
pub fn parse_quantity(input: &str) -> Result<Quantity, InventoryError> {
    input
        .trim()
        .parse::<Quantity>()
        .map_err(|_| InventoryError::InvalidQuantity {
            input: input.to_string(),
        })
}
