//! `BatchResource` implementation for inventory quantities.
//!
//! The editor keys its ledger by [`ProductId`] and holds [`Quantity`] values. A commit
//! turns the ordered batch into upsert rows stamped with the current time and writes them
//! in one call to the injected backend.

use crate::backend::{Backend, BackendError};
use crate::model::{InventoryUpsert, ProductId, Quantity};
use async_trait::async_trait;
use chrono::Utc;
use edit_framework::{BatchFailure, BatchResource, Change};
use std::sync::Arc;
use tracing::debug;

/// Marker type for the stock-level editor.
pub struct StockLevels;

#[async_trait]
impl BatchResource for StockLevels {
    type Id = ProductId;
    type Value = Quantity;
    type Context = Arc<dyn Backend>;
    type Error = BackendError;

    async fn commit(
        batch: Vec<Change<ProductId, Quantity>>,
        backend: &Arc<dyn Backend>,
    ) -> Result<(), BatchFailure<ProductId, BackendError>> {
        let now = Utc::now();
        let rows: Vec<InventoryUpsert> = batch
            .into_iter()
            .map(|change| InventoryUpsert::new(change.id, change.value, now))
            .collect();
        debug!(size = rows.len(), "Upserting inventory");
        backend.upsert_inventory(rows).await
    }
}
