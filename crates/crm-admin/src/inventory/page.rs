//! The inventory page: products joined with stock, rendered against the editor's ledger.

use super::error::InventoryError;
use crate::backend::{Backend, InventoryStore, ProductStore};
use crate::clients::InventoryClient;
use crate::model::{
    join_quantities, FilterState, InventoryRecord, InventoryRow, Product, ProductId, Quantity,
};
use edit_framework::{LedgerClient, LedgerView};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

pub struct InventoryPage {
    backend: Arc<dyn Backend>,
    client: InventoryClient,
    products: RwLock<Vec<Product>>,
}

impl InventoryPage {
    pub fn new(backend: Arc<dyn Backend>, client: InventoryClient) -> Self {
        Self {
            backend,
            client,
            products: RwLock::new(Vec::new()),
        }
    }

    pub fn client(&self) -> &InventoryClient {
        &self.client
    }

    /// Fetches products matching `filter` and all stock, delivers the joined quantities
    /// to the editor as a fresh baseline and returns the rendered rows.
    ///
    /// Unsaved edits survive the reload, including edits on rows the filter now hides.
    #[instrument(skip(self))]
    pub async fn load(&self, filter: &FilterState) -> Result<Vec<InventoryRow>, InventoryError> {
        let products = self.backend.list_products(filter).await?;
        let records = self.backend.list_inventory().await?;
        let known = self.client.snapshot().await?;
        let quantities = fresh_baseline(&products, &records, &known);

        let phase = self.client.refresh(quantities).await?;
        info!(products = products.len(), ?phase, "Inventory loaded");

        *self.products.write().await = products;
        self.rows().await
    }

    /// Rows for the last loaded products, showing the current ledger state.
    pub async fn rows(&self) -> Result<Vec<InventoryRow>, InventoryError> {
        let view = self.client.snapshot().await?;
        let products = self.products.read().await;
        Ok(render_rows(&products, &view))
    }
}

/// Quantities for the loaded products plus every id the ledger already tracks.
///
/// Inventory is always fetched in full, so hidden rows get their server value too; without
/// them a filtered load would leave pending edits on hidden rows with no baseline.
pub fn fresh_baseline(
    products: &[Product],
    records: &[InventoryRecord],
    known: &LedgerView<ProductId, Quantity>,
) -> Vec<(ProductId, Quantity)> {
    let mut quantities = join_quantities(products, records);
    let loaded: BTreeSet<ProductId> = quantities.iter().map(|(id, _)| *id).collect();
    let stock: HashMap<ProductId, Quantity> = records
        .iter()
        .map(|r| (r.product_id, r.quantity))
        .collect();

    let hidden: BTreeSet<ProductId> = known
        .baseline
        .keys()
        .chain(known.pending.keys())
        .filter(|id| !loaded.contains(id))
        .copied()
        .collect();
    quantities.extend(
        hidden
            .into_iter()
            .map(|id| (id, stock.get(&id).copied().unwrap_or(0))),
    );
    quantities
}

/// One row per product, in product order. A product the ledger does not know shows 0.
pub fn render_rows(
    products: &[Product],
    view: &LedgerView<ProductId, Quantity>,
) -> Vec<InventoryRow> {
    products
        .iter()
        .map(|product| InventoryRow {
            product_id: product.id,
            title: product.title.clone(),
            color: product.color.clone(),
            quantity: view.displayed.get(&product.id).copied().unwrap_or(0),
            dirty: view.pending.contains_key(&product.id),
        })
        .collect()
}
