//! Dashboard metrics computed from the product and inventory tables.

use crate::backend::{Backend, BackendError, InventoryStore, ProductStore};
use crate::model::{join_quantities, FilterState, InventoryRecord, Product, Quantity};
use crate::session::AdminUser;
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub products: usize,
    pub units_in_stock: u64,
    pub out_of_stock: usize,
    /// In stock but below the configured threshold.
    pub low_stock: usize,
    pub without_image: usize,
}

/// Missing inventory counts as zero units, like on the inventory page.
pub fn compute_metrics(
    products: &[Product],
    records: &[InventoryRecord],
    low_stock_threshold: Quantity,
) -> DashboardMetrics {
    let mut metrics = DashboardMetrics {
        products: products.len(),
        without_image: products.iter().filter(|p| p.image_url.is_none()).count(),
        ..DashboardMetrics::default()
    };
    for (_, quantity) in join_quantities(products, records) {
        metrics.units_in_stock += u64::from(quantity);
        if quantity == 0 {
            metrics.out_of_stock += 1;
        } else if quantity < low_stock_threshold {
            metrics.low_stock += 1;
        }
    }
    metrics
}

#[instrument(skip(backend, user), fields(user = %user.email))]
pub async fn load_metrics(
    backend: &dyn Backend,
    user: &AdminUser,
    low_stock_threshold: Quantity,
) -> Result<DashboardMetrics, BackendError> {
    let products = backend.list_products(&FilterState::default()).await?;
    let records = backend.list_inventory().await?;
    let metrics = compute_metrics(&products, &records, low_stock_threshold);
    info!(?metrics, "Dashboard computed");
    Ok(metrics)
}
