//! # CRM Admin
//!
//! Back-office demo: an inventory editor with batched saves, debounced URL filters,
//! a product catalog with image upload, and dashboard metrics.
//!
//! ## Core Components
//!
//! - **[edit_framework]**: the pending-edit ledger, commit state machine, editor actor and debouncer.
//! - **[model]**: plain data ([`Product`], inventory rows, filters).
//! - **[backend]**: the hosted-backend seam and an in-memory implementation.
//! - **[lifecycle]**: [`AdminSystem`], which starts and stops everything for one session.
//!
//! ## Quick Start
//!
//! `main` seeds a [`MemoryBackend`], signs in, edits two quantities, saves them in one
//! batch, filters the table and uploads an image.
//!
//! [model]: crm_admin::model
//! [backend]: crm_admin::backend
//! [lifecycle]: crm_admin::lifecycle

use crm_admin::backend::{Backend, MemoryBackend};
use crm_admin::catalog::ImageUpload;
use crm_admin::lifecycle::AdminSystem;
use crm_admin::model::{Product, ProductId};
use crm_admin::session::AdminUser;
use crm_admin::settings::AdminConfig;
use crm_admin::AdminError;
use edit_framework::tracing::setup_tracing;
use std::sync::Arc;
use tracing::{error, info, Instrument};

const DEMO_TOKEN: &str = "demo-session";

fn demo_backend() -> MemoryBackend {
    MemoryBackend::new("memory://demo/storage/v1/object/public/product-images")
        .with_product(Product::new(3, "Ceramic Mug").with_color("blue"))
        .with_product(Product::new(5, "Canvas Apron").with_color("red"))
        .with_product(Product::new(7, "Blue Teapot").with_color("blue"))
        .with_product(Product::new(9, "Tea Towel"))
        .with_stock(3, 0)
        .with_stock(5, 2)
        .with_stock(7, 14)
        .with_session(DEMO_TOKEN, AdminUser::new("admin-1", "admin@example.com"))
}

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AdminConfig::load()?;
    let backend: Arc<dyn Backend> = Arc::new(demo_backend());

    let system = AdminSystem::start(config, backend, DEMO_TOKEN).await?;
    info!(user = %system.user.email, "Signed in");

    let metrics = system.dashboard().await?;
    match serde_json::to_string_pretty(&metrics) {
        Ok(json) => info!("Dashboard\n{json}"),
        Err(e) => error!(error = %e, "Could not render dashboard"),
    }

    let span = tracing::info_span!("inventory_edit");
    async {
        let client = system.inventory.client();
        client.edit_quantity(ProductId(3), "12").await?;
        client.edit_quantity(ProductId(7), "9").await?;
        if let Err(e) = client.edit_quantity(ProductId(5), "-1").await {
            info!(error = %e, "Invalid input rejected");
        }
        let report = client.save_all().await?;
        info!(committed = report.committed, "Inventory saved");
        Ok::<_, AdminError>(())
    }
    .instrument(span)
    .await?;

    // Typing settles after the debounce window, navigates, and reloads the table
    system.filters.set_color("blue");
    tokio::time::sleep(system.filters.delay() * 2).await;
    for row in system.inventory.rows().await? {
        info!(
            id = %row.product_id,
            title = row.title.as_deref().unwrap_or("-"),
            quantity = row.quantity,
            dirty = row.dirty,
            "Row"
        );
    }
    info!(location = %system.navigator.location(), "Filtered");
    system.filters.clear_filters();

    let upload = ImageUpload::new("mug.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let product = system.catalog.upload_image(ProductId(3), upload).await?;
    info!(url = product.image_url.as_deref().unwrap_or("-"), "Image uploaded");

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
