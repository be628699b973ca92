use crate::backend::Backend;
use crate::catalog::CatalogService;
use crate::clients::InventoryClient;
use crate::dashboard::{load_metrics, DashboardMetrics};
use crate::error::AdminError;
use crate::filters::{FilterSync, HistoryNavigator};
use crate::inventory::{self, InventoryPage};
use crate::model::{FilterState, Quantity};
use crate::session::{require_user, AdminUser};
use crate::settings::AdminConfig;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Route of the inventory page, which owns the filter synchronizer.
pub const INVENTORY_ROUTE: &str = "/inventory";

/// The runtime orchestrator for one signed-in admin session.
///
/// `AdminSystem` is responsible for:
/// - **Fail-fast startup**: refusing to start without backend settings or a valid session
/// - **Lifecycle Management**: starting and stopping the inventory editor, the filter
///   synchronizer and the reload task
/// - **Dependency Wiring**: injecting the shared backend handle into every consumer
///
/// # Example
///
/// ```ignore
/// let system = AdminSystem::start(config, backend, &token).await?;
///
/// system.inventory.client().edit_quantity(ProductId(3), "12").await?;
/// system.inventory.client().save_all().await?;
///
/// system.shutdown().await?;
/// ```
pub struct AdminSystem {
    pub user: AdminUser,

    /// The inventory page and, through it, the editor client
    pub inventory: Arc<InventoryPage>,

    pub catalog: CatalogService,

    /// Debounced search/color inputs of the inventory page
    pub filters: FilterSync,

    /// Router of the inventory page
    pub navigator: Arc<HistoryNavigator>,

    backend: Arc<dyn Backend>,
    low_stock_threshold: Quantity,

    /// Task handles for the reload task and the editor (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl AdminSystem {
    /// Validates configuration, authenticates `token`, and starts every task.
    ///
    /// The inventory page is loaded once before this returns.
    pub async fn start(
        config: AdminConfig,
        backend: Arc<dyn Backend>,
        token: &str,
    ) -> Result<Self, AdminError> {
        config.validate()?;
        let user = require_user(backend.as_ref(), token).await?;
        info!(user = %user.email, backend = %config.backend.url, "Starting admin system");

        // 1. Editor, with the backend as its context
        let (editor, editor_client) = inventory::new(
            config.inventory.editor_buffer,
            config.inventory.commit_timeout(),
        );
        let editor_handle = tokio::spawn(editor.run(backend.clone()));
        let page = Arc::new(InventoryPage::new(
            backend.clone(),
            InventoryClient::new(editor_client),
        ));

        // 2. Filters
        let navigator = Arc::new(HistoryNavigator::new(INVENTORY_ROUTE, ""));
        let filters = FilterSync::spawn(
            INVENTORY_ROUTE,
            navigator.clone(),
            config.filters.debounce(),
        );

        // 3. First load, then reload whenever the filters navigate
        page.load(&navigator.current()).await?;
        let reload_handle = tokio::spawn(reload_on_navigation(page.clone(), navigator.subscribe()));

        let catalog = CatalogService::new(backend.clone(), user.clone());

        Ok(Self {
            user,
            inventory: page,
            catalog,
            filters,
            navigator,
            backend,
            low_stock_threshold: config.dashboard.low_stock_threshold,
            handles: vec![reload_handle, editor_handle],
        })
    }

    pub async fn dashboard(&self) -> Result<DashboardMetrics, AdminError> {
        Ok(load_metrics(self.backend.as_ref(), &self.user, self.low_stock_threshold).await?)
    }

    /// Gracefully shuts down the session.
    ///
    /// Stopping the filters closes the navigator, which ends the reload task; dropping the
    /// last page handle then closes the editor. An in-flight save is finished first.
    pub async fn shutdown(self) -> Result<(), AdminError> {
        info!("Shutting down admin system...");

        let Self {
            inventory,
            filters,
            navigator,
            handles,
            ..
        } = self;

        filters.shutdown().await;
        drop(navigator);
        drop(inventory);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(AdminError::Task(e.to_string()));
            }
        }

        info!("Admin system shutdown complete.");
        Ok(())
    }
}

async fn reload_on_navigation(page: Arc<InventoryPage>, mut filters: watch::Receiver<FilterState>) {
    while filters.changed().await.is_ok() {
        let filter = filters.borrow_and_update().clone();
        if let Err(e) = page.load(&filter).await {
            warn!(error = %e, ?filter, "Inventory reload failed");
        }
    }
}
