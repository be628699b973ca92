//! In-memory backend for the demo and for tests.
//!
//! Records every call and can be scripted to fail: the next upsert, an upsert that
//! stops after N rows (a partial batch), slow upserts, and session lookups.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use edit_framework::BatchFailure;

use super::{BackendError, InventoryStore, ObjectStorage, ProductStore, SessionProvider};
use crate::model::{
    FilterState, InventoryRecord, InventoryUpsert, Product, ProductId, ProductUpdate, Quantity,
};
use crate::session::AdminUser;

/// A recorded call to the memory backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    ListProducts(FilterState),
    GetProduct(ProductId),
    UpdateProduct(ProductId, ProductUpdate),
    ListInventory,
    UpsertInventory(Vec<InventoryUpsert>),
    Upload { key: String, size: usize },
    CurrentUser,
}

/// A blob held by the memory object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct MemoryBackend {
    public_base: String,
    products: Mutex<BTreeMap<ProductId, Product>>,
    inventory: Mutex<BTreeMap<ProductId, InventoryRecord>>,
    objects: Mutex<BTreeMap<String, StoredObject>>,
    sessions: Mutex<HashMap<String, AdminUser>>,
    calls: Mutex<Vec<BackendCall>>,
    upsert_error: Mutex<Option<BackendError>>,
    partial_upsert: Mutex<Option<(usize, BackendError)>>,
    upsert_delay: Mutex<Option<Duration>>,
    session_error: Mutex<Option<BackendError>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new("memory://storage")
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl MemoryBackend {
    /// `public_base` prefixes every public object URL.
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            products: Mutex::new(BTreeMap::new()),
            inventory: Mutex::new(BTreeMap::new()),
            objects: Mutex::new(BTreeMap::new()),
            sessions: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            upsert_error: Mutex::new(None),
            partial_upsert: Mutex::new(None),
            upsert_delay: Mutex::new(None),
            session_error: Mutex::new(None),
        }
    }

    /// Pre-populate a product.
    pub fn with_product(self, product: Product) -> Self {
        lock(&self.products).insert(product.id, product);
        self
    }

    /// Pre-populate an inventory row.
    pub fn with_stock(self, id: impl Into<ProductId>, quantity: Quantity) -> Self {
        let product_id = id.into();
        lock(&self.inventory).insert(
            product_id,
            InventoryRecord {
                product_id,
                quantity,
                updated_at: Utc::now(),
            },
        );
        self
    }

    /// Register a signed-in admin for `token`.
    pub fn with_session(self, token: impl Into<String>, user: AdminUser) -> Self {
        lock(&self.sessions).insert(token.into(), user);
        self
    }

    /// Makes the next upsert fail without writing anything.
    pub fn fail_next_upsert(&self, err: BackendError) {
        *lock(&self.upsert_error) = Some(err);
    }

    /// Makes the next upsert write its first `applied` rows, then fail.
    pub fn fail_upsert_after(&self, applied: usize, err: BackendError) {
        *lock(&self.partial_upsert) = Some((applied, err));
    }

    /// Delays every upsert by `delay`; `None` removes the delay.
    pub fn set_upsert_delay(&self, delay: Option<Duration>) {
        *lock(&self.upsert_delay) = delay;
    }

    /// Makes the next session lookup fail.
    pub fn fail_next_session(&self, err: BackendError) {
        *lock(&self.session_error) = Some(err);
    }

    /// Return all recorded calls.
    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.calls).clone()
    }

    /// Every upsert batch received, in order, including failed ones.
    pub fn upserts(&self) -> Vec<Vec<InventoryUpsert>> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                BackendCall::UpsertInventory(rows) => Some(rows.clone()),
                _ => None,
            })
            .collect()
    }

    /// Stored quantity, or `None` if no row was ever written.
    pub fn quantity(&self, id: impl Into<ProductId>) -> Option<Quantity> {
        lock(&self.inventory).get(&id.into()).map(|r| r.quantity)
    }

    /// Directly overwrite a stored quantity, as another admin would.
    pub fn set_stock(&self, id: impl Into<ProductId>, quantity: Quantity) {
        let product_id = id.into();
        lock(&self.inventory).insert(
            product_id,
            InventoryRecord {
                product_id,
                quantity,
                updated_at: Utc::now(),
            },
        );
    }

    pub fn product(&self, id: impl Into<ProductId>) -> Option<Product> {
        lock(&self.products).get(&id.into()).cloned()
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        lock(&self.objects).get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        lock(&self.objects).len()
    }

    fn record(&self, call: BackendCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl ProductStore for MemoryBackend {
    async fn list_products(&self, filter: &FilterState) -> Result<Vec<Product>, BackendError> {
        self.record(BackendCall::ListProducts(filter.clone()));
        let mut products: Vec<Product> = lock(&self.products)
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.display_title().cmp(b.display_title()));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        self.record(BackendCall::GetProduct(id));
        Ok(lock(&self.products).get(&id).cloned())
    }

    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, BackendError> {
        self.record(BackendCall::UpdateProduct(id, update.clone()));
        let mut products = lock(&self.products);
        let product = products
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("products/{id}")))?;
        product.apply(update);
        Ok(product.clone())
    }
}

#[async_trait]
impl InventoryStore for MemoryBackend {
    async fn list_inventory(&self) -> Result<Vec<InventoryRecord>, BackendError> {
        self.record(BackendCall::ListInventory);
        Ok(lock(&self.inventory).values().cloned().collect())
    }

    async fn upsert_inventory(
        &self,
        rows: Vec<InventoryUpsert>,
    ) -> Result<(), BatchFailure<ProductId, BackendError>> {
        self.record(BackendCall::UpsertInventory(rows.clone()));

        let delay = *lock(&self.upsert_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = lock(&self.upsert_error).take() {
            return Err(BatchFailure::new(err));
        }

        let partial = lock(&self.partial_upsert).take();
        let (limit, failure) = match partial {
            Some((applied, err)) => (applied.min(rows.len()), Some(err)),
            None => (rows.len(), None),
        };

        let mut inventory = lock(&self.inventory);
        let mut applied = Vec::with_capacity(limit);
        for row in rows.into_iter().take(limit) {
            applied.push(row.product_id);
            inventory.insert(row.product_id, row.into());
        }

        match failure {
            Some(err) => Err(BatchFailure::new(err).with_applied(applied)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStorage for MemoryBackend {
    async fn upload_public(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        self.record(BackendCall::Upload {
            key: key.to_string(),
            size: bytes.len(),
        });
        lock(&self.objects).insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}

#[async_trait]
impl SessionProvider for MemoryBackend {
    async fn current_user(&self, token: &str) -> Result<Option<AdminUser>, BackendError> {
        self.record(BackendCall::CurrentUser);
        if let Some(err) = lock(&self.session_error).take() {
            return Err(err);
        }
        Ok(lock(&self.sessions).get(token).cloned())
    }
}
