//! # Inventory Client
//!
//! Provides a high‑level API for interacting with the inventory editor.
//! It wraps an `EditorClient<StockLevels>` and exposes domain‑specific methods.
use crate::inventory::{parse_quantity, InventoryError, StockLevels};
use crate::model::{ProductId, Quantity};
use async_trait::async_trait;
use edit_framework::{
    CommitReport, EditorClient, FrameworkError, LedgerClient, LedgerView, Phase, SessionError,
};
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Client for interacting with the inventory editor.
#[derive(Clone)]
pub struct InventoryClient {
    inner: EditorClient<StockLevels>,
}

impl InventoryClient {
    pub fn new(inner: EditorClient<StockLevels>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LedgerClient<StockLevels> for InventoryClient {
    type Error = InventoryError;

    fn inner(&self) -> &EditorClient<StockLevels> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::Session(SessionError::CommitInFlight) => InventoryError::SaveInProgress,
            FrameworkError::CommitTimeout(after) => InventoryError::SaveTimedOut(after),
            FrameworkError::ResourceError(err) => InventoryError::SaveFailed(err.to_string()),
            other => InventoryError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl InventoryClient {
    /// Records the raw text typed into a quantity input.
    ///
    /// Invalid text is rejected here and never reaches the ledger.
    #[instrument(skip(self))]
    pub async fn edit_quantity(&self, id: ProductId, input: &str) -> Result<Phase, InventoryError> {
        let quantity = parse_quantity(input)?;
        self.set_quantity(id, quantity).await
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        id: ProductId,
        quantity: Quantity,
    ) -> Result<Phase, InventoryError> {
        debug!("Sending request");
        self.inner
            .set_value(id, quantity)
            .await
            .map_err(Self::map_error)
    }

    /// Saves every pending edit in one batch.
    #[instrument(skip(self))]
    pub async fn save_all(&self) -> Result<CommitReport, InventoryError> {
        debug!("Sending request");
        self.inner.commit().await.map_err(Self::map_error)
    }

    /// Delivers freshly fetched quantities.
    #[instrument(skip(self, quantities), fields(size = quantities.len()))]
    pub async fn refresh(
        &self,
        quantities: Vec<(ProductId, Quantity)>,
    ) -> Result<Phase, InventoryError> {
        debug!("Sending request");
        self.inner
            .refresh_baseline(quantities)
            .await
            .map_err(Self::map_error)
    }

    /// Every view the editor publishes, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<LedgerView<ProductId, Quantity>> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edit_framework::mock::{create_mock_client, expect_commit, expect_set_value};

    #[tokio::test]
    async fn test_edit_quantity_sends_parsed_value() {
        let (client, mut receiver) = create_mock_client::<StockLevels>(10);
        let inventory_client = InventoryClient::new(client);

        let edit_task = tokio::spawn(async move {
            inventory_client.edit_quantity(ProductId(3), " 12 ").await
        });

        let (id, quantity, responder) = expect_set_value(&mut receiver)
            .await
            .expect("Expected SetValue request");

        assert_eq!(id, ProductId(3));
        assert_eq!(quantity, 12);

        responder.send(Ok(Phase::Dirty)).unwrap();

        let result = edit_task.await.unwrap();
        assert_eq!(result.unwrap(), Phase::Dirty);
    }

    #[tokio::test]
    async fn test_invalid_quantity_never_reaches_editor() {
        let (client, mut receiver) = create_mock_client::<StockLevels>(10);
        let inventory_client = InventoryClient::new(client);

        let result = inventory_client.edit_quantity(ProductId(3), "-4").await;

        assert!(matches!(result, Err(InventoryError::InvalidQuantity { .. })));
        drop(inventory_client);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_save_while_saving_maps_to_save_in_progress() {
        let (client, mut receiver) = create_mock_client::<StockLevels>(10);
        let inventory_client = InventoryClient::new(client);

        let save_task = tokio::spawn(async move { inventory_client.save_all().await });

        let responder = expect_commit(&mut receiver)
            .await
            .expect("Expected Commit request");
        responder
            .send(Err(FrameworkError::Session(SessionError::CommitInFlight)))
            .unwrap();

        let result = save_task.await.unwrap();
        assert_eq!(result, Err(InventoryError::SaveInProgress));
    }

    #[tokio::test]
    async fn test_backend_failure_is_surfaced_verbatim() {
        let (client, mut receiver) = create_mock_client::<StockLevels>(10);
        let inventory_client = InventoryClient::new(client);

        let save_task = tokio::spawn(async move { inventory_client.save_all().await });

        let responder = expect_commit(&mut receiver)
            .await
            .expect("Expected Commit request");
        responder
            .send(Err(FrameworkError::resource(
                crate::backend::BackendError::Request("duplicate key".into()),
            )))
            .unwrap();

        match save_task.await.unwrap() {
            Err(InventoryError::SaveFailed(msg)) => assert!(msg.contains("duplicate key")),
            other => panic!("Expected SaveFailed, got {other:?}"),
        }
    }
}
