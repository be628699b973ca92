//! # LedgerClient Trait
//!
//! Provides a common interface for resource‑specific editor clients, adding default
//! `snapshot`, `discard_all` and `has_pending` methods on top of a generic `EditorClient`.
use crate::session::LedgerView;
use crate::{BatchResource, EditorClient, FrameworkError};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard editor operations.
///
/// # Example
///
/// ```rust
/// use edit_framework::{BatchFailure, BatchResource, Change, EditorClient, FrameworkError, LedgerClient};
/// use async_trait::async_trait;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct PriceError(String);
///
/// struct Prices;
///
/// #[async_trait]
/// impl BatchResource for Prices {
///     type Id = u32;
///     type Value = u64;
///     type Context = ();
///     type Error = PriceError;
///
///     async fn commit(_: Vec<Change<u32, u64>>, _: &()) -> Result<(), BatchFailure<u32, PriceError>> {
///         Ok(())
///     }
/// }
///
/// struct PriceClient {
///     inner: EditorClient<Prices>,
/// }
///
/// #[async_trait]
/// impl LedgerClient<Prices> for PriceClient {
///     type Error = PriceError;
///
///     fn inner(&self) -> &EditorClient<Prices> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         PriceError(e.to_string())
///     }
/// }
///
/// async fn usage(client: PriceClient) {
///     // snapshot(), discard_all() and has_pending() are provided automatically!
///     let _ = client.has_pending().await;
///     let _ = client.discard_all().await;
/// }
/// ```
#[async_trait]
pub trait LedgerClient<T: BatchResource>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic EditorClient.
    fn inner(&self) -> &EditorClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<LedgerView<T::Id, T::Value>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().snapshot().await.map_err(Self::map_error)
    }

    /// Drop every pending edit.
    #[tracing::instrument(skip(self))]
    async fn discard_all(&self) -> Result<usize, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().discard_all().await.map_err(Self::map_error)
    }

    /// Whether the commit affordance should be visible.
    async fn has_pending(&self) -> Result<bool, Self::Error> {
        Ok(self.snapshot().await?.has_pending())
    }
}
