//! # BatchResource Trait
//!
//! The `BatchResource` trait defines the contract for anything whose values can be edited
//! locally and written back in one batch (inventory quantities, prices, …). It specifies
//! associated types for identifiers, values, the injected context and errors, and provides
//! two hooks: `validate` (runs before a value enters the ledger) and `commit` (writes a batch).
//!
//! # Architecture Note
//! The editor actor, the ledger and the state machine are written *once* against this trait.
//! A domain only describes what an id and a value are, and how a batch reaches the backend.
//!
//! We use "Associated Types" (type Id, type Value, etc.) to enforce type safety.
//! An inventory editor only accepts quantities keyed by product ids; the compiler
//! rejects anything else.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// One proposed value in a batch commit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Change<I, V> {
    pub id: I,
    pub value: V,
}

impl<I, V> Change<I, V> {
    pub fn new(id: I, value: V) -> Self {
        Self { id, value }
    }
}

/// A failed batch write.
///
/// Batches are not atomic. `applied` lists the ids the backend confirmed before the
/// failure; the editor folds those into the baseline and keeps the rest pending.
#[derive(Debug)]
pub struct BatchFailure<I, E> {
    pub applied: Vec<I>,
    pub error: E,
}

impl<I, E> BatchFailure<I, E> {
    /// A failure where nothing is known to have been applied.
    pub fn new(error: E) -> Self {
        Self {
            applied: Vec::new(),
            error,
        }
    }

    pub fn with_applied(mut self, applied: Vec<I>) -> Self {
        self.applied = applied;
        self
    }
}

impl<I, E> From<E> for BatchFailure<I, E> {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

/// Trait that any batch-editable resource must implement to be managed by an
/// [`EditorActor`](crate::EditorActor).
///
/// # Async & Context
/// This trait is `#[async_trait]` because `commit` talks to the outside world.
/// The `Context` type carries those dependencies (e.g. a backend handle) and is
/// injected through `run()` rather than `new()`, the same late binding used for clients.
#[async_trait]
pub trait BatchResource: Send + Sync + 'static {
    /// Identifier of an editable row. `Ord` fixes the ledger iteration order,
    /// which is also the order pairs are serialized in a batch.
    type Id: Ord + Clone + Send + Sync + Display + Debug + 'static;

    /// The editable value (e.g. a quantity).
    type Value: PartialEq + Clone + Send + Sync + Debug + 'static;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync + 'static;

    /// The error type for this resource.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Checks a proposed value before it is recorded. Rejected values never reach the ledger.
    fn validate(_id: &Self::Id, _value: &Self::Value) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Writes one batch. Called at most once at a time per editor.
    async fn commit(
        batch: Vec<Change<Self::Id, Self::Value>>,
        ctx: &Self::Context,
    ) -> Result<(), BatchFailure<Self::Id, Self::Error>>;
}
