//! # Edit Framework
//!
//! This crate provides the building blocks for editing server-owned values locally and
//! writing them back in batches: a pending-edit ledger, an explicit commit state machine,
//! an actor that owns both, and a debounce primitive for the inputs that feed it.
//!
//! ## Why an Actor?
//!
//! An edit session has exactly one owner. User edits, commit confirmations and background
//! refreshes all arrive asynchronously, but they must be applied in order and never
//! interleaved. Running the session inside a single Tokio task that processes messages
//! sequentially gives that ordering without locks:
//!
//! - a commit confirmation is fully applied before any refresh queued after it
//! - a refresh that lands mid-commit cannot clobber unsaved edits
//! - a second commit while one is in flight is refused, never interleaved
//!
//! ## Core Concepts
//!
//! ### The Ledger ([`ledger`])
//! Three maps per id: `baseline` (server truth), `pending` (proposed values that differ
//! from it) and `displayed` (what to render). See [`PendingLedger`].
//!
//! ### The State Machine ([`session`])
//! [`EditSession`] applies discrete [`EditEvent`]s (`ValueChanged`, `CommitRequested`,
//! `CommitSucceeded`, `CommitFailed`, `BaselineRefreshed`, `DiscardRequested`) and moves
//! between `Clean`, `Dirty` and `Committing`. It performs no I/O.
//!
//! ### The Resource ([`BatchResource`])
//! A domain describes its id and value types and how one batch reaches the backend.
//! Batches are not atomic: a [`BatchFailure`] reports which ids were applied anyway.
//!
//! ### The Actor ([`EditorActor`]) and Client ([`EditorClient`])
//! The actor owns the session; the cloneable client sends requests and can subscribe to
//! every published [`LedgerView`]. Commits run in a spawned task under a timeout, so the
//! loop keeps accepting edits while a batch is outstanding.
//!
//! ### Debounce ([`debounce`])
//! [`Debouncer`] lags a rapidly-changing value until it has been stable for a delay.
//!
//! ## Quick Start
//!
//! ```rust
//! use edit_framework::{BatchFailure, BatchResource, Change, EditorActor, Phase};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("stock error")]
//! struct StockError;
//!
//! struct Stock;
//!
//! #[async_trait]
//! impl BatchResource for Stock {
//!     type Id = u32;
//!     type Value = u32;
//!     type Context = ();
//!     type Error = StockError;
//!
//!     async fn commit(_: Vec<Change<u32, u32>>, _: &()) -> Result<(), BatchFailure<u32, StockError>> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = EditorActor::<Stock>::new(16, Duration::from_secs(5));
//!     tokio::spawn(actor.run(()));
//!
//!     client.refresh_baseline(vec![(3, 1), (7, 1)]).await.unwrap();
//!     assert_eq!(client.set_value(3, 5).await.unwrap(), Phase::Dirty);
//!     assert_eq!(client.set_value(3, 1).await.unwrap(), Phase::Clean);
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module lets you test domain clients without spawning an actor.
//! Timer-driven behavior (debounce windows, commit timeouts) is tested with
//! `#[tokio::test(start_paused = true)]`.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod debounce;
pub mod error;
pub mod ledger;
pub mod message;
pub mod mock;
pub mod resource;
pub mod session;
pub mod tracing;

// Re-export core types for convenience
pub use actor::{EditorActor, DEFAULT_COMMIT_TIMEOUT};
pub use client::EditorClient;
pub use client_trait::LedgerClient;
pub use debounce::Debouncer;
pub use error::FrameworkError;
pub use ledger::PendingLedger;
pub use message::{CommitReport, EditorRequest, Response};
pub use resource::{BatchFailure, BatchResource, Change};
pub use session::{CommitTicket, EditEvent, EditSession, Effect, LedgerView, Phase, SessionError};
