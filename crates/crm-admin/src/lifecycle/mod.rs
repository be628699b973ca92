//! # System Lifecycle & Orchestration
//!
//! This module starts, wires and shuts down the tasks behind one admin session.
//!
//! ## The AdminSystem Pattern
//!
//! [`AdminSystem::start`] runs in a fixed order:
//!
//! 1. **Fail fast** - validate backend settings, then resolve the session token
//! 2. **Editor** - create the inventory editor and start it with the backend handle as its
//!    context (late binding: the actor is constructed first, its dependency injected at `run`)
//! 3. **Filters** - start the debounced filter synchronizer against an in-process router
//! 4. **Load** - load the inventory page once, then spawn a task that reloads it on every
//!    navigation
//!
//! ```rust,ignore
//! let (editor, client) = inventory::new(buffer, timeout);
//! let editor_handle = tokio::spawn(editor.run(backend.clone()));
//! ```
//!
//! ## Graceful Shutdown
//!
//! Shutdown follows the dependency graph, which is acyclic:
//!
//! 1. **Stop the filters** - the debouncers drop, the sync task exits and releases the router
//! 2. **Drop the router** - the reload task sees its channel close and exits, releasing its
//!    page handle
//! 3. **Drop the page** - the last editor client goes away; the editor finishes any
//!    in-flight save, logs what is still pending, and exits
//! 4. **Await** every task handle
//!
//! ## Observability & Tracing
//!
//! Call [`setup_tracing`](edit_framework::tracing::setup_tracing) once in `main`:
//!
//! ```bash
//! RUST_LOG=info cargo run -p crm-admin      # Compact logs
//! RUST_LOG=debug cargo run -p crm-admin     # Every editor event
//! ```

pub mod admin_system;

pub use admin_system::*;
