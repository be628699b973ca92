//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! The subscriber uses a compact format that hides the crate/module prefix (`with_target(false)`);
//! the editor logs a `resource` field instead, so lines stay short while remaining filterable.
//!
//! ## What Gets Traced
//!
//! - **Editor Lifecycle**: startup and shutdown, with the number of edits left pending
//! - **Events**: `ValueChanged`, `CommitRequested`, `BaselineRefreshed`, `DiscardRequested`
//! - **Commits**: submission (`seq`, `size`), confirmation, failure with applied count
//! - **Refusals**: rejected values and refused events, with ids and reasons
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show every event with its payload
//! RUST_LOG=debug cargo run
//!
//! # Include debounce timer restarts
//! RUST_LOG=trace cargo run
//! ```
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Editor started resource="StockLevels"
//! INFO Commit submitted resource="StockLevels" seq=1 size=2
//! INFO Commit confirmed resource="StockLevels" seq=1 size=2
//! ```

/// Installs the global subscriber. Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use the resource field instead
        .compact()
        .init();
}
