//! Type-safe wrappers around [`EditorClient`](edit_framework::EditorClient).

pub mod inventory_client;

pub use inventory_client::*;
