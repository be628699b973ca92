//! # CRM Admin Library
//!
//! This library exposes the modules of the admin back-office for integration testing.

pub mod backend;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod inventory;
pub mod lifecycle;
pub mod model;
pub mod session;
pub mod settings;

pub use error::AdminError;
