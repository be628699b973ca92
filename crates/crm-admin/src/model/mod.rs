//! Plain data carried between the backend, the editor and the pages.

pub mod filter;
pub mod inventory;
pub mod product;

pub use filter::*;
pub use inventory::*;
pub use product::*;
