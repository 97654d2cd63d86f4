//! Database models for the Bottle Inventory Management Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
