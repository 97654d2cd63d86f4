//! Shared types and models for the Bottle Inventory Management Platform
//!
//! This crate contains the domain model and the pure computation core
//! (weight-to-volume conversion, previous-weight classification, restock
//! math) shared between the backend services and the test suites.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
