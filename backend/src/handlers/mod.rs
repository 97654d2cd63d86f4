//! HTTP request handlers
//!
//! Thin delegation into the services; all domain decisions live there.

pub mod bottle;
pub mod catalog;
pub mod inspection;
pub mod location;
pub mod report;
pub mod sales;
