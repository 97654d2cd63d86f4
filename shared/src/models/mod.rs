//! Domain models for the Bottle Inventory Management Platform

pub mod bottle;
pub mod catalog;
pub mod inspection;
pub mod location;
pub mod reconciliation;
pub mod restock;
pub mod sales;

pub use bottle::*;
pub use catalog::*;
pub use inspection::*;
pub use location::*;
pub use reconciliation::*;
pub use restock::*;
pub use sales::*;
