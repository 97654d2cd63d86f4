//! Business logic services
//!
//! Services own the database pool and implement the domain operations;
//! handlers stay thin and delegate here.

pub mod bottle;
pub mod catalog;
pub mod inspection;
pub mod location;
pub mod restock;
pub mod sales;
pub mod shrinkage;

pub use bottle::BottleService;
pub use catalog::CatalogService;
pub use inspection::InspectionService;
pub use location::LocationService;
pub use restock::RestockService;
pub use sales::SalesService;
pub use shrinkage::ShrinkageService;
