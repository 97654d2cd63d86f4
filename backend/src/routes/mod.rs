//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{bottle, catalog, inspection, location, report, sales};
use crate::AppState;

/// All /api/v1 routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/categories", get(catalog::list_categories))
        .route(
            "/categories/:id/ingredients",
            get(catalog::list_ingredients_by_category),
        )
        .route("/ingredients", post(catalog::create_ingredient))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route("/products/:id", get(catalog::get_product))
        // Locations
        .route("/branches", get(location::list_branches))
        .route("/branches/:id/warehouses", get(location::list_warehouses))
        .route("/warehouses/:id/tills", get(location::list_tills))
        // Sales feed
        .route("/branches/:id/recipes", get(sales::list_recipes))
        .route(
            "/warehouses/:id/sales-consumption",
            get(sales::list_recent_consumption),
        )
        // Bottle ledger
        .route("/bottles", post(bottle::register_bottle))
        .route("/bottles/folio/:folio", get(bottle::get_bottle_by_folio))
        .route("/bottles/:id/transfer", post(bottle::transfer_bottle))
        .route(
            "/bottles/:id/inspections",
            get(bottle::list_bottle_inspections),
        )
        .route("/bottles/:id/transfers", get(bottle::list_bottle_transfers))
        .route(
            "/warehouses/:id/bottles",
            get(bottle::list_bottles_by_warehouse),
        )
        // Inspections
        .route("/inspections", post(inspection::create_inspection))
        .route("/inspections/:id", get(inspection::get_inspection))
        .route("/inspections/:id/close", post(inspection::close_inspection))
        .route(
            "/warehouses/:id/inspections",
            get(inspection::list_inspections),
        )
        .route(
            "/inspection-items/:id/weight",
            post(inspection::record_weight),
        )
        .route(
            "/inspection-items/:id/unweighed",
            post(inspection::mark_bottle_unweighed),
        )
        // Reports
        .route(
            "/reports/consumption/:inspection_id",
            get(report::consumption_report),
        )
        .route("/reports/restock/:branch_id", get(report::restock_report))
}
