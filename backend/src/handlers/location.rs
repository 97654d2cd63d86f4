//! Location handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Branch, Till, Warehouse};
use crate::services::LocationService;
use crate::AppState;

/// GET /branches
pub async fn list_branches(State(state): State<AppState>) -> AppResult<Json<Vec<Branch>>> {
    let service = LocationService::new(state.db.clone());
    let branches = service.list_branches().await?;
    Ok(Json(branches))
}

/// GET /branches/:id/warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
) -> AppResult<Json<Vec<Warehouse>>> {
    let service = LocationService::new(state.db.clone());
    let warehouses = service.list_warehouses(branch_id).await?;
    Ok(Json(warehouses))
}

/// GET /warehouses/:id/tills
pub async fn list_tills(
    State(state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Vec<Till>>> {
    let service = LocationService::new(state.db.clone());
    let tills = service.list_tills(warehouse_id).await?;
    Ok(Json(tills))
}
