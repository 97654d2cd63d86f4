//! Bottle ledger handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Bottle, BottleTransfer, InspectionItem};
use crate::services::bottle::{RegisterBottleInput, TransferBottleInput};
use crate::services::BottleService;
use crate::AppState;

/// POST /bottles
pub async fn register_bottle(
    State(state): State<AppState>,
    Json(input): Json<RegisterBottleInput>,
) -> AppResult<(StatusCode, Json<Bottle>)> {
    let service = BottleService::new(state.db.clone());
    let bottle = service.register_bottle(input).await?;
    Ok((StatusCode::CREATED, Json(bottle)))
}

/// GET /bottles/folio/:folio
pub async fn get_bottle_by_folio(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> AppResult<Json<Bottle>> {
    let service = BottleService::new(state.db.clone());
    let bottle = service.get_bottle_by_folio(&folio).await?;
    Ok(Json(bottle))
}

/// POST /bottles/:id/transfer
pub async fn transfer_bottle(
    State(state): State<AppState>,
    Path(bottle_id): Path<Uuid>,
    Json(input): Json<TransferBottleInput>,
) -> AppResult<Json<Bottle>> {
    let service = BottleService::new(state.db.clone());
    let bottle = service.transfer_bottle(bottle_id, input).await?;
    Ok(Json(bottle))
}

/// GET /bottles/:id/inspections
pub async fn list_bottle_inspections(
    State(state): State<AppState>,
    Path(bottle_id): Path<Uuid>,
) -> AppResult<Json<Vec<InspectionItem>>> {
    let service = BottleService::new(state.db.clone());
    let items = service.list_bottle_inspections(bottle_id).await?;
    Ok(Json(items))
}

/// GET /bottles/:id/transfers
pub async fn list_bottle_transfers(
    State(state): State<AppState>,
    Path(bottle_id): Path<Uuid>,
) -> AppResult<Json<Vec<BottleTransfer>>> {
    let service = BottleService::new(state.db.clone());
    let transfers = service.list_bottle_transfers(bottle_id).await?;
    Ok(Json(transfers))
}

/// GET /warehouses/:id/bottles
pub async fn list_bottles_by_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Vec<Bottle>>> {
    let service = BottleService::new(state.db.clone());
    let bottles = service.list_bottles_by_warehouse(warehouse_id).await?;
    Ok(Json(bottles))
}
