//! Inspection lifecycle handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Inspection, InspectionItem};
use crate::services::inspection::{
    CloseInspectionInput, CreateInspectionInput, InspectionDetail, MarkUnweighedInput,
    RecordWeightInput,
};
use crate::services::InspectionService;
use crate::AppState;

/// POST /inspections
pub async fn create_inspection(
    State(state): State<AppState>,
    Json(input): Json<CreateInspectionInput>,
) -> AppResult<(StatusCode, Json<InspectionDetail>)> {
    let service = InspectionService::new(state.db.clone());
    let detail = service.create_inspection(input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /inspections/:id
pub async fn get_inspection(
    State(state): State<AppState>,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<InspectionDetail>> {
    let service = InspectionService::new(state.db.clone());
    let detail = service.get_inspection(inspection_id).await?;
    Ok(Json(detail))
}

/// GET /warehouses/:id/inspections
pub async fn list_inspections(
    State(state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Vec<Inspection>>> {
    let service = InspectionService::new(state.db.clone());
    let inspections = service.list_inspections(warehouse_id).await?;
    Ok(Json(inspections))
}

/// POST /inspection-items/:id/weight
pub async fn record_weight(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<RecordWeightInput>,
) -> AppResult<Json<InspectionItem>> {
    let service = InspectionService::new(state.db.clone());
    let item = service.record_weight(item_id, input).await?;
    Ok(Json(item))
}

/// POST /inspection-items/:id/unweighed
pub async fn mark_bottle_unweighed(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<MarkUnweighedInput>,
) -> AppResult<Json<InspectionItem>> {
    let service = InspectionService::new(state.db.clone());
    let item = service.mark_bottle_unweighed(item_id, input).await?;
    Ok(Json(item))
}

/// POST /inspections/:id/close
pub async fn close_inspection(
    State(state): State<AppState>,
    Path(inspection_id): Path<Uuid>,
    Json(input): Json<CloseInspectionInput>,
) -> AppResult<Json<Inspection>> {
    let service = InspectionService::new(state.db.clone());
    let inspection = service.close_inspection(inspection_id, input).await?;
    Ok(Json(inspection))
}
