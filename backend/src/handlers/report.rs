//! Report handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{ReportWindow, RestockOutcome};
use crate::services::shrinkage::ShrinkageReport;
use crate::services::{RestockService, ShrinkageService};
use crate::AppState;

/// Optional window override for the consumption report
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// GET /reports/consumption/:inspection_id
pub async fn consumption_report(
    State(state): State<AppState>,
    Path(inspection_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<ShrinkageReport>> {
    let window = match (query.start, query.end) {
        (Some(start), Some(end)) => Some(ReportWindow::new(start, end)),
        _ => None,
    };

    let service = ShrinkageService::new(state.db.clone());
    let report = service.consumption_report(inspection_id, window).await?;
    Ok(Json(report))
}

/// GET /reports/restock/:branch_id
pub async fn restock_report(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
) -> AppResult<Json<RestockOutcome>> {
    let service = RestockService::new(state.db.clone());
    let outcome = service.restock_report(branch_id).await?;
    Ok(Json(outcome))
}
