//! Sales feed handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::SalesConsumption;
use crate::services::sales::RecipeDetail;
use crate::services::SalesService;
use crate::AppState;

/// Lookback length for the raw feed listing
#[derive(Debug, Deserialize)]
pub struct ConsumptionQuery {
    pub days: Option<i64>,
}

/// GET /branches/:id/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
) -> AppResult<Json<Vec<RecipeDetail>>> {
    let service = SalesService::new(state.db.clone());
    let recipes = service.list_recipes(branch_id).await?;
    Ok(Json(recipes))
}

/// GET /warehouses/:id/sales-consumption
pub async fn list_recent_consumption(
    State(state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
    Query(query): Query<ConsumptionQuery>,
) -> AppResult<Json<Vec<SalesConsumption>>> {
    let service = SalesService::new(state.db.clone());
    let rows = service
        .list_recent_consumption(warehouse_id, query.days.unwrap_or(7))
        .await?;
    Ok(Json(rows))
}
