//! Catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Category, Ingredient, Product};
use crate::services::catalog::{CreateIngredientInput, CreateProductInput};
use crate::services::CatalogService;
use crate::AppState;

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CatalogService::new(state.db.clone());
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// GET /categories/:id/ingredients
pub async fn list_ingredients_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let service = CatalogService::new(state.db.clone());
    let ingredients = service.list_ingredients_by_category(category_id).await?;
    Ok(Json(ingredients))
}

/// POST /ingredients
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(input): Json<CreateIngredientInput>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    let service = CatalogService::new(state.db.clone());
    let ingredient = service.create_ingredient(input).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = CatalogService::new(state.db.clone());
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = CatalogService::new(state.db.clone());
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.db.clone());
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}
