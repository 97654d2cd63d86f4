//! Catalog service: categories, ingredients and products

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Category, Ingredient, Product};
use shared::{validate_capacity_ml, validate_density_factor, validate_folio, validate_unit_price, validate_weight_g};

/// Catalog service for managing the distillate and product registry
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Database row for an ingredient
#[derive(Debug, FromRow)]
struct IngredientRow {
    id: Uuid,
    code: String,
    name: String,
    category_id: Uuid,
    density_factor: Decimal,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            code: row.code,
            name: row.name,
            category_id: row.category_id,
            density_factor: row.density_factor,
        }
    }
}

/// Database row for a product
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    folio: String,
    ingredient_id: Uuid,
    brand_name: String,
    capacity_ml: i32,
    crystal_weight_g: i32,
    unit_price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            folio: row.folio,
            ingredient_id: row.ingredient_id,
            brand_name: row.brand_name,
            capacity_ml: row.capacity_ml,
            crystal_weight_g: row.crystal_weight_g,
            unit_price: row.unit_price,
            created_at: row.created_at,
        }
    }
}

/// Input for registering an ingredient
#[derive(Debug, Deserialize)]
pub struct CreateIngredientInput {
    pub code: String,
    pub name: String,
    pub category_id: Uuid,
    pub density_factor: Decimal,
}

/// Input for registering a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub folio: String,
    pub ingredient_id: Uuid,
    pub brand_name: String,
    pub capacity_ml: i32,
    pub crystal_weight_g: i32,
    pub unit_price: Decimal,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all categories
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, name FROM categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    /// Register a new ingredient
    pub async fn create_ingredient(&self, input: CreateIngredientInput) -> AppResult<Ingredient> {
        if input.code.trim().is_empty() || input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: "Ingredient code and name are required".to_string(),
                message_es: "El código y el nombre del ingrediente son obligatorios".to_string(),
            });
        }

        if let Err(msg) = validate_density_factor(input.density_factor) {
            return Err(AppError::Validation {
                field: "density_factor".to_string(),
                message: msg.to_string(),
                message_es: "El factor de peso está fuera del rango permitido".to_string(),
            });
        }

        // Validate category exists
        let category_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(input.category_id)
        .fetch_one(&self.db)
        .await?;

        if !category_exists {
            return Err(AppError::NotFound("Category".to_string()));
        }

        // Ingredient codes are unique
        let code_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE code = $1)",
        )
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        if code_taken {
            return Err(AppError::DuplicateEntry("code".to_string()));
        }

        let row = sqlx::query_as::<_, IngredientRow>(
            r#"
            INSERT INTO ingredients (code, name, category_id, density_factor)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, name, category_id, density_factor
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.density_factor)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List the ingredients of one category
    pub async fn list_ingredients_by_category(
        &self,
        category_id: Uuid,
    ) -> AppResult<Vec<Ingredient>> {
        let category_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if !category_exists {
            return Err(AppError::NotFound("Category".to_string()));
        }

        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, code, name, category_id, density_factor
            FROM ingredients
            WHERE category_id = $1
            ORDER BY code
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Register a new product (bottle SKU)
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        if let Err(msg) = validate_folio(&input.folio) {
            return Err(AppError::Validation {
                field: "folio".to_string(),
                message: msg.to_string(),
                message_es: "El folio no es válido".to_string(),
            });
        }
        if let Err(msg) = validate_capacity_ml(input.capacity_ml) {
            return Err(AppError::Validation {
                field: "capacity_ml".to_string(),
                message: msg.to_string(),
                message_es: "La capacidad debe ser positiva".to_string(),
            });
        }
        if let Err(msg) = validate_weight_g(input.crystal_weight_g) {
            return Err(AppError::Validation {
                field: "crystal_weight_g".to_string(),
                message: msg.to_string(),
                message_es: "El peso del cristal debe ser positivo".to_string(),
            });
        }
        if let Err(msg) = validate_unit_price(input.unit_price) {
            return Err(AppError::Validation {
                field: "unit_price".to_string(),
                message: msg.to_string(),
                message_es: "El precio unitario debe ser positivo".to_string(),
            });
        }

        let ingredient_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE id = $1)",
        )
        .bind(input.ingredient_id)
        .fetch_one(&self.db)
        .await?;

        if !ingredient_exists {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (folio, ingredient_id, brand_name, capacity_ml, crystal_weight_g, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, folio, ingredient_id, brand_name, capacity_ml, crystal_weight_g,
                      unit_price, created_at
            "#,
        )
        .bind(&input.folio)
        .bind(input.ingredient_id)
        .bind(&input.brand_name)
        .bind(input.capacity_ml)
        .bind(input.crystal_weight_g)
        .bind(input.unit_price)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, folio, ingredient_id, brand_name, capacity_ml, crystal_weight_g,
                   unit_price, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List all products, ordered by brand name
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, folio, ingredient_id, brand_name, capacity_ml, crystal_weight_g,
                   unit_price, created_at
            FROM products
            ORDER BY brand_name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
