//! Sales-side read service
//!
//! The sales feed is produced by an external POS ingestion subsystem; this
//! service only exposes what the reports consume, for auditing a report
//! against its raw feed.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Recipe, RecipeIngredient, ReportWindow, SalesConsumption};

/// Sales feed read service
#[derive(Clone)]
pub struct SalesService {
    db: PgPool,
}

/// Database row for a sales consumption entry
#[derive(Debug, FromRow)]
struct ConsumptionRow {
    id: Uuid,
    ingredient_id: Uuid,
    recipe_id: Uuid,
    sale_id: Uuid,
    till_id: Uuid,
    date: NaiveDate,
    volume_ml: i32,
}

impl From<ConsumptionRow> for SalesConsumption {
    fn from(row: ConsumptionRow) -> Self {
        SalesConsumption {
            id: row.id,
            ingredient_id: row.ingredient_id,
            recipe_id: row.recipe_id,
            sale_id: row.sale_id,
            till_id: row.till_id,
            date: row.date,
            volume_ml: row.volume_ml,
        }
    }
}

/// A recipe with its pour lines
#[derive(Debug, serde::Serialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
}

impl SalesService {
    /// Create a new SalesService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List the recipes of a branch with their pour lines
    pub async fn list_recipes(&self, branch_id: Uuid) -> AppResult<Vec<RecipeDetail>> {
        let branch_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM branches WHERE id = $1)",
        )
        .bind(branch_id)
        .fetch_one(&self.db)
        .await?;

        if !branch_exists {
            return Err(AppError::NotFound("Branch".to_string()));
        }

        let recipes = sqlx::query_as::<_, (Uuid, String, String, Uuid)>(
            "SELECT id, pos_code, name, branch_id FROM recipes WHERE branch_id = $1 ORDER BY name",
        )
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        let recipe_ids: Vec<Uuid> = recipes.iter().map(|(id, ..)| *id).collect();

        let lines = sqlx::query_as::<_, (Uuid, Uuid, i32)>(
            r#"
            SELECT recipe_id, ingredient_id, volume_ml
            FROM recipe_ingredients
            WHERE recipe_id = ANY($1)
            "#,
        )
        .bind(&recipe_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(recipes
            .into_iter()
            .map(|(id, pos_code, name, branch_id)| RecipeDetail {
                ingredients: lines
                    .iter()
                    .filter(|(recipe_id, ..)| *recipe_id == id)
                    .map(|&(recipe_id, ingredient_id, volume_ml)| RecipeIngredient {
                        recipe_id,
                        ingredient_id,
                        volume_ml,
                    })
                    .collect(),
                recipe: Recipe {
                    id,
                    pos_code,
                    name,
                    branch_id,
                },
            })
            .collect())
    }

    /// Raw consumption feed of a warehouse over the last `days` days,
    /// newest first.
    pub async fn list_recent_consumption(
        &self,
        warehouse_id: Uuid,
        days: i64,
    ) -> AppResult<Vec<SalesConsumption>> {
        let warehouse_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1)",
        )
        .bind(warehouse_id)
        .fetch_one(&self.db)
        .await?;

        if !warehouse_exists {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        let window = ReportWindow::last_days(days);

        let rows = sqlx::query_as::<_, ConsumptionRow>(
            r#"
            SELECT sc.id, sc.ingredient_id, sc.recipe_id, sc.sale_id, sc.till_id,
                   sc.date, sc.volume_ml
            FROM sales_consumption sc
            JOIN tills t ON t.id = sc.till_id
            WHERE t.warehouse_id = $1 AND sc.date >= $2
            ORDER BY sc.date DESC
            "#,
        )
        .bind(warehouse_id)
        .bind(window.start.date_naive())
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SalesConsumption::from).collect())
    }
}
