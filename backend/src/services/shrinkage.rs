//! Consumption reconciliation service
//!
//! Pairs the sales-implied consumption of every ingredient weighed in an
//! inspection with the consumption actually measured on the scales, over the
//! same reporting window. The per-bottle math lives in the shared crate;
//! this service feeds it from the ledger.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    bottle_consumption_ml, sum_optional, BottleState, BottleTimeline, Ingredient,
    IngredientConsumption, ReportWindow, WeightObservation,
};

/// Shrinkage report service
#[derive(Clone)]
pub struct ShrinkageService {
    db: PgPool,
}

/// Candidate bottle row for the classification pass
#[derive(Debug, FromRow)]
struct CandidateBottleRow {
    id: Uuid,
    ingredient_id: Uuid,
    state: String,
    initial_weight_g: i32,
    current_weight_g: Option<i32>,
    registered_at: DateTime<Utc>,
    retired_at: Option<DateTime<Utc>>,
}

/// The reconciliation report for one inspection
#[derive(Debug, Serialize)]
pub struct ShrinkageReport {
    pub inspection_id: Uuid,
    pub window: ReportWindow,
    pub rows: Vec<IngredientConsumption>,
}

impl ShrinkageService {
    /// Create a new ShrinkageService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the reconciliation report for an inspection.
    ///
    /// When the caller supplies no window, it defaults to the span between
    /// the previous inspection of the same warehouse and this one.
    pub async fn consumption_report(
        &self,
        inspection_id: Uuid,
        window: Option<ReportWindow>,
    ) -> AppResult<ShrinkageReport> {
        let (warehouse_id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            "SELECT warehouse_id, created_at FROM inspections WHERE id = $1",
        )
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        let window = match window {
            Some(w) => w,
            None => {
                let previous_at = sqlx::query_scalar::<_, DateTime<Utc>>(
                    r#"
                    SELECT created_at FROM inspections
                    WHERE warehouse_id = $1 AND created_at < $2
                    ORDER BY created_at DESC
                    LIMIT 1
                    "#,
                )
                .bind(warehouse_id)
                .bind(created_at)
                .fetch_optional(&self.db)
                .await?;

                ReportWindow::new(previous_at.unwrap_or(created_at), created_at)
            }
        };

        // Ingredients under report: those with at least one bottle in the
        // inspection, in code order so output is deterministic.
        let ingredients = sqlx::query_as::<_, (Uuid, String, String, Uuid, Decimal)>(
            r#"
            SELECT DISTINCT i.id, i.code, i.name, i.category_id, i.density_factor
            FROM inspection_items it
            JOIN bottles b ON b.id = it.bottle_id
            JOIN products p ON p.id = b.product_id
            JOIN ingredients i ON i.id = p.ingredient_id
            WHERE it.inspection_id = $1
            ORDER BY i.code
            "#,
        )
        .bind(inspection_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(id, code, name, category_id, density_factor)| Ingredient {
            id,
            code,
            name,
            category_id,
            density_factor,
        })
        .collect::<Vec<_>>();

        let ingredient_ids: Vec<Uuid> = ingredients.iter().map(|i| i.id).collect();

        // Every bottle of those ingredients in the warehouse is a candidate;
        // the classifier decides which of them attribute to this window.
        let candidates = sqlx::query_as::<_, CandidateBottleRow>(
            r#"
            SELECT b.id, p.ingredient_id, b.state, b.initial_weight_g,
                   b.current_weight_g, b.registered_at, b.retired_at
            FROM bottles b
            JOIN products p ON p.id = b.product_id
            WHERE b.warehouse_id = $1 AND p.ingredient_id = ANY($2)
            "#,
        )
        .bind(warehouse_id)
        .bind(&ingredient_ids)
        .fetch_all(&self.db)
        .await?;

        let bottle_ids: Vec<Uuid> = candidates.iter().map(|b| b.id).collect();

        // Full observation history per bottle, newest first, across all
        // inspections it ever appeared in. Unprocessed items count too.
        let observation_rows = sqlx::query_as::<_, (Uuid, Option<i32>, DateTime<Utc>)>(
            r#"
            SELECT bottle_id, weight_g, recorded_at
            FROM inspection_items
            WHERE bottle_id = ANY($1)
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(&bottle_ids)
        .fetch_all(&self.db)
        .await?;

        let mut observations: HashMap<Uuid, Vec<WeightObservation>> = HashMap::new();
        for (bottle_id, weight_g, recorded_at) in observation_rows {
            observations.entry(bottle_id).or_default().push(WeightObservation {
                weight_g,
                recorded_at,
            });
        }

        let in_current: HashSet<Uuid> = sqlx::query_scalar::<_, Uuid>(
            "SELECT bottle_id FROM inspection_items WHERE inspection_id = $1",
        )
        .bind(inspection_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .collect();

        // Sales-implied consumption per ingredient over the same window,
        // attributed to the warehouse through its tills. Ingredients with no
        // rows simply do not appear, which maps to a null sum.
        let sales_rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT sc.ingredient_id, SUM(sc.volume_ml)::bigint
            FROM sales_consumption sc
            JOIN tills t ON t.id = sc.till_id
            WHERE t.warehouse_id = $1 AND sc.date >= $2 AND sc.date <= $3
            GROUP BY sc.ingredient_id
            "#,
        )
        .bind(warehouse_id)
        .bind(window.start.date_naive())
        .bind(window.end.date_naive())
        .fetch_all(&self.db)
        .await?;

        let sales_by_ingredient: HashMap<Uuid, Decimal> = sales_rows
            .into_iter()
            .map(|(id, total)| (id, Decimal::from(total)))
            .collect();

        let empty_history: Vec<WeightObservation> = Vec::new();
        let mut rows = Vec::with_capacity(ingredients.len());

        for ingredient in ingredients {
            let per_bottle = candidates
                .iter()
                .filter(|b| b.ingredient_id == ingredient.id)
                .map(|b| {
                    let state = BottleState::from_str(&b.state).ok_or_else(|| {
                        AppError::DataIntegrity(format!("unknown bottle state {}", b.state))
                    })?;
                    let timeline = BottleTimeline {
                        state,
                        initial_weight_g: b.initial_weight_g,
                        current_weight_g: b.current_weight_g,
                        registered_at: b.registered_at,
                        retired_at: b.retired_at,
                        in_current_inspection: in_current.contains(&b.id),
                        observations: observations
                            .get(&b.id)
                            .unwrap_or(&empty_history)
                            .as_slice(),
                    };
                    Ok(bottle_consumption_ml(
                        &timeline,
                        &window,
                        ingredient.density_factor,
                    ))
                })
                .collect::<AppResult<Vec<Option<Decimal>>>>()?;

            let real_consumption_ml = sum_optional(per_bottle);
            let sales_consumption_ml = sales_by_ingredient.get(&ingredient.id).copied();

            rows.push(IngredientConsumption {
                ingredient,
                sales_consumption_ml,
                real_consumption_ml,
            });
        }

        tracing::debug!(
            inspection_id = %inspection_id,
            ingredients = rows.len(),
            "reconciliation report computed"
        );

        Ok(ShrinkageReport {
            inspection_id,
            window,
            rows,
        })
    }
}
