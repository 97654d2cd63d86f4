//! Inspection (stock-take) lifecycle service
//!
//! Opening an inspection snapshots which bottles need weighing; weigh-ins
//! mutate the item and its bottle in one transaction so the ledger and the
//! observation history never disagree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{BottleState, Inspection, InspectionItem, InspectionStatus};
use shared::validate_weight_g;

/// Inspection service for the weigh-in lifecycle
#[derive(Clone)]
pub struct InspectionService {
    db: PgPool,
}

/// Database row for an inspection
#[derive(Debug, FromRow)]
struct InspectionRow {
    id: Uuid,
    warehouse_id: Uuid,
    branch_id: Uuid,
    status: String,
    created_date: NaiveDate,
    created_at: DateTime<Utc>,
    opened_by: Option<Uuid>,
    closed_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
}

impl InspectionRow {
    fn into_inspection(self) -> AppResult<Inspection> {
        let status = InspectionStatus::from_str(&self.status).ok_or_else(|| {
            AppError::DataIntegrity(format!("unknown inspection status {}", self.status))
        })?;
        Ok(Inspection {
            id: self.id,
            warehouse_id: self.warehouse_id,
            branch_id: self.branch_id,
            status,
            created_date: self.created_date,
            created_at: self.created_at,
            opened_by: self.opened_by,
            closed_by: self.closed_by,
            updated_at: self.updated_at,
        })
    }
}

const INSPECTION_COLUMNS: &str = "id, warehouse_id, branch_id, status, created_date, \
     created_at, opened_by, closed_by, updated_at";

/// Database row for an inspection item
#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    inspection_id: Uuid,
    bottle_id: Uuid,
    weight_g: Option<i32>,
    inspected: bool,
    recorded_at: DateTime<Utc>,
}

impl From<ItemRow> for InspectionItem {
    fn from(row: ItemRow) -> Self {
        InspectionItem {
            id: row.id,
            inspection_id: row.inspection_id,
            bottle_id: row.bottle_id,
            weight_g: row.weight_g,
            inspected: row.inspected,
            recorded_at: row.recorded_at,
        }
    }
}

/// Input for opening an inspection
#[derive(Debug, Deserialize)]
pub struct CreateInspectionInput {
    pub warehouse_id: Uuid,
    pub opened_by: Option<Uuid>,
}

/// Input for recording a weigh-in
#[derive(Debug, Deserialize)]
pub struct RecordWeightInput {
    /// Gross weight on the scale, in grams
    pub weight_g: i32,
    /// Bottle state after the reading (with_liquid or empty)
    pub state: BottleState,
}

/// Input for processing a bottle without weighing it
#[derive(Debug, Deserialize)]
pub struct MarkUnweighedInput {
    /// Declared state (empty or new); the weight is derived from the product
    pub state: BottleState,
}

/// Input for closing an inspection
#[derive(Debug, Deserialize)]
pub struct CloseInspectionInput {
    pub closed_by: Option<Uuid>,
}

/// An inspection together with its items
#[derive(Debug, Serialize)]
pub struct InspectionDetail {
    pub inspection: Inspection,
    pub items: Vec<InspectionItem>,
}

impl InspectionService {
    /// Create a new InspectionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open an inspection for a warehouse and generate its item set.
    ///
    /// Refused when the warehouse already has an open inspection, when one
    /// was already created today, or when no sales consumption was recorded
    /// since the previous inspection (nothing to weigh).
    pub async fn create_inspection(&self, input: CreateInspectionInput) -> AppResult<InspectionDetail> {
        let branch_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT branch_id FROM warehouses WHERE id = $1",
        )
        .bind(input.warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        let previous = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            SELECT {INSPECTION_COLUMNS}
            FROM inspections
            WHERE warehouse_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        ))
        .bind(input.warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .map(InspectionRow::into_inspection)
        .transpose()?;

        let since: Option<NaiveDate> = match &previous {
            Some(prev) => {
                if prev.status == InspectionStatus::Open {
                    return Err(AppError::Conflict {
                        resource: "inspection".to_string(),
                        message: "The warehouse already has an open inspection".to_string(),
                        message_es: "El almacén ya tiene una inspección abierta".to_string(),
                    });
                }
                if prev.created_date == Utc::now().date_naive() {
                    return Err(AppError::Conflict {
                        resource: "inspection".to_string(),
                        message: "An inspection was already created today for this warehouse"
                            .to_string(),
                        message_es: "Ya se creó una inspección hoy para este almacén".to_string(),
                    });
                }
                Some(prev.created_date)
            }
            None => None,
        };

        // Only ingredients the POS says were poured since the last inspection
        // put their bottles on the scale.
        let consumed_ingredients = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT sc.ingredient_id
            FROM sales_consumption sc
            JOIN tills t ON t.id = sc.till_id
            WHERE t.warehouse_id = $1
              AND ($2::date IS NULL OR sc.date >= $2)
            "#,
        )
        .bind(input.warehouse_id)
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        if consumed_ingredients.is_empty() {
            return Err(AppError::NoConsumption {
                message: "No sales consumption recorded since the last inspection".to_string(),
                message_es: "No se ha registrado consumo de ventas desde la última inspección"
                    .to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let inspection = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            INSERT INTO inspections (warehouse_id, branch_id, opened_by)
            VALUES ($1, $2, $3)
            RETURNING {INSPECTION_COLUMNS}
            "#,
        ))
        .bind(input.warehouse_id)
        .bind(branch_id)
        .bind(input.opened_by)
        .fetch_one(&mut *tx)
        .await?
        .into_inspection()?;

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO inspection_items (inspection_id, bottle_id)
            SELECT $1, b.id
            FROM bottles b
            JOIN products p ON p.id = b.product_id
            WHERE b.warehouse_id = $2
              AND b.state NOT IN ('empty', 'lost')
              AND p.ingredient_id = ANY($3)
            RETURNING id, inspection_id, bottle_id, weight_g, inspected, recorded_at
            "#,
        )
        .bind(inspection.id)
        .bind(input.warehouse_id)
        .bind(&consumed_ingredients)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            inspection_id = %inspection.id,
            items = items.len(),
            "inspection opened"
        );

        Ok(InspectionDetail {
            inspection,
            items: items.into_iter().map(InspectionItem::from).collect(),
        })
    }

    /// Record a weigh-in for one inspection item.
    ///
    /// Updates the item and its bottle atomically: the item gets the weight
    /// and `inspected = true`, the bottle gets the weight as its current
    /// weight plus the resulting state, and `retired_at` is stamped when the
    /// bottle empties.
    pub async fn record_weight(
        &self,
        item_id: Uuid,
        input: RecordWeightInput,
    ) -> AppResult<InspectionItem> {
        if let Err(msg) = validate_weight_g(input.weight_g) {
            return Err(AppError::Validation {
                field: "weight_g".to_string(),
                message: msg.to_string(),
                message_es: "El peso debe ser positivo".to_string(),
            });
        }
        if !matches!(input.state, BottleState::WithLiquid | BottleState::Empty) {
            return Err(AppError::Validation {
                field: "state".to_string(),
                message: "A weigh-in must result in with_liquid or empty".to_string(),
                message_es: "El pesaje debe resultar en con líquido o vacía".to_string(),
            });
        }

        self.apply_item_mutation(item_id, input.weight_g, input.state)
            .await
    }

    /// Process a bottle without putting it on the scale.
    ///
    /// `empty` assigns the product's crystal weight; `new` assigns the
    /// expected factory-sealed weight (crystal + capacity scaled by the
    /// ingredient's density factor).
    pub async fn mark_bottle_unweighed(
        &self,
        item_id: Uuid,
        input: MarkUnweighedInput,
    ) -> AppResult<InspectionItem> {
        if !matches!(input.state, BottleState::Empty | BottleState::New) {
            return Err(AppError::Validation {
                field: "state".to_string(),
                message: "Only empty or new may be declared without weighing".to_string(),
                message_es: "Solo vacía o nueva pueden declararse sin pesaje".to_string(),
            });
        }

        let (crystal_weight_g, capacity_ml, density_factor) =
            sqlx::query_as::<_, (i32, i32, Decimal)>(
                r#"
                SELECT p.crystal_weight_g, p.capacity_ml, i.density_factor
                FROM inspection_items it
                JOIN bottles b ON b.id = it.bottle_id
                JOIN products p ON p.id = b.product_id
                JOIN ingredients i ON i.id = p.ingredient_id
                WHERE it.id = $1
                "#,
            )
            .bind(item_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Inspection item".to_string()))?;

        let weight_g = match input.state {
            BottleState::Empty => crystal_weight_g,
            _ => shared::sealed_weight_g(capacity_ml, crystal_weight_g, density_factor)
                .ok_or_else(|| {
                    AppError::DataIntegrity("sealed bottle weight overflows".to_string())
                })?,
        };

        self.apply_item_mutation(item_id, weight_g, input.state).await
    }

    /// Shared item + bottle mutation behind record_weight and
    /// mark_bottle_unweighed.
    async fn apply_item_mutation(
        &self,
        item_id: Uuid,
        weight_g: i32,
        state: BottleState,
    ) -> AppResult<InspectionItem> {
        let row = sqlx::query_as::<_, (Uuid, bool, String)>(
            r#"
            SELECT it.bottle_id, it.inspected, ins.status
            FROM inspection_items it
            JOIN inspections ins ON ins.id = it.inspection_id
            WHERE it.id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?;

        let (bottle_id, already_inspected, inspection_status) =
            row.ok_or_else(|| AppError::NotFound("Inspection item".to_string()))?;

        if InspectionStatus::from_str(&inspection_status) != Some(InspectionStatus::Open) {
            return Err(AppError::InvalidStateTransition(
                "The inspection is already closed".to_string(),
            ));
        }
        if already_inspected {
            return Err(AppError::Conflict {
                resource: "inspection_item".to_string(),
                message: "This bottle was already processed in this inspection".to_string(),
                message_es: "Esta botella ya fue procesada en esta inspección".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let item = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE inspection_items
            SET weight_g = $1, inspected = TRUE, recorded_at = NOW()
            WHERE id = $2
            RETURNING id, inspection_id, bottle_id, weight_g, inspected, recorded_at
            "#,
        )
        .bind(weight_g)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE bottles
            SET current_weight_g = $1,
                state = $2,
                retired_at = CASE WHEN $2 = 'empty' THEN NOW() ELSE retired_at END
            WHERE id = $3
            "#,
        )
        .bind(weight_g)
        .bind(state.as_str())
        .bind(bottle_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(item.into())
    }

    /// Close an open inspection. Unprocessed items stay null-weighted; the
    /// reconciliation engine handles them.
    pub async fn close_inspection(
        &self,
        inspection_id: Uuid,
        input: CloseInspectionInput,
    ) -> AppResult<Inspection> {
        let inspection = self.get_inspection(inspection_id).await?.inspection;

        if inspection.status == InspectionStatus::Closed {
            return Err(AppError::InvalidStateTransition(
                "The inspection is already closed".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            UPDATE inspections
            SET status = 'closed', closed_by = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {INSPECTION_COLUMNS}
            "#,
        ))
        .bind(input.closed_by)
        .bind(inspection_id)
        .fetch_one(&self.db)
        .await?;

        row.into_inspection()
    }

    /// Get an inspection with its items
    pub async fn get_inspection(&self, inspection_id: Uuid) -> AppResult<InspectionDetail> {
        let inspection = sqlx::query_as::<_, InspectionRow>(&format!(
            "SELECT {INSPECTION_COLUMNS} FROM inspections WHERE id = $1",
        ))
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inspection".to_string()))?
        .into_inspection()?;

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, inspection_id, bottle_id, weight_g, inspected, recorded_at
            FROM inspection_items
            WHERE inspection_id = $1
            ORDER BY recorded_at
            "#,
        )
        .bind(inspection_id)
        .fetch_all(&self.db)
        .await?;

        Ok(InspectionDetail {
            inspection,
            items: items.into_iter().map(InspectionItem::from).collect(),
        })
    }

    /// List a warehouse's inspections, newest first
    pub async fn list_inspections(&self, warehouse_id: Uuid) -> AppResult<Vec<Inspection>> {
        let rows = sqlx::query_as::<_, InspectionRow>(&format!(
            r#"
            SELECT {INSPECTION_COLUMNS}
            FROM inspections
            WHERE warehouse_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(InspectionRow::into_inspection).collect()
    }
}
