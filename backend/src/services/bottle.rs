//! Bottle ledger service: registration, lookup and warehouse transfers

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Bottle, BottleState, BottleTransfer, InspectionItem};
use shared::{validate_folio, validate_weight_g};

/// Bottle service for the physical inventory ledger
#[derive(Clone)]
pub struct BottleService {
    db: PgPool,
}

/// Database row for a bottle
#[derive(Debug, FromRow)]
struct BottleRow {
    id: Uuid,
    folio: String,
    product_id: Uuid,
    warehouse_id: Uuid,
    branch_id: Uuid,
    state: String,
    initial_weight_g: i32,
    current_weight_g: Option<i32>,
    registered_at: DateTime<Utc>,
    retired_at: Option<DateTime<Utc>>,
}

impl BottleRow {
    fn into_bottle(self) -> AppResult<Bottle> {
        let state = BottleState::from_str(&self.state)
            .ok_or_else(|| AppError::DataIntegrity(format!("unknown bottle state {}", self.state)))?;
        Ok(Bottle {
            id: self.id,
            folio: self.folio,
            product_id: self.product_id,
            warehouse_id: self.warehouse_id,
            branch_id: self.branch_id,
            state,
            initial_weight_g: self.initial_weight_g,
            current_weight_g: self.current_weight_g,
            registered_at: self.registered_at,
            retired_at: self.retired_at,
        })
    }
}

const BOTTLE_COLUMNS: &str = "id, folio, product_id, warehouse_id, branch_id, state, \
     initial_weight_g, current_weight_g, registered_at, retired_at";

/// Input for registering a bottle
#[derive(Debug, Deserialize)]
pub struct RegisterBottleInput {
    pub folio: String,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    /// Gross weight on the scale at registration, in grams
    pub initial_weight_g: i32,
}

/// Input for transferring a bottle to another warehouse
#[derive(Debug, Deserialize)]
pub struct TransferBottleInput {
    pub to_warehouse_id: Uuid,
    pub user_id: Option<Uuid>,
}

impl BottleService {
    /// Create a new BottleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a bottle into a warehouse
    pub async fn register_bottle(&self, input: RegisterBottleInput) -> AppResult<Bottle> {
        if let Err(msg) = validate_folio(&input.folio) {
            return Err(AppError::Validation {
                field: "folio".to_string(),
                message: msg.to_string(),
                message_es: "El folio no es válido".to_string(),
            });
        }
        if let Err(msg) = validate_weight_g(input.initial_weight_g) {
            return Err(AppError::Validation {
                field: "initial_weight_g".to_string(),
                message: msg.to_string(),
                message_es: "El peso inicial debe ser positivo".to_string(),
            });
        }

        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        // Branch is derived from the destination warehouse
        let branch_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT branch_id FROM warehouses WHERE id = $1",
        )
        .bind(input.warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        // Each government label folio tracks exactly one physical bottle
        let folio_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bottles WHERE folio = $1)",
        )
        .bind(&input.folio)
        .fetch_one(&self.db)
        .await?;

        if folio_taken {
            return Err(AppError::DuplicateEntry("folio".to_string()));
        }

        let row = sqlx::query_as::<_, BottleRow>(&format!(
            r#"
            INSERT INTO bottles (folio, product_id, warehouse_id, branch_id, state,
                                 initial_weight_g, current_weight_g)
            VALUES ($1, $2, $3, $4, 'new', $5, $5)
            RETURNING {BOTTLE_COLUMNS}
            "#,
        ))
        .bind(&input.folio)
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(branch_id)
        .bind(input.initial_weight_g)
        .fetch_one(&self.db)
        .await?;

        row.into_bottle()
    }

    /// Look up a bottle by its folio
    pub async fn get_bottle_by_folio(&self, folio: &str) -> AppResult<Bottle> {
        let row = sqlx::query_as::<_, BottleRow>(&format!(
            "SELECT {BOTTLE_COLUMNS} FROM bottles WHERE folio = $1",
        ))
        .bind(folio)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bottle".to_string()))?;

        row.into_bottle()
    }

    /// Look up a bottle by id
    pub async fn get_bottle(&self, bottle_id: Uuid) -> AppResult<Bottle> {
        let row = sqlx::query_as::<_, BottleRow>(&format!(
            "SELECT {BOTTLE_COLUMNS} FROM bottles WHERE id = $1",
        ))
        .bind(bottle_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bottle".to_string()))?;

        row.into_bottle()
    }

    /// List the bottles currently assigned to a warehouse
    pub async fn list_bottles_by_warehouse(&self, warehouse_id: Uuid) -> AppResult<Vec<Bottle>> {
        let rows = sqlx::query_as::<_, BottleRow>(&format!(
            "SELECT {BOTTLE_COLUMNS} FROM bottles WHERE warehouse_id = $1 ORDER BY registered_at",
        ))
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(BottleRow::into_bottle).collect()
    }

    /// Move a bottle to another warehouse, leaving an audit record.
    ///
    /// Guards run in a fixed order so callers get stable error codes:
    /// the bottle must exist, must not be empty, must not be lost, and must
    /// not already sit in the destination warehouse.
    pub async fn transfer_bottle(
        &self,
        bottle_id: Uuid,
        input: TransferBottleInput,
    ) -> AppResult<Bottle> {
        let bottle = self.get_bottle(bottle_id).await?;

        if bottle.state == BottleState::Empty {
            return Err(AppError::InvalidStateTransition(
                "An empty bottle cannot be transferred".to_string(),
            ));
        }
        if bottle.state == BottleState::Lost {
            return Err(AppError::InvalidStateTransition(
                "A lost bottle cannot be transferred".to_string(),
            ));
        }
        if bottle.warehouse_id == input.to_warehouse_id {
            return Err(AppError::Conflict {
                resource: "warehouse".to_string(),
                message: "The bottle is already in the destination warehouse".to_string(),
                message_es: "La botella ya se encuentra en el almacén destino".to_string(),
            });
        }

        let to_branch_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT branch_id FROM warehouses WHERE id = $1",
        )
        .bind(input.to_warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, BottleRow>(&format!(
            r#"
            UPDATE bottles
            SET warehouse_id = $1, branch_id = $2
            WHERE id = $3
            RETURNING {BOTTLE_COLUMNS}
            "#,
        ))
        .bind(input.to_warehouse_id)
        .bind(to_branch_id)
        .bind(bottle_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO bottle_transfers
                (bottle_id, from_warehouse_id, to_warehouse_id, from_branch_id, to_branch_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(bottle_id)
        .bind(bottle.warehouse_id)
        .bind(input.to_warehouse_id)
        .bind(bottle.branch_id)
        .bind(to_branch_id)
        .bind(input.user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        row.into_bottle()
    }

    /// Transfer audit trail of a bottle, newest first
    pub async fn list_bottle_transfers(&self, bottle_id: Uuid) -> AppResult<Vec<BottleTransfer>> {
        let bottle_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bottles WHERE id = $1)",
        )
        .bind(bottle_id)
        .fetch_one(&self.db)
        .await?;

        if !bottle_exists {
            return Err(AppError::NotFound("Bottle".to_string()));
        }

        let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid, Uuid, Uuid, Uuid, Option<Uuid>, DateTime<Utc>)>(
            r#"
            SELECT id, bottle_id, from_warehouse_id, to_warehouse_id,
                   from_branch_id, to_branch_id, user_id, created_at
            FROM bottle_transfers
            WHERE bottle_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(bottle_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    id,
                    bottle_id,
                    from_warehouse_id,
                    to_warehouse_id,
                    from_branch_id,
                    to_branch_id,
                    user_id,
                    created_at,
                )| BottleTransfer {
                    id,
                    bottle_id,
                    from_warehouse_id,
                    to_warehouse_id,
                    from_branch_id,
                    to_branch_id,
                    user_id,
                    created_at,
                },
            )
            .collect())
    }

    /// Full observation history of a bottle across all inspections,
    /// newest first. Unprocessed items are included with a null weight.
    pub async fn list_bottle_inspections(&self, bottle_id: Uuid) -> AppResult<Vec<InspectionItem>> {
        let bottle_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bottles WHERE id = $1)",
        )
        .bind(bottle_id)
        .fetch_one(&self.db)
        .await?;

        if !bottle_exists {
            return Err(AppError::NotFound("Bottle".to_string()));
        }

        let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid, Option<i32>, bool, DateTime<Utc>)>(
            r#"
            SELECT id, inspection_id, bottle_id, weight_g, inspected, recorded_at
            FROM inspection_items
            WHERE bottle_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(bottle_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, inspection_id, bottle_id, weight_g, inspected, recorded_at)| InspectionItem {
                    id,
                    inspection_id,
                    bottle_id,
                    weight_g,
                    inspected,
                    recorded_at,
                },
            )
            .collect())
    }
}
