//! Location service: branches, warehouses and tills

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Branch, Till, Warehouse};

/// Location service for the site registry
#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

impl LocationService {
    /// Create a new LocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all branches
    pub async fn list_branches(&self) -> AppResult<Vec<Branch>> {
        let rows = sqlx::query_as::<_, (Uuid, String, Option<String>, Option<String>, Option<String>)>(
            "SELECT id, name, rfc, address, city FROM branches ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, rfc, address, city)| Branch {
                id,
                name,
                rfc,
                address,
                city,
            })
            .collect())
    }

    /// List the warehouses of a branch
    pub async fn list_warehouses(&self, branch_id: Uuid) -> AppResult<Vec<Warehouse>> {
        let branch_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM branches WHERE id = $1)",
        )
        .bind(branch_id)
        .fetch_one(&self.db)
        .await?;

        if !branch_exists {
            return Err(AppError::NotFound("Branch".to_string()));
        }

        let rows = sqlx::query_as::<_, (Uuid, Uuid, String, i32)>(
            "SELECT id, branch_id, name, number FROM warehouses WHERE branch_id = $1 ORDER BY number",
        )
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, branch_id, name, number)| Warehouse {
                id,
                branch_id,
                name,
                number,
            })
            .collect())
    }

    /// List the tills of a warehouse
    pub async fn list_tills(&self, warehouse_id: Uuid) -> AppResult<Vec<Till>> {
        let warehouse_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1)",
        )
        .bind(warehouse_id)
        .fetch_one(&self.db)
        .await?;

        if !warehouse_exists {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        let rows = sqlx::query_as::<_, (Uuid, Uuid, i32, Option<String>)>(
            "SELECT id, warehouse_id, number, name FROM tills WHERE warehouse_id = $1 ORDER BY number",
        )
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, warehouse_id, number, name)| Till {
                id,
                warehouse_id,
                number,
                name,
            })
            .collect())
    }
}
