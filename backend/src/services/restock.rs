//! Restock projection service
//!
//! Projects a seven-day purchase order for a branch from the weight deltas
//! recorded by inspections. The line math and rounding discipline live in
//! the shared crate; this service aggregates the ledger into it.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    compute_restock_line, remaining_volume_ml, round_up_cents, sum_optional,
    volume_from_weight_delta, NoConsumptionNotice, ProductDemand, RestockOutcome, RestockReport,
};
use shared::ReportStatus;

/// Restock report service
#[derive(Clone)]
pub struct RestockService {
    db: PgPool,
}

/// One relevant bottle with everything the projection needs
#[derive(Debug, FromRow)]
struct RelevantBottleRow {
    product_id: Uuid,
    initial_weight_g: i32,
    current_weight_g: Option<i32>,
    crystal_weight_g: i32,
    density_factor: Decimal,
    /// Lifetime observation count, not restricted to the window
    inspection_count: i64,
    /// Earliest in-window observation weight, if any
    first_window_weight_g: Option<i32>,
}

/// Per-bottle contributions to the product aggregates. Nulls are skipped by
/// the sums, mirroring SQL aggregation over the same rows.
#[derive(Debug, Clone, Copy)]
struct BottleContribution {
    demand_ml: Option<Decimal>,
    stock_ml: Option<Decimal>,
    shortfall_ml: Option<Decimal>,
}

/// Resolve a bottle's contributions from its window history.
///
/// The comparison weight is the earliest in-window observation when the
/// bottle has more than one lifetime observation, and the registration
/// weight otherwise. A missing comparison weight means the bottle consumed
/// nothing inside the window and contributes a zero demand.
fn bottle_contribution(row: &RelevantBottleRow) -> BottleContribution {
    let start_weight_g = if row.inspection_count > 1 {
        row.first_window_weight_g
    } else {
        Some(row.initial_weight_g)
    };

    let weight_delta_g: Option<Decimal> = match start_weight_g {
        None => Some(Decimal::ZERO),
        Some(start) => row
            .current_weight_g
            .map(|current| Decimal::from(start - current)),
    };

    let demand_ml = weight_delta_g.map(|d| volume_from_weight_delta(d, row.density_factor));
    let stock_ml = row
        .current_weight_g
        .map(|current| remaining_volume_ml(current, row.crystal_weight_g, row.density_factor));
    let shortfall_ml = match (demand_ml, stock_ml) {
        (Some(d), Some(s)) => Some(d - s),
        _ => None,
    };

    BottleContribution {
        demand_ml,
        stock_ml,
        shortfall_ml,
    }
}

impl RestockService {
    /// Create a new RestockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the restock report for a branch over the last seven days.
    pub async fn restock_report(&self, branch_id: Uuid) -> AppResult<RestockOutcome> {
        let branch_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM branches WHERE id = $1",
        )
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Branch".to_string()))?;

        let today = Utc::now().date_naive();
        let end: DateTime<Utc> = today
            .and_time(NaiveTime::MIN)
            .and_utc();
        let start = end - Duration::days(7);

        // Products under report: every SKU the branch has ever held a bottle
        // of, in brand order.
        let products = sqlx::query_as::<_, (Uuid, String, i32, Decimal)>(
            r#"
            SELECT DISTINCT p.id, p.brand_name, p.capacity_ml, p.unit_price
            FROM products p
            JOIN bottles b ON b.product_id = p.id
            WHERE b.branch_id = $1
            ORDER BY p.brand_name
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        // Bottles relevant to the window, over the whole ledger: present the
        // whole time, retired inside it, or registered inside it.
        let bottles = sqlx::query_as::<_, RelevantBottleRow>(
            r#"
            SELECT b.product_id, b.initial_weight_g, b.current_weight_g,
                   p.crystal_weight_g, i.density_factor,
                   (SELECT COUNT(*) FROM inspection_items it
                     WHERE it.bottle_id = b.id) AS inspection_count,
                   (SELECT it.weight_g FROM inspection_items it
                     WHERE it.bottle_id = b.id
                       AND it.recorded_at >= $1 AND it.recorded_at <= $2
                     ORDER BY it.recorded_at
                     LIMIT 1) AS first_window_weight_g
            FROM bottles b
            JOIN products p ON p.id = b.product_id
            JOIN ingredients i ON i.id = p.ingredient_id
            WHERE (b.registered_at <= $1 AND b.retired_at IS NULL)
               OR (b.registered_at <= $1 AND b.retired_at >= $1 AND b.retired_at <= $2)
               OR (b.registered_at >= $1 AND b.retired_at <= $2)
               OR (b.registered_at >= $1 AND b.retired_at IS NULL)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let mut lines = Vec::new();
        let mut total_cost = Decimal::ZERO;

        for (product_id, brand_name, capacity_ml, unit_price) in products {
            let contributions: Vec<BottleContribution> = bottles
                .iter()
                .filter(|b| b.product_id == product_id)
                .map(bottle_contribution)
                .collect();

            let demand_ml = sum_optional(contributions.iter().map(|c| c.demand_ml))
                .ok_or_else(|| {
                    AppError::DataIntegrity(format!(
                        "product {} has no measurable consumption rows",
                        brand_name
                    ))
                })?;
            let stock_ml = sum_optional(contributions.iter().map(|c| c.stock_ml))
                .ok_or_else(|| {
                    AppError::DataIntegrity(format!(
                        "product {} has no measurable stock rows",
                        brand_name
                    ))
                })?;
            let shortfall_ml = sum_optional(contributions.iter().map(|c| c.shortfall_ml))
                .ok_or_else(|| {
                    AppError::DataIntegrity(format!(
                        "product {} has no measurable shortfall rows",
                        brand_name
                    ))
                })?;

            let demand = ProductDemand {
                stock_ml,
                demand_ml,
                shortfall_ml,
            };

            if let Some(line) =
                compute_restock_line(&brand_name, capacity_ml, unit_price, &demand)
            {
                total_cost = round_up_cents(total_cost + line.total);
                lines.push(line);
            }
        }

        if lines.is_empty() {
            return Ok(RestockOutcome::NoConsumption(
                NoConsumptionNotice::last_seven_days(),
            ));
        }

        tracing::info!(
            branch = %branch_name,
            lines = lines.len(),
            total = %total_cost,
            "restock report computed"
        );

        Ok(RestockOutcome::Report(RestockReport {
            status: ReportStatus::Success,
            branch: branch_name,
            date: today.format("%d/%m/%Y").to_string(),
            total_cost,
            data: lines,
        }))
    }
}
