//! Restock projection math and report types
//!
//! Monetary and volume aggregates round to two decimals, always away from
//! zero, at every aggregation boundary: volume sums, list price, subtotal,
//! tax-inclusive total and the running accumulated total. Reference totals
//! depend on this exact discipline.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::ReportStatus;

/// Flat IVA rate applied to restock purchases (16%).
pub fn iva_rate() -> Decimal {
    Decimal::new(16, 2)
}

/// Round to cents, away from zero.
pub fn round_up_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::AwayFromZero)
}

/// Unrounded per-product aggregates coming out of the bottle scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductDemand {
    /// Liquid still on the shelf across the product's bottles, in ml.
    pub stock_ml: Decimal,
    /// Measured consumption over the window, in ml.
    pub demand_ml: Decimal,
    /// Demand minus stock; positive means a net shortfall.
    pub shortfall_ml: Decimal,
}

/// One purchase-order line of the restock report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockLine {
    pub product: String,
    pub stock_ml: Decimal,
    pub demand_ml: Decimal,
    pub shortfall_ml: Decimal,
    pub units_to_buy: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    /// IVA on the subtotal, deliberately unrounded at this step.
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute one report line from a product's aggregated demand.
///
/// Returns `None` when the rounded shortfall is zero or negative: stock
/// covers demand and the product needs no restock.
pub fn compute_restock_line(
    brand_name: &str,
    capacity_ml: i32,
    unit_price: Decimal,
    demand: &ProductDemand,
) -> Option<RestockLine> {
    let stock_ml = round_up_cents(demand.stock_ml);
    let demand_ml = round_up_cents(demand.demand_ml);
    let shortfall_ml = round_up_cents(demand.shortfall_ml);

    if shortfall_ml <= Decimal::ZERO {
        return None;
    }

    let units_to_buy = (shortfall_ml / Decimal::from(capacity_ml))
        .ceil()
        .to_i64()
        .unwrap_or(0);
    let unit_price = round_up_cents(unit_price);
    let subtotal = round_up_cents(Decimal::from(units_to_buy) * unit_price);
    let tax = subtotal * iva_rate();
    let total = round_up_cents(subtotal + tax);

    Some(RestockLine {
        product: brand_name.to_string(),
        stock_ml,
        demand_ml,
        shortfall_ml,
        units_to_buy,
        unit_price,
        subtotal,
        tax,
        total,
    })
}

/// The full restock report for a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockReport {
    pub status: ReportStatus,
    pub branch: String,
    /// Report date, dd/mm/yyyy.
    pub date: String,
    pub total_cost: Decimal,
    pub data: Vec<RestockLine>,
}

/// Informational outcome when no product consumed anything in the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoConsumptionNotice {
    pub status: ReportStatus,
    pub message: String,
}

impl NoConsumptionNotice {
    pub fn last_seven_days() -> Self {
        Self {
            status: ReportStatus::Error,
            message: "No se consumió ningún producto en los últimos 7 días.".to_string(),
        }
    }
}

/// What a restock run hands back to its caller.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RestockOutcome {
    Report(RestockReport),
    NoConsumption(NoConsumptionNotice),
}
