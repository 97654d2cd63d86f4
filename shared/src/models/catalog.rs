//! Catalog models: categories, ingredients and products

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distillate category (WHISKY, TEQUILA, VODKA...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// A distillate. One ingredient may appear in several recipes and products.
///
/// `density_factor` is the empirical weight-to-volume constant used by both
/// report engines: grams of weight loss convert to milliliters through the
/// multiplier `2 - density_factor`. Values cluster around 0.90-1.10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub category_id: Uuid,
    pub density_factor: Decimal,
}

/// A bottle SKU: a unique combination of ingredient, container and price.
///
/// Only the label fields the engines and bottle registration need are kept;
/// the rest of the government-label payload lives with the (external)
/// label-scraping integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub folio: String,
    pub ingredient_id: Uuid,
    pub brand_name: String,
    /// Nominal bottle capacity in milliliters.
    pub capacity_ml: i32,
    /// Weight of the empty container in grams.
    pub crystal_weight_g: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Expected gross weight of a factory-sealed bottle, in grams.
///
/// The liquid weight rounds half-to-even. `None` on overflow.
pub fn sealed_weight_g(
    capacity_ml: i32,
    crystal_weight_g: i32,
    density_factor: Decimal,
) -> Option<i32> {
    use rust_decimal::prelude::ToPrimitive;

    let liquid = (Decimal::from(capacity_ml) * density_factor).round().to_i32()?;
    crystal_weight_g.checked_add(liquid)
}
