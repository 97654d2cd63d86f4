//! Sales-side models: recipes and the materialized consumption feed
//!
//! Sales ingestion (per-POS report parsing) is an external subsystem; the
//! engines only read `SalesConsumption` rows it produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A menu item (trago, coctel or straight bottle) sold through the POS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub pos_code: String,
    pub name: String,
    pub branch_id: Uuid,
}

/// Ingredient line of a recipe: the volume one serving pours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub volume_ml: i32,
}

/// Sales-implied consumption of one ingredient caused by one recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesConsumption {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub recipe_id: Uuid,
    pub sale_id: Uuid,
    pub till_id: Uuid,
    pub date: NaiveDate,
    pub volume_ml: i32,
}
