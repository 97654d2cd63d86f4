//! Bottle ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a physical bottle.
///
/// `Empty` and `Lost` are terminal: the bottle no longer participates in
/// active inspections and only contributes historical weights to reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleState {
    New,
    WithLiquid,
    Empty,
    Lost,
}

impl BottleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BottleState::New => "new",
            BottleState::WithLiquid => "with_liquid",
            BottleState::Empty => "empty",
            BottleState::Lost => "lost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(BottleState::New),
            "with_liquid" => Some(BottleState::WithLiquid),
            "empty" => Some(BottleState::Empty),
            "lost" => Some(BottleState::Lost),
            _ => None,
        }
    }

    /// Terminal states never rejoin the active inspection set.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BottleState::Empty | BottleState::Lost)
    }
}

/// A physical unit of inventory, identified by its government label folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bottle {
    pub id: Uuid,
    pub folio: String,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub branch_id: Uuid,
    pub state: BottleState,
    /// Gross weight at registration, in grams.
    pub initial_weight_g: i32,
    /// Latest known gross weight, in grams. Null until first weighed if the
    /// registration scale reading was not captured.
    pub current_weight_g: Option<i32>,
    pub registered_at: DateTime<Utc>,
    /// Set once, when the bottle empties or is declared lost.
    pub retired_at: Option<DateTime<Utc>>,
}

/// Audit record of a bottle moving between warehouses (traspaso).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleTransfer {
    pub id: Uuid,
    pub bottle_id: Uuid,
    pub from_warehouse_id: Uuid,
    pub to_warehouse_id: Uuid,
    pub from_branch_id: Uuid,
    pub to_branch_id: Uuid,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
