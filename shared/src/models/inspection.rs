//! Inspection (stock-take) models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closing state of an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Open,
    Closed,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Open => "open",
            InspectionStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(InspectionStatus::Open),
            "closed" => Some(InspectionStatus::Closed),
            _ => None,
        }
    }
}

/// A weigh-in event for one warehouse at one point in time.
///
/// At most one inspection may be open per warehouse, and a warehouse gets at
/// most one inspection per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub branch_id: Uuid,
    pub status: InspectionStatus,
    /// Business date of the inspection (one-per-day rule keys on this).
    pub created_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub opened_by: Option<Uuid>,
    pub closed_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// One bottle's weight observation within one inspection.
///
/// Created unweighed alongside its inspection; mutated exactly once when the
/// bottle crosses the scale (or is declared empty/new without weighing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionItem {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub bottle_id: Uuid,
    /// Observed gross weight in grams; null until processed.
    pub weight_g: Option<i32>,
    pub inspected: bool,
    pub recorded_at: DateTime<Utc>,
}
