//! Consumption reconciliation core
//!
//! Pure math behind the shrinkage report: converting weight deltas to
//! milliliters and resolving which historical weight a bottle should be
//! compared against for a given reporting window.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bottle::BottleState;
use super::catalog::Ingredient;

/// Closed time window a report runs over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Rolling window of the last `days` days, ending now.
    pub fn last_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - chrono::Duration::days(days),
            end,
        }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }
}

/// One historical weight reading of a bottle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightObservation {
    /// Observed gross weight in grams; null if the item was never processed.
    pub weight_g: Option<i32>,
    pub recorded_at: DateTime<Utc>,
}

/// Everything the classifier needs to know about one bottle.
#[derive(Debug, Clone)]
pub struct BottleTimeline<'a> {
    pub state: BottleState,
    pub initial_weight_g: i32,
    pub current_weight_g: Option<i32>,
    pub registered_at: DateTime<Utc>,
    pub retired_at: Option<DateTime<Utc>>,
    /// Whether the bottle has an item in the inspection under report.
    pub in_current_inspection: bool,
    /// Every weight observation ever recorded for the bottle, across all
    /// warehouses, newest first. Unprocessed (null-weight) items count.
    pub observations: &'a [WeightObservation],
}

/// How a bottle's previous weight was resolved for the window.
///
/// Exactly one case applies per bottle; they are evaluated in declaration
/// order and the first match wins, so later cases are mutually exclusive
/// with earlier ones by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviousWeightCase {
    /// In the current inspection with more than one observation on record:
    /// compare against the second-most-recent observation.
    PenultimateObservation,
    /// In the current inspection with exactly one observation on record:
    /// the only reference point is the registration weight.
    RegistrationWeight,
    /// Emptied bottle that was both registered and consumed inside the
    /// window; no inspection ever saw it with liquid.
    EmptiedAfterArrival,
    /// Emptied bottle that predates the window and was inspected before it
    /// emptied: compare against its most recent observation.
    LastObservationBeforeEmpty,
    /// Emptied bottle that predates the window but was never inspected
    /// anywhere: fall back to the registration weight.
    NeverObservedBeforeEmpty,
}

/// Resolve which classification case applies to a bottle, if any.
///
/// A bottle matching no case is not attributable to this window and simply
/// contributes nothing; that is expected and frequent (e.g. emptied and
/// retired before the window with no inspection history).
pub fn classify_bottle(
    timeline: &BottleTimeline<'_>,
    window: &ReportWindow,
) -> Option<PreviousWeightCase> {
    let n = timeline.observations.len();

    if timeline.in_current_inspection && n > 1 {
        return Some(PreviousWeightCase::PenultimateObservation);
    }
    if timeline.in_current_inspection && n == 1 {
        return Some(PreviousWeightCase::RegistrationWeight);
    }
    if timeline.state == BottleState::Empty && window.contains(timeline.registered_at) {
        return Some(PreviousWeightCase::EmptiedAfterArrival);
    }
    let retired_in_window = timeline
        .retired_at
        .map(|t| window.contains(t))
        .unwrap_or(false);
    if timeline.state == BottleState::Empty
        && retired_in_window
        && timeline.registered_at <= window.start
    {
        if n > 0 {
            return Some(PreviousWeightCase::LastObservationBeforeEmpty);
        }
        return Some(PreviousWeightCase::NeverObservedBeforeEmpty);
    }
    None
}

/// Resolve the previous weight for a bottle, in grams.
///
/// Returns `None` when no case applies or when the matched case points at an
/// observation whose weight was never recorded; either way the bottle is
/// excluded from the consumption sum.
pub fn previous_weight_g(
    timeline: &BottleTimeline<'_>,
    window: &ReportWindow,
) -> Option<i32> {
    match classify_bottle(timeline, window)? {
        PreviousWeightCase::PenultimateObservation => {
            timeline.observations.get(1).and_then(|o| o.weight_g)
        }
        PreviousWeightCase::RegistrationWeight
        | PreviousWeightCase::EmptiedAfterArrival
        | PreviousWeightCase::NeverObservedBeforeEmpty => Some(timeline.initial_weight_g),
        PreviousWeightCase::LastObservationBeforeEmpty => {
            timeline.observations.first().and_then(|o| o.weight_g)
        }
    }
}

/// Convert a weight delta (grams) to a volume (milliliters).
///
/// `2 - density_factor` is the empirical correction mapping the
/// bottle-industry density factor onto a grams-to-milliliters multiplier.
pub fn volume_from_weight_delta(weight_delta_g: Decimal, density_factor: Decimal) -> Decimal {
    weight_delta_g * (Decimal::TWO - density_factor)
}

/// Estimate the liquid currently inside a bottle, in milliliters, from its
/// gross weight and the empty-container weight.
pub fn remaining_volume_ml(
    current_weight_g: i32,
    crystal_weight_g: i32,
    density_factor: Decimal,
) -> Decimal {
    volume_from_weight_delta(
        Decimal::from(current_weight_g - crystal_weight_g),
        density_factor,
    )
}

/// Measured consumption of one bottle over the window, in milliliters.
///
/// `previous - current`, deliberately two-sided: a negative value signals a
/// refill-like anomaly and propagates into the sum as-is. `None` when the
/// bottle is excluded or its current weight is unknown.
pub fn bottle_consumption_ml(
    timeline: &BottleTimeline<'_>,
    window: &ReportWindow,
    density_factor: Decimal,
) -> Option<Decimal> {
    let previous = previous_weight_g(timeline, window)?;
    let current = timeline.current_weight_g?;
    Some(volume_from_weight_delta(
        Decimal::from(previous - current),
        density_factor,
    ))
}

/// SQL-style nullable sum: null entries are skipped, and a sum over zero
/// non-null entries is `None` rather than zero.
pub fn sum_optional<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    values
        .into_iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(Decimal::ZERO) + v))
}

/// One row of the reconciliation report: an ingredient paired with its
/// sales-implied and measured consumption over the same window.
///
/// The sums keep SQL semantics: `None` means no contributing rows existed,
/// which the report surfaces differently from an exact zero.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientConsumption {
    pub ingredient: Ingredient,
    pub sales_consumption_ml: Option<Decimal>,
    pub real_consumption_ml: Option<Decimal>,
}
