//! FIFO allocation planning
//!
//! Packing a recipe draws weight from the oldest received batches first.
//! Sales drain finished-good lots oldest-packed first. Both planners here are
//! pure: they decide *what* to take, and the caller applies the plan to its
//! stored records.
//!
//! Unit shares follow a fixed yield ratio (`units / weight`) rounded half-up
//! per batch, except for the final draw, which receives exactly the units
//! still unallocated ([`absorb_remainder`]). Rounding each draw independently
//! would let the lot quantities drift away from the requested unit count.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FinishedGoodLot, ProductKey};

/// Slack allowed between requested weight and available weight (kg)
pub const WEIGHT_TOLERANCE_KG: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// A draw leaving less than this still needed completes the request (kg)
pub const COMPLETION_EPSILON_KG: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Weight a batch can still contribute to packing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAvailability {
    pub batch_id: String,
    pub date_received: DateTime<Utc>,
    pub remaining_weight_kg: Decimal,
}

/// Weight and units taken from one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDraw {
    pub batch_id: String,
    pub weight_kg: Decimal,
    /// Zero when the share rounds away; the weight is still consumed
    pub units: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPlan {
    pub draws: Vec<BatchDraw>,
}

impl AllocationPlan {
    pub fn total_units(&self) -> i64 {
        self.draws.iter().map(|d| d.units).sum()
    }

    pub fn total_weight(&self) -> Decimal {
        self.draws.iter().map(|d| d.weight_kg).sum()
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AllocationError {
    #[error("Weight to pack must be positive")]
    InvalidWeight,

    #[error("Unit count must be positive")]
    InvalidUnits,

    #[error("No batches available for packing")]
    NoCandidates,

    #[error("Insufficient weight. Available: {available:.2}kg, requested: {requested:.2}kg")]
    InsufficientWeight {
        requested: Decimal,
        available: Decimal,
        shortfall: Decimal,
    },
}

/// Units the final draw must take so that all draws add up to `total_units`
pub fn absorb_remainder(total_units: i64, units_already_allocated: i64) -> i64 {
    (total_units - units_already_allocated).max(0)
}

/// Units a non-final draw of `weight_kg` earns at `units_per_kg`
fn proportional_units(weight_kg: Decimal, units_per_kg: Decimal) -> i64 {
    (weight_kg * units_per_kg)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Plan a FIFO packing run over `candidates`
///
/// Candidates are consumed oldest `date_received` first. The request may
/// exceed the available weight by at most [`WEIGHT_TOLERANCE_KG`].
pub fn plan_fifo_allocation(
    candidates: &[BatchAvailability],
    total_weight_kg: Decimal,
    total_units: i64,
) -> Result<AllocationPlan, AllocationError> {
    if total_weight_kg <= Decimal::ZERO {
        return Err(AllocationError::InvalidWeight);
    }
    if total_units <= 0 {
        return Err(AllocationError::InvalidUnits);
    }

    let mut ordered: Vec<&BatchAvailability> = candidates
        .iter()
        .filter(|c| c.remaining_weight_kg > Decimal::ZERO)
        .collect();
    if ordered.is_empty() {
        return Err(AllocationError::NoCandidates);
    }
    ordered.sort_by(|a, b| a.date_received.cmp(&b.date_received));

    let available: Decimal = ordered.iter().map(|c| c.remaining_weight_kg).sum();
    if total_weight_kg > available + WEIGHT_TOLERANCE_KG {
        return Err(AllocationError::InsufficientWeight {
            requested: total_weight_kg,
            available,
            shortfall: total_weight_kg - available,
        });
    }

    let units_per_kg = Decimal::from(total_units) / total_weight_kg;
    let last_index = ordered.len() - 1;
    let mut weight_needed = total_weight_kg;
    let mut allocated = 0i64;
    let mut draws = Vec::new();

    for (index, candidate) in ordered.into_iter().enumerate() {
        let take = candidate.remaining_weight_kg.min(weight_needed);
        let is_final = take >= weight_needed - COMPLETION_EPSILON_KG || index == last_index;

        let units = if is_final {
            absorb_remainder(total_units, allocated)
        } else {
            proportional_units(take, units_per_kg).min(total_units - allocated)
        };

        draws.push(BatchDraw {
            batch_id: candidate.batch_id.clone(),
            weight_kg: take,
            units,
        });
        allocated += units;
        weight_needed -= take;

        if is_final {
            break;
        }
    }

    Ok(AllocationPlan { draws })
}

/// Units taken from one finished-good lot by a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDraw {
    pub lot_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DrainError {
    #[error("Quantity must be positive")]
    InvalidQuantity,

    #[error("Insufficient stock. Available: {available}, requested: {requested}")]
    InsufficientStock { requested: i64, available: i64 },
}

impl DrainError {
    pub fn shortfall(&self) -> i64 {
        match self {
            DrainError::InvalidQuantity => 0,
            DrainError::InsufficientStock { requested, available } => requested - available,
        }
    }
}

/// Plan which lots of `product` satisfy `quantity`, oldest packed first
///
/// All or nothing: if the matching lots cannot cover the request, no draws
/// are returned.
pub fn plan_lot_drain(
    lots: &[FinishedGoodLot],
    product: &ProductKey,
    quantity: i64,
) -> Result<Vec<LotDraw>, DrainError> {
    if quantity <= 0 {
        return Err(DrainError::InvalidQuantity);
    }

    let mut matching: Vec<&FinishedGoodLot> = lots
        .iter()
        .filter(|l| product.matches(l) && l.quantity > 0)
        .collect();
    matching.sort_by(|a, b| a.date_packed.cmp(&b.date_packed));

    let available: i64 = matching.iter().map(|l| l.quantity).sum();
    if available < quantity {
        return Err(DrainError::InsufficientStock {
            requested: quantity,
            available,
        });
    }

    let mut to_deduct = quantity;
    let mut draws = Vec::new();
    for lot in matching {
        if to_deduct == 0 {
            break;
        }
        let take = lot.quantity.min(to_deduct);
        draws.push(LotDraw {
            lot_id: lot.id.clone(),
            quantity: take,
        });
        to_deduct -= take;
    }

    Ok(draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PackagingType, DEFAULT_SELLING_PRICE};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::days(n)
    }

    fn batch(id: &str, received_day: i64, remaining: Decimal) -> BatchAvailability {
        BatchAvailability {
            batch_id: id.into(),
            date_received: day(received_day),
            remaining_weight_kg: remaining,
        }
    }

    fn lot(id: &str, packed_day: i64, qty: i64) -> FinishedGoodLot {
        FinishedGoodLot {
            id: id.into(),
            batch_id: "BATCH-1".into(),
            recipe_name: "Chips".into(),
            packaging_type: PackagingType::Tin,
            quantity: qty,
            quantity_packed: qty,
            date_packed: day(packed_day),
            selling_price: DEFAULT_SELLING_PRICE,
            image_url: None,
        }
    }

    #[test]
    fn test_fifo_consumes_oldest_first() {
        // Listed newest first to prove the planner sorts
        let candidates = vec![
            batch("B2", 2, Decimal::from(10)),
            batch("B1", 1, Decimal::from(10)),
        ];

        let plan = plan_fifo_allocation(&candidates, Decimal::from(12), 120).unwrap();

        assert_eq!(plan.draws.len(), 2);
        assert_eq!(plan.draws[0].batch_id, "B1");
        assert_eq!(plan.draws[0].weight_kg, Decimal::from(10));
        assert_eq!(plan.draws[0].units, 100);
        assert_eq!(plan.draws[1].batch_id, "B2");
        assert_eq!(plan.draws[1].weight_kg, Decimal::from(2));
        assert_eq!(plan.draws[1].units, 20);
    }

    #[test]
    fn test_single_batch_takes_all_units() {
        let candidates = vec![batch("BATCH-1", 0, Decimal::from(95))];
        let plan = plan_fifo_allocation(&candidates, Decimal::from(50), 500).unwrap();

        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws[0].units, 500);
        assert_eq!(plan.draws[0].weight_kg, Decimal::from(50));
    }

    #[test]
    fn test_final_draw_absorbs_rounding() {
        // 10 units over three equal batches: 3.33 → 3, 3, then 4
        let candidates = vec![
            batch("B1", 1, Decimal::ONE),
            batch("B2", 2, Decimal::ONE),
            batch("B3", 3, Decimal::ONE),
        ];
        let plan = plan_fifo_allocation(&candidates, Decimal::from(3), 10).unwrap();

        let units: Vec<i64> = plan.draws.iter().map(|d| d.units).collect();
        assert_eq!(units, vec![3, 3, 4]);
    }

    #[test]
    fn test_rounding_up_never_overshoots() {
        // 4 units over six equal batches: each share 0.67 rounds to 1
        let candidates: Vec<_> = (0..6)
            .map(|i| batch(&format!("B{}", i), i, Decimal::ONE))
            .collect();
        let plan = plan_fifo_allocation(&candidates, Decimal::from(6), 4).unwrap();

        assert_eq!(plan.total_units(), 4);
        assert!(plan.draws.iter().all(|d| d.units >= 0));
        assert_eq!(plan.total_weight(), Decimal::from(6));
    }

    #[test]
    fn test_request_within_tolerance_uses_every_batch() {
        let candidates = vec![
            batch("B1", 1, Decimal::from(5)),
            batch("B2", 2, Decimal::from(5)),
        ];
        let plan = plan_fifo_allocation(&candidates, Decimal::new(1005, 2), 100).unwrap();

        assert_eq!(plan.total_units(), 100);
        assert_eq!(plan.total_weight(), Decimal::from(10));
    }

    #[test]
    fn test_insufficient_weight_reports_shortfall() {
        let candidates = vec![batch("B1", 1, Decimal::from(10))];
        let err = plan_fifo_allocation(&candidates, Decimal::from(12), 100).unwrap_err();

        assert_eq!(
            err,
            AllocationError::InsufficientWeight {
                requested: Decimal::from(12),
                available: Decimal::from(10),
                shortfall: Decimal::from(2),
            }
        );
    }

    #[test]
    fn test_no_candidates() {
        let candidates = vec![batch("B1", 1, Decimal::ZERO)];
        assert_eq!(
            plan_fifo_allocation(&candidates, Decimal::ONE, 1),
            Err(AllocationError::NoCandidates)
        );
        assert_eq!(
            plan_fifo_allocation(&[], Decimal::ONE, 1),
            Err(AllocationError::NoCandidates)
        );
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let candidates = vec![batch("B1", 1, Decimal::from(10))];
        assert_eq!(
            plan_fifo_allocation(&candidates, Decimal::ZERO, 10),
            Err(AllocationError::InvalidWeight)
        );
        assert_eq!(
            plan_fifo_allocation(&candidates, Decimal::ONE, 0),
            Err(AllocationError::InvalidUnits)
        );
    }

    #[test]
    fn test_drain_oldest_lot_first() {
        let lots = vec![lot("B", 2, 5), lot("A", 1, 5)];
        let key = ProductKey::new("Chips", PackagingType::Tin);

        let draws = plan_lot_drain(&lots, &key, 7).unwrap();
        assert_eq!(
            draws,
            vec![
                LotDraw { lot_id: "A".into(), quantity: 5 },
                LotDraw { lot_id: "B".into(), quantity: 2 },
            ]
        );
    }

    #[test]
    fn test_drain_ignores_other_products() {
        let mut pouch = lot("P", 0, 50);
        pouch.packaging_type = PackagingType::Pouch;
        let lots = vec![pouch, lot("A", 1, 5)];
        let key = ProductKey::new("Chips", PackagingType::Tin);

        let err = plan_lot_drain(&lots, &key, 6).unwrap_err();
        assert_eq!(err, DrainError::InsufficientStock { requested: 6, available: 5 });
        assert_eq!(err.shortfall(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Lot quantities always sum to the requested unit count
        #[test]
        fn prop_units_sum_exactly(
            weights in proptest::collection::vec(1u32..5000, 1..8),
            fraction in 1u32..=100,
            units in 1i64..5000,
        ) {
            let candidates: Vec<_> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| batch(&format!("B{}", i), i as i64, Decimal::new(*w as i64, 2)))
                .collect();
            let available: Decimal = candidates.iter().map(|c| c.remaining_weight_kg).sum();
            let requested = (available * Decimal::from(fraction) / Decimal::from(100)).round_dp(2);
            prop_assume!(requested > Decimal::ZERO);

            let plan = plan_fifo_allocation(&candidates, requested, units).unwrap();
            prop_assert_eq!(plan.total_units(), units);
            prop_assert!(plan.draws.iter().all(|d| d.units >= 0));
        }

        /// Weight drawn matches the request and never exceeds a batch's remainder
        #[test]
        fn prop_weight_matches_request(
            weights in proptest::collection::vec(1u32..5000, 1..8),
            fraction in 1u32..=100,
        ) {
            let candidates: Vec<_> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| batch(&format!("B{}", i), i as i64, Decimal::new(*w as i64, 2)))
                .collect();
            let available: Decimal = candidates.iter().map(|c| c.remaining_weight_kg).sum();
            let requested = (available * Decimal::from(fraction) / Decimal::from(100)).round_dp(2);
            prop_assume!(requested > Decimal::ZERO);

            let plan = plan_fifo_allocation(&candidates, requested, 10).unwrap();
            prop_assert!((plan.total_weight() - requested).abs() <= WEIGHT_TOLERANCE_KG);
            for draw in &plan.draws {
                let source = candidates.iter().find(|c| c.batch_id == draw.batch_id).unwrap();
                prop_assert!(draw.weight_kg <= source.remaining_weight_kg);
                prop_assert!(draw.weight_kg >= Decimal::ZERO);
            }
        }
    }
}
