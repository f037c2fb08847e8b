//! Raw-material batch models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Remaining weight below which a batch counts as fully packed (kg)
pub const DEPLETION_EPSILON_KG: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// A lot of raw mushrooms received from a farm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub source_farm: String,
    pub date_received: DateTime<Utc>,
    pub raw_weight_kg: Decimal,
    pub spoiled_weight_kg: Decimal,
    pub net_weight_kg: Decimal,
    pub remaining_weight_kg: Decimal,
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_config: Option<ProcessConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_recipe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_recipe_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_wastage_kg: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wastage_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
}

impl Batch {
    /// Create a freshly received batch. Net and remaining weight start equal.
    pub fn received(
        id: String,
        source_farm: String,
        date_received: DateTime<Utc>,
        raw_weight_kg: Decimal,
        spoiled_weight_kg: Decimal,
    ) -> Self {
        let net_weight_kg = (raw_weight_kg - spoiled_weight_kg).max(Decimal::ZERO);
        Self {
            id,
            source_farm,
            date_received,
            raw_weight_kg,
            spoiled_weight_kg,
            net_weight_kg,
            remaining_weight_kg: net_weight_kg,
            status: BatchStatus::Received,
            process_config: None,
            selected_recipe_id: None,
            selected_recipe_name: None,
            quality_notes: None,
            processing_wastage_kg: None,
            wastage_reason: None,
            packed_date: None,
            storage_location: None,
        }
    }

    /// Dried (or partly packed) with more than a depletion remainder left
    pub fn has_packable_weight(&self) -> bool {
        matches!(self.status, BatchStatus::DryingComplete | BatchStatus::Packed)
            && self.remaining_weight_kg > DEPLETION_EPSILON_KG
    }

    /// Whether this batch can feed a packing run for `recipe_name`
    pub fn is_packable_for(&self, recipe_name: &str) -> bool {
        self.selected_recipe_name.as_deref() == Some(recipe_name) && self.has_packable_weight()
    }

    /// Take `weight_kg` out of the remaining weight, flipping to `Packed`
    /// once the batch is depleted.
    pub fn consume(&mut self, weight_kg: Decimal, at: DateTime<Utc>) {
        self.remaining_weight_kg = (self.remaining_weight_kg - weight_kg).max(Decimal::ZERO);
        if self.remaining_weight_kg < DEPLETION_EPSILON_KG && self.status != BatchStatus::Packed {
            self.status = BatchStatus::Packed;
            self.packed_date = Some(at);
        }
    }
}

/// Lifecycle stage of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Received,
    Processing,
    DryingComplete,
    Packed,
    Stored,
    Sold,
}

impl BatchStatus {
    pub const ALL: [BatchStatus; 6] = [
        BatchStatus::Received,
        BatchStatus::Processing,
        BatchStatus::DryingComplete,
        BatchStatus::Packed,
        BatchStatus::Stored,
        BatchStatus::Sold,
    ];

    /// Statuses only move forward through the lifecycle
    pub fn can_transition_to(self, next: BatchStatus) -> bool {
        next > self
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchStatus::Received => write!(f, "Received"),
            BatchStatus::Processing => write!(f, "Processing"),
            BatchStatus::DryingComplete => write!(f, "Drying Complete"),
            BatchStatus::Packed => write!(f, "Packed"),
            BatchStatus::Stored => write!(f, "Stored"),
            BatchStatus::Sold => write!(f, "Sold"),
        }
    }
}

/// Timer configuration captured when processing starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    pub start_time: DateTime<Utc>,
    pub wash_duration_seconds: i64,
    pub drain_duration_seconds: i64,
    pub cook_duration_seconds: i64,
    pub total_duration_seconds: i64,
}

impl ProcessConfig {
    /// Hours elapsed between the start of processing and `now`, never negative
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> Decimal {
        let millis = (now - self.start_time).num_milliseconds().max(0);
        Decimal::from(millis) / Decimal::from(3_600_000)
    }

    /// Replace the cook stage, keeping wash and drain durations
    pub fn with_cook_duration(&self, cook_duration_seconds: i64) -> Self {
        Self {
            cook_duration_seconds,
            total_duration_seconds: self.wash_duration_seconds
                + self.drain_duration_seconds
                + cook_duration_seconds,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn batch() -> Batch {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        Batch::received("BATCH-1".into(), "Hilltop Myco".into(), at, Decimal::from(100), Decimal::from(5))
    }

    #[test]
    fn test_received_batch_weights() {
        let b = batch();
        assert_eq!(b.net_weight_kg, Decimal::from(95));
        assert_eq!(b.remaining_weight_kg, Decimal::from(95));
        assert_eq!(b.status, BatchStatus::Received);
    }

    #[test]
    fn test_consume_flips_to_packed_when_depleted() {
        let mut b = batch();
        b.status = BatchStatus::DryingComplete;
        let at = b.date_received + Duration::days(2);

        b.consume(Decimal::from(50), at);
        assert_eq!(b.remaining_weight_kg, Decimal::from(45));
        assert_eq!(b.status, BatchStatus::DryingComplete);

        b.consume(Decimal::new(4495, 2), at);
        assert_eq!(b.status, BatchStatus::Packed);
        assert_eq!(b.packed_date, Some(at));
    }

    #[test]
    fn test_depletion_remainder_is_not_packable() {
        let mut b = batch();
        b.status = BatchStatus::DryingComplete;
        b.selected_recipe_name = Some("Chips".into());
        assert!(b.is_packable_for("Chips"));
        assert!(!b.is_packable_for("Jerky"));

        b.remaining_weight_kg = Decimal::new(5, 2);
        assert_eq!(b.status, BatchStatus::DryingComplete);
        assert!(!b.has_packable_weight());
        assert!(!b.is_packable_for("Chips"));
    }

    #[test]
    fn test_consume_never_goes_negative() {
        let mut b = batch();
        b.consume(Decimal::from(500), b.date_received);
        assert_eq!(b.remaining_weight_kg, Decimal::ZERO);
    }

    #[test]
    fn test_status_only_moves_forward() {
        assert!(BatchStatus::Received.can_transition_to(BatchStatus::Processing));
        assert!(BatchStatus::Packed.can_transition_to(BatchStatus::Stored));
        assert!(!BatchStatus::DryingComplete.can_transition_to(BatchStatus::Processing));
        assert!(!BatchStatus::Sold.can_transition_to(BatchStatus::Sold));
    }

    #[test]
    fn test_elapsed_hours() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let config = ProcessConfig {
            start_time: start,
            wash_duration_seconds: 60,
            drain_duration_seconds: 120,
            cook_duration_seconds: 600,
            total_duration_seconds: 780,
        };
        assert_eq!(config.elapsed_hours(start + Duration::minutes(90)), Decimal::new(15, 1));
        assert_eq!(config.elapsed_hours(start - Duration::hours(1)), Decimal::ZERO);
    }
}
