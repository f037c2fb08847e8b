//! Cost ledger models
//!
//! Every business event that costs money (receiving raw material, finishing a
//! processing run, packing) appends one [`CostTransaction`]. The total is
//! always the sum of the four cost components; [`CostTransaction::recompute_total`]
//! is the only place that sets it.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One ledger row attributing cost to a batch or purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostTransaction {
    pub id: String,
    /// Batch or purchase order the cost belongs to
    pub reference_id: String,
    pub date: NaiveDate,
    pub weight_processed: Decimal,
    pub processing_hours: Decimal,
    pub raw_material_cost: Decimal,
    pub packaging_cost: Decimal,
    pub labor_cost: Decimal,
    pub wastage_cost: Decimal,
    pub total_cost: Decimal,
    /// Recording order within the workspace ledger; rows from the sheet may lack it
    #[serde(default)]
    pub sequence: u64,
}

impl CostTransaction {
    /// Build a ledger row from an event's cost components
    pub fn new(id: String, reference_id: String, date: NaiveDate, entry: CostEntry) -> Self {
        let mut tx = Self {
            id,
            reference_id,
            date,
            weight_processed: entry.weight_processed,
            processing_hours: round_cents(entry.processing_hours),
            raw_material_cost: round_cents(entry.raw_material_cost),
            packaging_cost: round_cents(entry.packaging_cost),
            labor_cost: round_cents(entry.labor_cost),
            wastage_cost: round_cents(entry.wastage_cost),
            total_cost: Decimal::ZERO,
            sequence: 0,
        };
        tx.recompute_total();
        tx
    }

    pub fn recompute_total(&mut self) {
        self.total_cost =
            self.raw_material_cost + self.packaging_cost + self.labor_cost + self.wastage_cost;
    }

    /// Merge a manual correction; reference and date are never touched
    pub fn apply(&mut self, patch: &CostTransactionPatch) {
        if let Some(v) = patch.weight_processed {
            self.weight_processed = v;
        }
        if let Some(v) = patch.processing_hours {
            self.processing_hours = v;
        }
        if let Some(v) = patch.raw_material_cost {
            self.raw_material_cost = v;
        }
        if let Some(v) = patch.packaging_cost {
            self.packaging_cost = v;
        }
        if let Some(v) = patch.labor_cost {
            self.labor_cost = v;
        }
        if let Some(v) = patch.wastage_cost {
            self.wastage_cost = v;
        }
        self.recompute_total();
    }

    /// Newest first: later date, then later recording, then id
    pub fn newest_first(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.date
            .cmp(&a.date)
            .then_with(|| b.sequence.cmp(&a.sequence))
            .then_with(|| b.id.cmp(&a.id))
    }

    pub fn components(&self) -> [(CostCategory, Decimal); 4] {
        [
            (CostCategory::RawMaterial, self.raw_material_cost),
            (CostCategory::Packaging, self.packaging_cost),
            (CostCategory::Labor, self.labor_cost),
            (CostCategory::Wastage, self.wastage_cost),
        ]
    }
}

/// Cost components of a single business event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostEntry {
    #[serde(default)]
    pub raw_material_cost: Decimal,
    #[serde(default)]
    pub packaging_cost: Decimal,
    #[serde(default)]
    pub labor_cost: Decimal,
    #[serde(default)]
    pub wastage_cost: Decimal,
    #[serde(default)]
    pub weight_processed: Decimal,
    #[serde(default)]
    pub processing_hours: Decimal,
}

impl CostEntry {
    pub fn raw_material(cost: Decimal, weight_processed: Decimal) -> Self {
        Self {
            raw_material_cost: cost,
            weight_processed,
            ..Self::default()
        }
    }

    pub fn processing(labor_cost: Decimal, wastage_cost: Decimal, hours: Decimal) -> Self {
        Self {
            labor_cost,
            wastage_cost,
            processing_hours: hours,
            ..Self::default()
        }
    }

    pub fn packaging(cost: Decimal) -> Self {
        Self {
            packaging_cost: cost,
            ..Self::default()
        }
    }
}

/// Partial update for a manual ledger correction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostTransactionPatch {
    pub weight_processed: Option<Decimal>,
    pub processing_hours: Option<Decimal>,
    pub raw_material_cost: Option<Decimal>,
    pub packaging_cost: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
    pub wastage_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    RawMaterial,
    Packaging,
    Labor,
    Wastage,
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostCategory::RawMaterial => write!(f, "Raw Material"),
            CostCategory::Packaging => write!(f, "Packaging"),
            CostCategory::Labor => write!(f, "Labor"),
            CostCategory::Wastage => write!(f, "Wastage"),
        }
    }
}

/// Round a money amount to cents, halves away from zero
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
