//! Recipe models and processing timer calculations

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProcessConfig;

/// Fixed drain stage duration in seconds
pub const DRAIN_DURATION_SECONDS: i64 = 120;

/// Seconds of washing per base-weight unit of mushrooms
pub const WASH_SECONDS_PER_BASE: i64 = 60;

/// A processing recipe (what a batch is cooked into)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub recipe_type: RecipeType,
    pub base_weight_kg: Decimal,
    pub cook_time_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Packs produced per kg of processed mushrooms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_ratio: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_pack_size_kg: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeType {
    Chips,
    Dried,
    Powder,
    Other,
}

impl Recipe {
    /// Base weight used to scale timers; recipes without one default to 0.5 kg
    pub fn effective_base_weight(&self) -> Decimal {
        if self.base_weight_kg > Decimal::ZERO {
            self.base_weight_kg
        } else {
            Decimal::new(5, 1)
        }
    }

    /// Cook duration for `net_weight_kg` of mushrooms
    pub fn cook_duration_seconds(&self, net_weight_kg: Decimal) -> i64 {
        let ratio = net_weight_kg / self.effective_base_weight();
        ceil_seconds(ratio * Decimal::from(self.cook_time_minutes * 60))
    }

    /// Full timer configuration for a batch starting now
    pub fn process_config(&self, net_weight_kg: Decimal, start_time: DateTime<Utc>) -> ProcessConfig {
        let ratio = net_weight_kg / self.effective_base_weight();
        let wash = ceil_seconds(ratio * Decimal::from(WASH_SECONDS_PER_BASE));
        let cook = self.cook_duration_seconds(net_weight_kg);

        ProcessConfig {
            start_time,
            wash_duration_seconds: wash,
            drain_duration_seconds: DRAIN_DURATION_SECONDS,
            cook_duration_seconds: cook,
            total_duration_seconds: wash + DRAIN_DURATION_SECONDS + cook,
        }
    }
}

fn ceil_seconds(value: Decimal) -> i64 {
    value.ceil().to_i64().unwrap_or(i64::MAX)
}

/// Estimate how many packs a weight of product fills
///
/// `floor(weight × yield_ratio / pack_size)`, zero for a non-positive pack size.
pub fn estimate_pack_count(weight_kg: Decimal, yield_ratio: Decimal, pack_size: Decimal) -> i64 {
    if pack_size <= Decimal::ZERO {
        return 0;
    }
    (weight_kg * yield_ratio / pack_size)
        .floor()
        .to_i64()
        .unwrap_or(0)
        .max(0)
}
