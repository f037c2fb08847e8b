//! Workspace cost rates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Labor rate applied when no rate has been configured (per hour)
pub const DEFAULT_LABOR_RATE: Decimal = Decimal::from_parts(1250, 0, 0, false, 2);

/// Raw material rate applied when no rate has been configured (per kg)
pub const DEFAULT_RAW_MATERIAL_RATE: Decimal = Decimal::from_parts(800, 0, 0, false, 2);

/// Rates used to cost receiving and processing events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateSettings {
    pub labor_rate_per_hour: Decimal,
    pub raw_material_rate_per_kg: Decimal,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            labor_rate_per_hour: DEFAULT_LABOR_RATE,
            raw_material_rate_per_kg: DEFAULT_RAW_MATERIAL_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let rates = RateSettings::default();
        assert_eq!(rates.labor_rate_per_hour, Decimal::new(125, 1));
        assert_eq!(rates.raw_material_rate_per_kg, Decimal::from(8));
    }
}
