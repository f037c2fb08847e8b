//! Validation utilities for receiving, processing and sales input

use rust_decimal::Decimal;

use crate::allocation::WEIGHT_TOLERANCE_KG;

// ============================================================================
// Weight Validations
// ============================================================================

/// Validate raw and spoiled weights of an incoming delivery
pub fn validate_receiving_weights(raw: Decimal, spoiled: Decimal) -> Result<(), &'static str> {
    if raw <= Decimal::ZERO {
        return Err("Raw weight must be positive");
    }
    if spoiled < Decimal::ZERO {
        return Err("Spoiled weight cannot be negative");
    }
    if spoiled > raw {
        return Err("Spoiled weight cannot exceed raw weight");
    }
    Ok(())
}

/// Good output plus wastage must account for the input weight
pub fn validate_qc_reconciliation(
    input_kg: Decimal,
    good_kg: Decimal,
    wastage_kg: Decimal,
) -> Result<(), &'static str> {
    if good_kg < Decimal::ZERO || wastage_kg < Decimal::ZERO {
        return Err("Weights cannot be negative");
    }
    if (good_kg + wastage_kg - input_kg).abs() > WEIGHT_TOLERANCE_KG {
        return Err("Good weight plus wastage must equal the input weight");
    }
    Ok(())
}

/// Wastage needs an explanation
pub fn validate_wastage_reason(wastage_kg: Decimal, reason: Option<&str>) -> Result<(), &'static str> {
    if wastage_kg > Decimal::ZERO && reason.map_or(true, |r| r.trim().is_empty()) {
        return Err("A reason is required when wastage is recorded");
    }
    Ok(())
}

// ============================================================================
// Quantity & Price Validations
// ============================================================================

pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

pub fn validate_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO {
        return Err("Rate cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_receiving_weights() {
        assert!(validate_receiving_weights(dec("100"), dec("5")).is_ok());
        assert!(validate_receiving_weights(dec("100"), dec("100")).is_ok());
        assert!(validate_receiving_weights(dec("0"), dec("0")).is_err());
        assert!(validate_receiving_weights(dec("10"), dec("-1")).is_err());
        assert!(validate_receiving_weights(dec("10"), dec("10.5")).is_err());
    }

    #[test]
    fn test_qc_reconciliation_tolerance() {
        assert!(validate_qc_reconciliation(dec("95"), dec("90"), dec("5")).is_ok());
        assert!(validate_qc_reconciliation(dec("95"), dec("90"), dec("5.1")).is_ok());
        assert!(validate_qc_reconciliation(dec("95"), dec("90"), dec("5.2")).is_err());
        assert!(validate_qc_reconciliation(dec("95"), dec("80"), dec("5")).is_err());
    }

    #[test]
    fn test_wastage_reason_required() {
        assert!(validate_wastage_reason(dec("0"), None).is_ok());
        assert!(validate_wastage_reason(dec("2"), Some("Bruised caps")).is_ok());
        assert!(validate_wastage_reason(dec("2"), None).is_err());
        assert!(validate_wastage_reason(dec("2"), Some("  ")).is_err());
    }

    #[test]
    fn test_quantity_and_price() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(dec("-0.01")).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Hilltop Myco").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("orders@greengrocer.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("a@b").is_err());
    }
}
