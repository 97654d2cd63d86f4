//! Validation utilities for the Bottle Inventory Management Platform

use rust_decimal::Decimal;

/// Plausible band for the weight-to-volume density factor. Real-world
/// distillates cluster around 0.90-1.10.
pub fn validate_density_factor(factor: Decimal) -> Result<(), &'static str> {
    let min = Decimal::new(50, 2);
    let max = Decimal::new(150, 2);
    if factor < min || factor > max {
        return Err("Density factor out of plausible range (0.50-1.50)");
    }
    Ok(())
}

/// Scale readings are gross weights in grams and must be positive.
pub fn validate_weight_g(weight_g: i32) -> Result<(), &'static str> {
    if weight_g <= 0 {
        return Err("Weight must be positive");
    }
    Ok(())
}

/// A government label folio: up to 12 alphanumeric characters.
pub fn validate_folio(folio: &str) -> Result<(), &'static str> {
    if folio.trim().is_empty() {
        return Err("Folio is required");
    }
    if folio.len() > 12 {
        return Err("Folio must be at most 12 characters");
    }
    if !folio.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Folio must be alphanumeric");
    }
    Ok(())
}

/// Bottle capacity in milliliters must be positive.
pub fn validate_capacity_ml(capacity_ml: i32) -> Result<(), &'static str> {
    if capacity_ml <= 0 {
        return Err("Capacity must be positive");
    }
    Ok(())
}

/// List prices must be positive.
pub fn validate_unit_price(unit_price: Decimal) -> Result<(), &'static str> {
    if unit_price <= Decimal::ZERO {
        return Err("Unit price must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ========================================================================
    // Density Factor Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_density_factor_valid() {
        assert!(validate_density_factor(Decimal::new(95, 2)).is_ok());
        assert!(validate_density_factor(Decimal::new(105, 2)).is_ok());
        assert!(validate_density_factor(Decimal::ONE).is_ok());
    }

    #[test]
    fn test_validate_density_factor_bounds() {
        assert!(validate_density_factor(Decimal::new(50, 2)).is_ok());
        assert!(validate_density_factor(Decimal::new(150, 2)).is_ok());
        assert!(validate_density_factor(Decimal::new(49, 2)).is_err());
        assert!(validate_density_factor(Decimal::new(151, 2)).is_err());
    }

    #[test]
    fn test_validate_density_factor_rejects_extremes() {
        assert!(validate_density_factor(Decimal::ZERO).is_err());
        assert!(validate_density_factor(Decimal::new(-95, 2)).is_err());
        assert!(validate_density_factor(Decimal::from(10)).is_err());
    }

    // ========================================================================
    // Weight and Capacity Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_weight_positive() {
        assert!(validate_weight_g(1).is_ok());
        assert!(validate_weight_g(1544).is_ok());
        assert!(validate_weight_g(0).is_err());
        assert!(validate_weight_g(-1).is_err());
    }

    #[test]
    fn test_validate_capacity_positive() {
        assert!(validate_capacity_ml(750).is_ok());
        assert!(validate_capacity_ml(0).is_err());
        assert!(validate_capacity_ml(-750).is_err());
    }

    #[test]
    fn test_validate_unit_price_positive() {
        assert!(validate_unit_price(Decimal::new(29650, 2)).is_ok());
        assert!(validate_unit_price(Decimal::ZERO).is_err());
        assert!(validate_unit_price(Decimal::new(-1, 2)).is_err());
    }

    // ========================================================================
    // Folio Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_folio_valid() {
        assert!(validate_folio("Ii0000000001").is_ok());
        assert!(validate_folio("Nn1644803750").is_ok());
        assert!(validate_folio("1").is_ok());
    }

    #[test]
    fn test_validate_folio_invalid() {
        assert!(validate_folio("").is_err());
        assert!(validate_folio("   ").is_err());
        assert!(validate_folio("Ii0000000001X").is_err());
        assert!(validate_folio("Ii-000000001").is_err());
        assert!(validate_folio("Ii 000000001").is_err());
    }

    // ========================================================================
    // Property Tests
    // ========================================================================

    proptest! {
        #[test]
        fn prop_factor_band_is_exact(cents in -500i64..500) {
            let factor = Decimal::new(cents, 2);
            let accepted = validate_density_factor(factor).is_ok();
            prop_assert_eq!(accepted, (50..=150).contains(&cents));
        }

        #[test]
        fn prop_alphanumeric_folios_up_to_twelve_accepted(folio in "[A-Za-z0-9]{1,12}") {
            prop_assert!(validate_folio(&folio).is_ok());
        }

        #[test]
        fn prop_weight_acceptance_matches_sign(weight in -10_000i32..10_000) {
            prop_assert_eq!(validate_weight_g(weight).is_ok(), weight > 0);
        }
    }
}
