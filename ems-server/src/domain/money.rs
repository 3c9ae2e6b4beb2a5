//! Decimal helpers for money and hour arithmetic
//!
//! Amounts travel as f64 on the wire and in storage. All arithmetic runs
//! through `Decimal` and results are rounded back to two places, so
//! repeated derivations never accumulate float drift.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

pub const DECIMAL_PLACES: u32 = 2;

/// Convert a wire/storage f64 into a Decimal for arithmetic
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round a Decimal to two places and convert back to f64
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert_eq!(to_f64(to_decimal(30000.0)), 30000.0);
        assert_eq!(to_f64(to_decimal(0.1) + to_decimal(0.2)), 0.3);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(to_f64(to_decimal(1.005) * Decimal::ONE), 1.01);
        assert_eq!(to_f64(to_decimal(8.4999)), 8.5);
        assert_eq!(to_f64(to_decimal(-1.005)), -1.01);
    }

    #[test]
    fn test_non_finite_inputs() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
