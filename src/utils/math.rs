//! Decimal precision helpers shared by every calculation

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

pub fn pow10(n: i32) -> Decimal {
    match n {
        0 => dec!(1),
        6 => dec!(1_000_000),
        18 => dec!(1_000_000_000_000_000_000),
        _ => {
            let mut result = dec!(1);
            if n > 0 {
                for _ in 0..n {
                    result *= dec!(10);
                }
            } else {
                for _ in 0..(-n) {
                    result /= dec!(10);
                }
            }
            result
        }
    }
}

pub fn clamp01(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE)
}

/// Fraction to basis points (0.0030 -> 30).
pub fn to_bps(fraction: Decimal) -> Decimal {
    fraction * dec!(10000)
}

/// Basis points to fraction (30 -> 0.0030).
pub fn from_bps(bps: u32) -> Decimal {
    Decimal::from(bps) / dec!(10000)
}

/// Division that treats a zero denominator as zero instead of panicking.
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Percentage of `part` over `whole`, zero-safe.
pub fn pct_of(part: Decimal, whole: Decimal) -> Decimal {
    safe_ratio(part, whole) * dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0), dec!(1));
        assert_eq!(pow10(3), dec!(1000));
        assert_eq!(pow10(-2), dec!(0.01));
        assert_eq!(pow10(18), dec!(1_000_000_000_000_000_000));
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(dec!(-0.4)), dec!(0));
        assert_eq!(clamp01(dec!(0.4)), dec!(0.4));
        assert_eq!(clamp01(dec!(1.7)), dec!(1));
    }

    #[test]
    fn test_bps_round_trip() {
        assert_eq!(to_bps(dec!(0.003)), dec!(30));
        assert_eq!(from_bps(30), dec!(0.003));
    }

    #[test]
    fn test_safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(dec!(5), dec!(0)), dec!(0));
        assert_eq!(pct_of(dec!(25), dec!(200)), dec!(12.5));
    }
}
