//! Concentrated-liquidity execution model
//!
//! The pool quotes `1.0001^tick` as the input-per-output price and offers a
//! fixed input capacity per tick-spacing step. A swap walks upward from the
//! current tick consuming capacity step by step; the step price is updated
//! incrementally (`powi(tick_spacing)` per step) so tick magnitude never
//! pushes the intermediate powers outside Decimal range.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::errors::{EngineError, EngineResult};

/// Returns (amount_out, spot_before, spot_after), prices as output-per-input.
///
/// Input that is still unfilled when the walk reaches `tick_upper` is a
/// liquidity failure for this leg, not a partial fill.
pub(super) fn swap(
    liquidity_per_tick: Decimal,
    current_tick: i32,
    tick_upper: i32,
    tick_spacing: u32,
    amount_in_after_fee: Decimal,
    venue: &str,
) -> EngineResult<(Decimal, Decimal, Decimal)> {
    let step_factor = dec!(1.0001).powi(tick_spacing as i64);
    // input-per-output at the current tick
    let mut price = dec!(1.0001).powi(current_tick as i64);
    let spot_before = Decimal::ONE / price;

    let mut remaining = amount_in_after_fee;
    let mut amount_out = Decimal::ZERO;
    let mut tick = current_tick;

    while remaining > Decimal::ZERO {
        if tick >= tick_upper {
            return Err(EngineError::LiquidityInsufficient {
                venue: venue.to_string(),
                details: format!(
                    "active range exhausted at tick {tick} with {remaining} input unfilled"
                ),
            });
        }
        let fill = remaining.min(liquidity_per_tick);
        amount_out += fill / price;
        remaining -= fill;
        tick += tick_spacing as i32;
        price *= step_factor;
    }

    let spot_after = Decimal::ONE / price;
    Ok((amount_out, spot_before, spot_after))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tick_fill_trades_near_spot() {
        // trade fits inside the first tick step: effective price == tick price
        let (out, before, _) = swap(dec!(10000), 0, 1000, 10, dec!(500), "uniswap-v3").unwrap();
        assert_eq!(before, dec!(1));
        assert_eq!(out, dec!(500));
    }

    #[test]
    fn test_crossing_ticks_degrades_price() {
        let small = swap(dec!(1000), 0, 10000, 10, dec!(900), "uniswap-v3").unwrap();
        let large = swap(dec!(1000), 0, 10000, 10, dec!(9000), "uniswap-v3").unwrap();

        let eff_small = small.0 / dec!(900);
        let eff_large = large.0 / dec!(9000);
        // the larger trade crossed more ticks, so it realized a worse price
        assert!(eff_large < eff_small);
    }

    #[test]
    fn test_impact_monotonic_in_size() {
        let mut last_effective = Decimal::MAX;
        for amount in [500u64, 2_000, 5_000, 9_000] {
            let amt = Decimal::from(amount);
            let (out, _, _) = swap(dec!(1000), 0, 10000, 10, amt, "uniswap-v3").unwrap();
            let effective = out / amt;
            assert!(effective <= last_effective);
            last_effective = effective;
        }
    }

    #[test]
    fn test_range_exhaustion_is_liquidity_failure() {
        // 3 steps of 100 capacity cannot absorb 1000 input
        let err = swap(dec!(100), 0, 30, 10, dec!(1000), "uniswap-v3").unwrap_err();
        assert!(matches!(err, EngineError::LiquidityInsufficient { .. }));
    }

    #[test]
    fn test_negative_ticks_price_above_one() {
        // below tick zero the output token is cheaper than the input
        let (out, before, _) = swap(dec!(10000), -1000, 1000, 10, dec!(100), "uniswap-v3").unwrap();
        assert!(before > dec!(1));
        assert!(out > dec!(100));
    }
}
