//! AMM price-impact models
//!
//! One model per venue family, dispatched on the `PoolParams` tagged union.
//! Adding a family means one new variant and one new module, not branching
//! logic spread through the pipeline.
//!
//! Shared conventions: the venue fee is deducted from the input before the
//! curve runs; `price_impact` compares realized output-per-input on the
//! fee-adjusted amount against spot, so the fee itself is not counted as
//! impact (`slippage` is the fee-inclusive figure).

pub mod constant_product;
pub mod concentrated;
pub mod weighted;
pub mod stable_swap;

use rust_decimal::Decimal;

use crate::config::AnalysisConfig;
use crate::errors::{EngineError, EngineResult};
use crate::types::{PoolParams, PoolState, PriceImpactResult};

/// Simulate `amount_in` against a pool snapshot and report execution quality.
///
/// Impact above the configured maximum is reported through `is_acceptable`,
/// not an error; callers decide whether to reject or proceed with a warning.
pub fn price_impact(
    pool: &PoolState,
    amount_in: Decimal,
    config: &AnalysisConfig,
) -> EngineResult<PriceImpactResult> {
    pool.validate()?;
    if amount_in <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "amount_in".to_string(),
            reason: format!("non-positive trade amount: {amount_in}"),
        });
    }

    let amount_in_after_fee = amount_in * (Decimal::ONE - pool.fee_rate);

    let (amount_out, price_before, price_after) = match &pool.params {
        PoolParams::ConstantProduct { reserve_in, reserve_out } => {
            constant_product::swap(*reserve_in, *reserve_out, amount_in_after_fee)
        }
        PoolParams::Concentrated {
            liquidity_per_tick,
            current_tick,
            tick_upper,
            tick_spacing,
            ..
        } => concentrated::swap(
            *liquidity_per_tick,
            *current_tick,
            *tick_upper,
            *tick_spacing,
            amount_in_after_fee,
            &pool.venue,
        )?,
        PoolParams::Weighted {
            reserve_in,
            reserve_out,
            weight_in,
            weight_out,
        } => weighted::swap(
            *reserve_in,
            *reserve_out,
            *weight_in,
            *weight_out,
            amount_in_after_fee,
        ),
        PoolParams::Stable { reserves, amplification } => {
            stable_swap::swap(reserves, *amplification, amount_in_after_fee, &pool.venue)?
        }
    };

    if amount_out <= Decimal::ZERO || price_before <= Decimal::ZERO {
        return Err(EngineError::PoolStateInvalid {
            venue: pool.venue.clone(),
            details: format!("trade of {amount_in} produces no output"),
        });
    }

    let effective_price = amount_out / amount_in_after_fee;
    let price_impact = ((price_before - effective_price) / price_before).max(Decimal::ZERO);
    let gross_price = amount_out / amount_in;
    let slippage = ((price_before - gross_price) / price_before).max(Decimal::ZERO);

    Ok(PriceImpactResult {
        amount_in,
        amount_out,
        price_before,
        price_after,
        price_impact,
        slippage,
        effective_price,
        is_acceptable: price_impact <= config.max_price_impact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn pool(params: PoolParams) -> PoolState {
        PoolState {
            venue: "test-venue".to_string(),
            network: "ethereum".to_string(),
            params,
            fee_rate: dec!(0.003),
            volume_24h_usd: dec!(1000000),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_fee_applied_before_curve() {
        let state = pool(PoolParams::ConstantProduct {
            reserve_in: dec!(100000),
            reserve_out: dec!(200000),
        });
        let result = price_impact(&state, dec!(1000), &AnalysisConfig::default()).unwrap();

        // 1000 in at 0.3% fee -> 997 hits the curve
        let expected_out = dec!(200000) - dec!(20000000000) / dec!(100997);
        assert!((result.amount_out - expected_out).abs() < dec!(0.0001));
    }

    #[test]
    fn test_rejects_invalid_pool_before_model() {
        let state = pool(PoolParams::ConstantProduct {
            reserve_in: dec!(0),
            reserve_out: dec!(200000),
        });
        let err = price_impact(&state, dec!(1000), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::PoolStateInvalid { .. }));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let state = pool(PoolParams::ConstantProduct {
            reserve_in: dec!(100000),
            reserve_out: dec!(200000),
        });
        assert!(price_impact(&state, dec!(0), &AnalysisConfig::default()).is_err());
    }

    #[test]
    fn test_excessive_impact_is_flagged_not_fatal() {
        let state = pool(PoolParams::ConstantProduct {
            reserve_in: dec!(10000),
            reserve_out: dec!(10000),
        });
        // 30% of the pool in one trade
        let result = price_impact(&state, dec!(3000), &AnalysisConfig::default()).unwrap();
        assert!(!result.is_acceptable);
        assert!(result.price_impact > dec!(0.05));
    }

    proptest! {
        #[test]
        fn prop_impact_monotonic_in_size_constant_product(
            amount_small in 1u64..5_000,
            extra in 1u64..50_000,
        ) {
            let state = pool(PoolParams::ConstantProduct {
                reserve_in: dec!(1000000),
                reserve_out: dec!(2000000),
            });
            let config = AnalysisConfig::default();
            let small = price_impact(&state, Decimal::from(amount_small), &config).unwrap();
            let large =
                price_impact(&state, Decimal::from(amount_small + extra), &config).unwrap();
            prop_assert!(large.price_impact >= small.price_impact);
        }

        #[test]
        fn prop_impact_monotonic_in_size_weighted(
            amount_small in 1u64..5_000,
            extra in 1u64..50_000,
        ) {
            let state = pool(PoolParams::Weighted {
                reserve_in: dec!(1000000),
                reserve_out: dec!(500000),
                weight_in: dec!(0.8),
                weight_out: dec!(0.2),
            });
            let config = AnalysisConfig::default();
            let small = price_impact(&state, Decimal::from(amount_small), &config).unwrap();
            let large =
                price_impact(&state, Decimal::from(amount_small + extra), &config).unwrap();
            prop_assert!(large.price_impact >= small.price_impact);
        }
    }
}
