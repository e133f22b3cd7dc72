//! Pool snapshot types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::{EngineError, EngineResult};

/// Venue family tag. Adding a family means adding one variant here and one
/// model module under `amm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PoolFamily {
    ConstantProduct,
    ConcentratedLiquidity,
    WeightedPool,
    StableSwap,
}

impl std::fmt::Display for PoolFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PoolFamily::ConstantProduct => "constant-product",
            PoolFamily::ConcentratedLiquidity => "concentrated-liquidity",
            PoolFamily::WeightedPool => "weighted-pool",
            PoolFamily::StableSwap => "stable-swap",
        };
        write!(f, "{name}")
    }
}

/// Family-specific pool parameters.
#[derive(Debug, Clone, Serialize)]
pub enum PoolParams {
    ConstantProduct {
        reserve_in: Decimal,
        reserve_out: Decimal,
    },
    Concentrated {
        /// Input-token capacity available inside each tick-spacing step.
        liquidity_per_tick: Decimal,
        current_tick: i32,
        tick_lower: i32,
        tick_upper: i32,
        tick_spacing: u32,
    },
    Weighted {
        reserve_in: Decimal,
        reserve_out: Decimal,
        weight_in: Decimal,
        weight_out: Decimal,
    },
    Stable {
        reserves: Vec<Decimal>,
        amplification: Decimal,
    },
}

/// Point-in-time pool snapshot supplied by the price/liquidity feed.
#[derive(Debug, Clone, Serialize)]
pub struct PoolState {
    pub venue: String,
    pub network: String,
    pub params: PoolParams,
    pub fee_rate: Decimal,
    pub volume_24h_usd: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl PoolState {
    pub fn family(&self) -> PoolFamily {
        match self.params {
            PoolParams::ConstantProduct { .. } => PoolFamily::ConstantProduct,
            PoolParams::Concentrated { .. } => PoolFamily::ConcentratedLiquidity,
            PoolParams::Weighted { .. } => PoolFamily::WeightedPool,
            PoolParams::Stable { .. } => PoolFamily::StableSwap,
        }
    }

    /// Every reserve/liquidity figure must be strictly positive; a pool that
    /// fails this never reaches a model.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |details: &str| {
            Err(EngineError::PoolStateInvalid {
                venue: self.venue.clone(),
                details: details.to_string(),
            })
        };

        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return invalid(&format!("fee rate {} outside [0, 1)", self.fee_rate));
        }

        match &self.params {
            PoolParams::ConstantProduct { reserve_in, reserve_out } => {
                if *reserve_in <= Decimal::ZERO || *reserve_out <= Decimal::ZERO {
                    return invalid("non-positive reserve");
                }
            }
            PoolParams::Concentrated {
                liquidity_per_tick,
                current_tick,
                tick_lower,
                tick_upper,
                tick_spacing,
            } => {
                if *liquidity_per_tick <= Decimal::ZERO {
                    return invalid("non-positive tick liquidity");
                }
                if *tick_spacing == 0 {
                    return invalid("zero tick spacing");
                }
                if tick_lower >= tick_upper {
                    return invalid("empty tick range");
                }
                if current_tick < tick_lower || current_tick > tick_upper {
                    return invalid("current tick outside range");
                }
                if tick_lower.abs() > 500_000 || tick_upper.abs() > 500_000 {
                    return invalid("tick magnitude out of range");
                }
            }
            PoolParams::Weighted {
                reserve_in,
                reserve_out,
                weight_in,
                weight_out,
            } => {
                if *reserve_in <= Decimal::ZERO || *reserve_out <= Decimal::ZERO {
                    return invalid("non-positive reserve");
                }
                if *weight_in <= Decimal::ZERO || *weight_out <= Decimal::ZERO {
                    return invalid("non-positive weight");
                }
            }
            PoolParams::Stable { reserves, amplification } => {
                if reserves.len() < 2 {
                    return invalid("stable pool needs at least two reserves");
                }
                if reserves.iter().any(|r| *r <= Decimal::ZERO) {
                    return invalid("non-positive reserve");
                }
                if *amplification <= Decimal::ZERO {
                    return invalid("non-positive amplification");
                }
            }
        }
        Ok(())
    }

    /// Primary input-side reserve used for depth ratios.
    pub fn primary_reserve(&self) -> Decimal {
        match &self.params {
            PoolParams::ConstantProduct { reserve_in, .. } => *reserve_in,
            PoolParams::Concentrated {
                liquidity_per_tick,
                current_tick,
                tick_upper,
                tick_spacing,
                ..
            } => {
                let steps = ((*tick_upper - *current_tick) as i64 / *tick_spacing as i64).max(1);
                *liquidity_per_tick * Decimal::from(steps)
            }
            PoolParams::Weighted { reserve_in, .. } => *reserve_in,
            PoolParams::Stable { reserves, .. } => reserves[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cp_pool(reserve_in: Decimal, reserve_out: Decimal) -> PoolState {
        PoolState {
            venue: "uniswap-v2".to_string(),
            network: "ethereum".to_string(),
            params: PoolParams::ConstantProduct { reserve_in, reserve_out },
            fee_rate: dec!(0.003),
            volume_24h_usd: dec!(1000000),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_rejects_non_positive_reserve() {
        assert!(cp_pool(dec!(0), dec!(100)).validate().is_err());
        assert!(cp_pool(dec!(-5), dec!(100)).validate().is_err());
        assert!(cp_pool(dec!(100), dec!(100)).validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_tick_range() {
        let pool = PoolState {
            venue: "uniswap-v3".to_string(),
            network: "ethereum".to_string(),
            params: PoolParams::Concentrated {
                liquidity_per_tick: dec!(1000),
                current_tick: 100,
                tick_lower: 100,
                tick_upper: 100,
                tick_spacing: 10,
            },
            fee_rate: dec!(0.003),
            volume_24h_usd: dec!(0),
            observed_at: Utc::now(),
        };
        assert!(pool.validate().is_err());
    }

    #[test]
    fn test_family_tag() {
        assert_eq!(cp_pool(dec!(1), dec!(1)).family(), PoolFamily::ConstantProduct);
    }
}
