//! Analysis configuration and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::env;
use std::str::FromStr;

use crate::types::PoolFamily;

// Spread and profitability gates
pub const MIN_SPREAD_PCT: Decimal = dec!(0.01);
pub const MAX_SPREAD_PCT: Decimal = dec!(50);
pub const DEFAULT_MIN_SPREAD_PCT: Decimal = dec!(0.1);
pub const DEFAULT_MIN_SPREAD_BPS: u32 = 10;
pub const DEFAULT_MIN_NET_PROFIT_PCT: Decimal = dec!(0.1);

// Execution modelling
pub const DEFAULT_MAX_PRICE_IMPACT: Decimal = dec!(0.05); // 5%
pub const DEFAULT_MAX_SLIPPAGE: Decimal = dec!(0.01); // 1%
pub const DEFAULT_QUOTE_FRESHNESS_SECS: i64 = 30;
pub const DEFAULT_BASE_EXECUTION_MS: u64 = 12_000;
pub const DEFAULT_MAX_EXECUTION_TIME_MS: u64 = 30_000;

// Gas defaults
pub const DEFAULT_NORMAL_GAS_GWEI: Decimal = dec!(50);
pub const DEFAULT_GAS_COST_USD: Decimal = dec!(5);

// Cache and fan-out bounds
pub const MIN_CACHE_TTL_SECS: u64 = 5;
pub const MAX_CACHE_TTL_SECS: u64 = 60;
pub const MAX_CONCURRENT_SCANS: usize = 16;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    // Spread / profit gates
    pub min_spread_pct: Decimal,
    pub min_spread_bps: u32,
    pub min_net_profit_pct: Decimal,
    // AMM execution limits
    pub max_price_impact: Decimal,
    pub max_slippage: Decimal,
    // Freshness
    pub quote_freshness_secs: i64,
    // Liquidity floors (USD) per pool family
    pub min_liquidity_usd: Decimal,
    pub floor_constant_product: Decimal,
    pub floor_concentrated: Decimal,
    pub floor_weighted: Decimal,
    pub floor_stable: Decimal,
    // Risk normalization inputs
    pub normal_gas_gwei: Decimal,
    pub max_execution_time_ms: u64,
    pub max_risk_score: Decimal,
    pub default_volatility: Decimal,
    pub default_congestion_pct: Decimal,
    // Composite verdict
    pub min_composite_score: Decimal,
    // Scanner cost assumptions
    pub default_gas_cost_usd: Decimal,
    pub default_slippage_rate: Decimal,
    pub bridge_fee_usd: Decimal,
    pub base_execution_ms: u64,
    /// Applied to every gas estimate; scenario simulation varies it.
    pub gas_cost_multiplier: Decimal,
    // Concurrency and caching
    pub venue_timeout_ms: u64,
    pub gas_timeout_ms: u64,
    pub cache_ttl_secs: u64,
    pub max_concurrent_scans: usize,
    // Batch limits
    pub max_results: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_spread_pct: DEFAULT_MIN_SPREAD_PCT,
            min_spread_bps: DEFAULT_MIN_SPREAD_BPS,
            min_net_profit_pct: DEFAULT_MIN_NET_PROFIT_PCT,
            max_price_impact: DEFAULT_MAX_PRICE_IMPACT,
            max_slippage: DEFAULT_MAX_SLIPPAGE,
            quote_freshness_secs: DEFAULT_QUOTE_FRESHNESS_SECS,
            min_liquidity_usd: dec!(10000),
            floor_constant_product: dec!(50000),
            floor_concentrated: dec!(100000),
            floor_weighted: dec!(50000),
            floor_stable: dec!(500000),
            normal_gas_gwei: DEFAULT_NORMAL_GAS_GWEI,
            max_execution_time_ms: DEFAULT_MAX_EXECUTION_TIME_MS,
            max_risk_score: dec!(0.7),
            default_volatility: dec!(0.02),
            default_congestion_pct: dec!(30),
            min_composite_score: dec!(0.6),
            default_gas_cost_usd: DEFAULT_GAS_COST_USD,
            default_slippage_rate: dec!(0.001),
            bridge_fee_usd: dec!(3),
            base_execution_ms: DEFAULT_BASE_EXECUTION_MS,
            gas_cost_multiplier: Decimal::ONE,
            venue_timeout_ms: 2_000,
            gas_timeout_ms: 2_000,
            cache_ttl_secs: 15,
            max_concurrent_scans: 4,
            max_results: 20,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_spread_pct: env::var("MIN_SPREAD_PCT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(defaults.min_spread_pct)
                .max(MIN_SPREAD_PCT)
                .min(MAX_SPREAD_PCT),
            min_spread_bps: env::var("MIN_SPREAD_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_spread_bps),
            min_net_profit_pct: env::var("MIN_NET_PROFIT_PCT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(defaults.min_net_profit_pct)
                .max(Decimal::ZERO),
            max_price_impact: env::var("MAX_PRICE_IMPACT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(defaults.max_price_impact)
                .max(dec!(0.001))
                .min(dec!(0.5)),
            max_slippage: env::var("MAX_SLIPPAGE")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(defaults.max_slippage)
                .max(dec!(0.0001)),
            quote_freshness_secs: env::var("QUOTE_FRESHNESS_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.quote_freshness_secs)
                .max(1),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs)
                .max(MIN_CACHE_TTL_SECS)
                .min(MAX_CACHE_TTL_SECS),
            max_concurrent_scans: env::var("MAX_CONCURRENT_SCANS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_scans)
                .clamp(1, MAX_CONCURRENT_SCANS),
            venue_timeout_ms: env::var("VENUE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.venue_timeout_ms)
                .max(100),
            max_results: env::var("MAX_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_results)
                .max(1),
            ..defaults
        }
    }

    /// Minimum pool liquidity in USD for a venue family. Stable-swap pegs
    /// only hold near the peg with deep reserves, so their floor is an order
    /// of magnitude above constant-product.
    pub fn liquidity_floor(&self, family: PoolFamily) -> Decimal {
        match family {
            PoolFamily::ConstantProduct => self.floor_constant_product,
            PoolFamily::ConcentratedLiquidity => self.floor_concentrated,
            PoolFamily::WeightedPool => self.floor_weighted,
            PoolFamily::StableSwap => self.floor_stable,
        }
    }
}
