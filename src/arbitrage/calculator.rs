//! Spread and net-profit calculation

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::config::AnalysisConfig;
use crate::errors::{EngineError, EngineResult};
use crate::types::{NetProfitAnalysis, SpreadDirection, SpreadResult, TradeCosts};
use crate::utils::clamp01;

/// Two-price spread. Relative spread is measured against the lower (buy-side)
/// price, so swapping the arguments flips only the direction.
pub fn calculate_spread(
    price_a: Decimal,
    price_b: Decimal,
    config: &AnalysisConfig,
) -> EngineResult<SpreadResult> {
    if price_a <= Decimal::ZERO || price_b <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "price".to_string(),
            reason: format!("non-positive price: a={price_a}, b={price_b}"),
        });
    }

    let absolute = (price_a - price_b).abs();
    let lower = price_a.min(price_b);
    let relative_pct = (absolute / lower) * dec!(100);
    let direction = if price_a <= price_b {
        SpreadDirection::AToB
    } else {
        SpreadDirection::BToA
    };

    Ok(SpreadResult {
        absolute,
        relative_pct,
        direction,
        is_valid: relative_pct >= config.min_spread_pct,
    })
}

/// Cost-adjusted profit for buying `amount` at `buy_price` and selling at
/// `sell_price`. Rate costs apply to the buy-side notional.
pub fn calculate_net_profit(
    buy_price: Decimal,
    sell_price: Decimal,
    amount: Decimal,
    costs: &TradeCosts,
) -> EngineResult<NetProfitAnalysis> {
    if buy_price <= Decimal::ZERO || sell_price <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "price".to_string(),
            reason: format!("non-positive price: buy={buy_price}, sell={sell_price}"),
        });
    }
    if amount <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "amount".to_string(),
            reason: format!("non-positive amount: {amount}"),
        });
    }

    let notional = amount * buy_price;
    let gross_profit = (sell_price - buy_price) * amount;
    let protocol_fee = costs.protocol_fee_rate * notional;
    let slippage_cost = costs.slippage_rate * notional;
    let total_costs = costs.gas_fee + protocol_fee + slippage_cost + costs.bridge_fee;
    let net_profit = gross_profit - total_costs;

    let net_profit_pct = (net_profit / notional) * dec!(100);
    let roi_pct = (net_profit / (notional + total_costs)) * dec!(100);
    let cost_ratio = if gross_profit > Decimal::ZERO {
        total_costs / gross_profit
    } else {
        Decimal::ONE
    };
    let efficiency = clamp01(Decimal::ONE - cost_ratio);

    Ok(NetProfitAnalysis {
        gross_profit,
        gas_fee: costs.gas_fee,
        protocol_fee,
        slippage_cost,
        bridge_fee: costs.bridge_fee,
        total_costs,
        net_profit,
        net_profit_pct,
        roi_pct,
        cost_ratio,
        efficiency,
        is_profitable: net_profit > Decimal::ZERO,
        score: clamp01(net_profit_pct / dec!(5)),
    })
}
