//! Net profit breakdown types

use rust_decimal::Decimal;
use serde::Serialize;

/// Cost inputs for a net-profit calculation. Rate fields apply to the
/// buy-side notional; fixed fields are in reference currency.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeCosts {
    pub gas_fee: Decimal,
    pub protocol_fee_rate: Decimal,
    pub slippage_rate: Decimal,
    pub bridge_fee: Decimal,
}

/// Itemized profitability breakdown for one candidate trade.
#[derive(Debug, Clone, Serialize)]
pub struct NetProfitAnalysis {
    pub gross_profit: Decimal,
    pub gas_fee: Decimal,
    pub protocol_fee: Decimal,
    pub slippage_cost: Decimal,
    pub bridge_fee: Decimal,
    pub total_costs: Decimal,
    pub net_profit: Decimal,
    /// Net profit as a percentage of buy-side notional.
    pub net_profit_pct: Decimal,
    /// Return on total capital deployed (notional + costs).
    pub roi_pct: Decimal,
    /// Costs as a fraction of gross profit.
    pub cost_ratio: Decimal,
    /// 1 - cost_ratio, clamped to [0, 1].
    pub efficiency: Decimal,
    pub is_profitable: bool,
    /// Profit sub-score used by the composite ranking, clamp01(net% / 5).
    pub score: Decimal,
}
