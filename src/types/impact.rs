//! AMM execution result types

use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of simulating a trade against one pool snapshot.
///
/// `price_impact` measures execution degradation against spot with the venue
/// fee excluded; `slippage` is the same ratio with the fee included.
#[derive(Debug, Clone, Serialize)]
pub struct PriceImpactResult {
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    /// Spot output-per-input before the trade.
    pub price_before: Decimal,
    /// Spot output-per-input after the trade settles.
    pub price_after: Decimal,
    pub price_impact: Decimal,
    pub slippage: Decimal,
    /// Realized output-per-input on the fee-adjusted amount.
    pub effective_price: Decimal,
    pub is_acceptable: bool,
}
