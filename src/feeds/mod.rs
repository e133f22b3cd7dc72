//! External collaborator seams
//!
//! The engine never talks to a venue or a chain directly. Price/liquidity
//! data and gas estimates arrive through these traits; the host service wires
//! real providers, tests and the demo binary wire in-memory ones.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{PoolState, PriceQuote, Token, VenueRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Swap,
    Bridge,
    Transfer,
}

/// One on-chain operation an execution plan would submit.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedOperation {
    pub kind: OperationKind,
    pub venue: String,
    pub network: String,
}

/// Collaborator answer: total cost plus a worst-case confirmation bound.
#[derive(Debug, Clone, Serialize)]
pub struct GasEstimate {
    pub total_cost_usd: Decimal,
    pub max_confirmation_secs: u64,
    pub gas_price_gwei: Decimal,
}

/// Informational gas strategy returned by the optimizer.
#[derive(Debug, Clone, Serialize)]
pub struct GasStrategy {
    pub max_fee_gwei: Decimal,
    pub priority_fee_gwei: Decimal,
    pub expected_cost_usd: Decimal,
    pub rationale: String,
}

/// Caller-supplied execution constraints for an analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionConstraints {
    pub max_execution_time_ms: Option<u64>,
    pub max_gas_cost_usd: Option<Decimal>,
    pub volatility: Option<Decimal>,
    pub congestion_pct: Option<Decimal>,
}

#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Per-venue quotes for one token. A venue the feed cannot answer for may
    /// simply be missing from the result; the caller treats absence as that
    /// venue's failure, not the cycle's.
    async fn get_quotes(&self, token: &Token, venues: &[VenueRef])
        -> anyhow::Result<Vec<PriceQuote>>;

    /// Pool snapshot backing a venue's quote.
    async fn get_pool_state(&self, venue: &VenueRef, token: &Token)
        -> anyhow::Result<PoolState>;
}

#[async_trait]
pub trait GasEstimator: Send + Sync {
    async fn estimate(&self, operations: &[PlannedOperation]) -> anyhow::Result<GasEstimate>;

    async fn optimize_strategy(
        &self,
        expected_profit_usd: Decimal,
        operations: &[PlannedOperation],
        constraints: &ExecutionConstraints,
    ) -> anyhow::Result<GasStrategy>;
}
