//! Arbitrage opportunity types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{NetProfitAnalysis, PriceQuote, RiskLevel, SpreadResult, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpportunityKind {
    Simple,
    Triangular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplexityTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionUrgency {
    Fast,
    Normal,
    Cautious,
}

/// One hop of a triangular route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteLeg {
    pub venue: String,
    pub network: String,
    pub pair: String,
    pub rate: Decimal,
    pub fee_rate: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpportunityValidation {
    pub liquidity_adequate: bool,
    pub executable: bool,
    pub estimated_execution_ms: u64,
}

/// Input contract for a single opportunity analysis: the token and the two
/// venue legs to evaluate.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityInput {
    pub token: Token,
    pub buy: PriceQuote,
    pub sell: PriceQuote,
}

/// A ranked candidate produced by one scan cycle. Read-only after creation;
/// a new scan produces new instances.
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: OpportunityKind,
    pub token: String,
    pub buy: PriceQuote,
    pub sell: PriceQuote,
    /// Populated for triangular routes only.
    pub route: Option<Vec<RouteLeg>>,
    pub spread: SpreadResult,
    pub profit: NetProfitAnalysis,
    pub cross_chain: bool,
    pub complexity: ComplexityTier,
    pub rank: u32,
    pub composite_score: Decimal,
    pub risk_level: RiskLevel,
    pub validation: OpportunityValidation,
    /// Min of both venues' reliability scores.
    pub confidence: Decimal,
    pub urgency: ExecutionUrgency,
    pub tags: Vec<String>,
}
