//! Risk assessment types

use rust_decimal::Decimal;
use serde::Serialize;

/// Raw signals feeding the risk scorer.
#[derive(Debug, Clone, Serialize)]
pub struct RiskFactors {
    /// Recent price volatility as a fraction (0.02 = 2%).
    pub volatility: Decimal,
    pub liquidity_usd: Decimal,
    /// Expected slippage as a fraction.
    pub slippage: Decimal,
    pub execution_time_ms: u64,
    pub gas_price_gwei: Decimal,
    /// Network congestion in [0, 100].
    pub congestion_pct: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskAction {
    Execute,
    ExecuteWithCaution,
    Monitor,
    Avoid,
}

/// Weighted composite of six normalized risk signals.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub volatility_score: Decimal,
    pub liquidity_score: Decimal,
    pub slippage_score: Decimal,
    pub execution_time_score: Decimal,
    pub gas_score: Decimal,
    pub congestion_score: Decimal,
    /// Weighted sum, always in [0, 1].
    pub total_score: Decimal,
    pub level: RiskLevel,
    pub is_acceptable: bool,
    pub recommended_action: RiskAction,
}
