//! Liquidity validation types

use rust_decimal::Decimal;
use serde::Serialize;

use super::PriceImpactResult;

#[derive(Debug, Clone, Serialize)]
pub struct LiquidityMetrics {
    pub total_liquidity_usd: Decimal,
    /// 24h volume over available liquidity.
    pub utilization_ratio: Decimal,
}

/// Trade size as a share of the pool's input-side reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepthClass {
    Low,      // <= 1%
    Medium,   // <= 5%
    High,     // <= 10%
    Critical, // > 10%
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiquidityRisk {
    InsufficientLiquidity,
    CriticalDepth,
    ExcessiveImpact,
    LowUtilization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiquidityRiskLevel {
    Low,
    Medium,
    High,
}

/// Full output of the liquidity validator for one venue leg.
#[derive(Debug, Clone, Serialize)]
pub struct LiquidityReport {
    pub venue: String,
    pub metrics: LiquidityMetrics,
    pub impact: PriceImpactResult,
    pub depth: DepthClass,
    pub depth_ratio_pct: Decimal,
    pub risks: Vec<LiquidityRisk>,
    pub risk_score: Decimal,
    pub risk_level: LiquidityRiskLevel,
    pub is_valid: bool,
    /// Remediation hints, most severe first.
    pub recommendations: Vec<String>,
}
