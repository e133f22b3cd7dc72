//! Liquidity validation
//!
//! Wraps the AMM model set with depth analysis, per-family minimum-liquidity
//! floors, and a liquidity-risk score. Every failed check contributes a fixed
//! score; the report carries ordered remediation hints instead of failing the
//! pipeline.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::amm;
use crate::config::AnalysisConfig;
use crate::errors::EngineResult;
use crate::types::{
    DepthClass, LiquidityMetrics, LiquidityReport, LiquidityRisk, LiquidityRiskLevel, PoolState,
    PriceQuote,
};
use crate::utils::{clamp01, pct_of};

// Fixed contribution of each detected risk to the total score
const SCORE_INSUFFICIENT_LIQUIDITY: Decimal = dec!(0.40);
const SCORE_CRITICAL_DEPTH: Decimal = dec!(0.30);
const SCORE_EXCESSIVE_IMPACT: Decimal = dec!(0.20);
const SCORE_LOW_UTILIZATION: Decimal = dec!(0.10);

const LOW_UTILIZATION_RATIO: Decimal = dec!(0.1);

fn classify_depth(ratio_pct: Decimal) -> DepthClass {
    if ratio_pct <= dec!(1) {
        DepthClass::Low
    } else if ratio_pct <= dec!(5) {
        DepthClass::Medium
    } else if ratio_pct <= dec!(10) {
        DepthClass::High
    } else {
        DepthClass::Critical
    }
}

fn risk_contribution(risk: LiquidityRisk) -> Decimal {
    match risk {
        LiquidityRisk::InsufficientLiquidity => SCORE_INSUFFICIENT_LIQUIDITY,
        LiquidityRisk::CriticalDepth => SCORE_CRITICAL_DEPTH,
        LiquidityRisk::ExcessiveImpact => SCORE_EXCESSIVE_IMPACT,
        LiquidityRisk::LowUtilization => SCORE_LOW_UTILIZATION,
    }
}

/// Validate that a pool can absorb `amount` without unacceptable execution
/// quality. A range-exhausted concentrated pool propagates its error; all
/// other shortfalls land in the report.
pub fn validate_liquidity(
    pool: &PoolState,
    quote: &PriceQuote,
    amount: Decimal,
    config: &AnalysisConfig,
) -> EngineResult<LiquidityReport> {
    let impact = amm::price_impact(pool, amount, config)?;

    let total_liquidity_usd = quote.liquidity_usd;
    let utilization_ratio = if total_liquidity_usd > Decimal::ZERO {
        pool.volume_24h_usd / total_liquidity_usd
    } else {
        Decimal::ZERO
    };

    let depth_ratio_pct = pct_of(amount, pool.primary_reserve());
    let depth = classify_depth(depth_ratio_pct);
    let floor = config.liquidity_floor(pool.family());

    let mut risks = Vec::new();
    if total_liquidity_usd < floor {
        risks.push(LiquidityRisk::InsufficientLiquidity);
    }
    if depth == DepthClass::Critical {
        risks.push(LiquidityRisk::CriticalDepth);
    }
    if !impact.is_acceptable {
        risks.push(LiquidityRisk::ExcessiveImpact);
    }
    if utilization_ratio < LOW_UTILIZATION_RATIO {
        risks.push(LiquidityRisk::LowUtilization);
    }

    let risk_score = clamp01(risks.iter().map(|r| risk_contribution(*r)).sum());
    let risk_level = if risk_score < dec!(0.3) {
        LiquidityRiskLevel::Low
    } else if risk_score < dec!(0.6) {
        LiquidityRiskLevel::Medium
    } else {
        LiquidityRiskLevel::High
    };

    let is_valid =
        impact.is_acceptable && depth != DepthClass::Critical && risk_level != LiquidityRiskLevel::High;

    // most severe hint first
    let mut recommendations = Vec::new();
    if depth == DepthClass::Critical || risks.contains(&LiquidityRisk::InsufficientLiquidity) {
        recommendations.push(format!(
            "avoid trading {amount} against {}: pool cannot absorb it",
            pool.venue
        ));
    }
    if depth == DepthClass::High {
        recommendations.push("split the trade across venues".to_string());
    }
    if !impact.is_acceptable || depth == DepthClass::Medium {
        recommendations.push(format!(
            "reduce trade size below {}% of the pool reserve",
            dec!(1)
        ));
    }

    Ok(LiquidityReport {
        venue: pool.venue.clone(),
        metrics: LiquidityMetrics {
            total_liquidity_usd,
            utilization_ratio,
        },
        impact,
        depth,
        depth_ratio_pct,
        risks,
        risk_score,
        risk_level,
        is_valid,
        recommendations,
    })
}
