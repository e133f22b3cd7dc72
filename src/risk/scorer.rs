//! Composite risk scoring

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::config::AnalysisConfig;
use crate::types::{RiskAction, RiskAssessment, RiskFactors, RiskLevel};
use crate::utils::clamp01;

// Sub-score weights; must sum to 1
const WEIGHT_VOLATILITY: Decimal = dec!(0.25);
const WEIGHT_LIQUIDITY: Decimal = dec!(0.20);
const WEIGHT_SLIPPAGE: Decimal = dec!(0.20);
const WEIGHT_EXECUTION_TIME: Decimal = dec!(0.15);
const WEIGHT_GAS: Decimal = dec!(0.15);
const WEIGHT_CONGESTION: Decimal = dec!(0.05);

// Volatility above 10% saturates its sub-score
const VOLATILITY_CEILING: Decimal = dec!(0.10);

fn classify(total: Decimal) -> RiskLevel {
    if total <= dec!(0.3) {
        RiskLevel::Low
    } else if total <= dec!(0.5) {
        RiskLevel::Medium
    } else if total <= dec!(0.7) {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

fn action_for(level: RiskLevel) -> RiskAction {
    match level {
        RiskLevel::Low => RiskAction::Execute,
        RiskLevel::Medium => RiskAction::ExecuteWithCaution,
        RiskLevel::High => RiskAction::Monitor,
        RiskLevel::Critical => RiskAction::Avoid,
    }
}

/// Normalize six raw signals into [0, 1], weight them, and classify.
pub fn assess_risk(factors: &RiskFactors, config: &AnalysisConfig) -> RiskAssessment {
    let volatility_score = clamp01(factors.volatility / VOLATILITY_CEILING);
    let liquidity_score = clamp01(
        Decimal::ONE
            - if config.min_liquidity_usd > Decimal::ZERO {
                factors.liquidity_usd / config.min_liquidity_usd
            } else {
                Decimal::ONE
            },
    );
    let slippage_score = clamp01(factors.slippage / config.max_slippage);
    let execution_time_score = clamp01(
        Decimal::from(factors.execution_time_ms) / Decimal::from(config.max_execution_time_ms),
    );
    let gas_score = clamp01(factors.gas_price_gwei / (dec!(3) * config.normal_gas_gwei));
    let congestion_score = clamp01(factors.congestion_pct / dec!(100));

    let total_score = clamp01(
        volatility_score * WEIGHT_VOLATILITY
            + liquidity_score * WEIGHT_LIQUIDITY
            + slippage_score * WEIGHT_SLIPPAGE
            + execution_time_score * WEIGHT_EXECUTION_TIME
            + gas_score * WEIGHT_GAS
            + congestion_score * WEIGHT_CONGESTION,
    );

    let level = classify(total_score);

    RiskAssessment {
        volatility_score,
        liquidity_score,
        slippage_score,
        execution_time_score,
        gas_score,
        congestion_score,
        total_score,
        level,
        is_acceptable: total_score <= config.max_risk_score,
        recommended_action: action_for(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors() -> RiskFactors {
        RiskFactors {
            volatility: dec!(0.02),
            liquidity_usd: dec!(500000),
            slippage: dec!(0.002),
            execution_time_ms: 6_000,
            gas_price_gwei: dec!(40),
            congestion_pct: dec!(20),
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = WEIGHT_VOLATILITY
            + WEIGHT_LIQUIDITY
            + WEIGHT_SLIPPAGE
            + WEIGHT_EXECUTION_TIME
            + WEIGHT_GAS
            + WEIGHT_CONGESTION;
        assert_eq!(sum, dec!(1));
    }

    #[test]
    fn test_score_bounds() {
        let config = AnalysisConfig::default();

        let calm = assess_risk(&factors(), &config);
        assert!(calm.total_score >= dec!(0) && calm.total_score <= dec!(1));

        let extreme = RiskFactors {
            volatility: dec!(5),
            liquidity_usd: dec!(0),
            slippage: dec!(1),
            execution_time_ms: 600_000,
            gas_price_gwei: dec!(100000),
            congestion_pct: dec!(1000),
        };
        let stressed = assess_risk(&extreme, &config);
        assert_eq!(stressed.total_score, dec!(1));
        assert_eq!(stressed.level, RiskLevel::Critical);
        assert!(!stressed.is_acceptable);
    }

    #[test]
    fn test_classification_boundaries_exact() {
        assert_eq!(classify(dec!(0.3)), RiskLevel::Low);
        assert_eq!(classify(dec!(0.30001)), RiskLevel::Medium);
        assert_eq!(classify(dec!(0.5)), RiskLevel::Medium);
        assert_eq!(classify(dec!(0.50001)), RiskLevel::High);
        assert_eq!(classify(dec!(0.7)), RiskLevel::High);
        assert_eq!(classify(dec!(0.70001)), RiskLevel::Critical);
    }

    #[test]
    fn test_action_mirrors_level() {
        assert_eq!(action_for(RiskLevel::Low), RiskAction::Execute);
        assert_eq!(action_for(RiskLevel::Medium), RiskAction::ExecuteWithCaution);
        assert_eq!(action_for(RiskLevel::High), RiskAction::Monitor);
        assert_eq!(action_for(RiskLevel::Critical), RiskAction::Avoid);
    }

    #[test]
    fn test_deep_liquidity_zeroes_its_subscore() {
        let config = AnalysisConfig::default();
        let assessment = assess_risk(&factors(), &config);
        // 500k liquidity against a 10k minimum
        assert_eq!(assessment.liquidity_score, dec!(0));
    }

    #[test]
    fn test_acceptability_threshold() {
        let config = AnalysisConfig::default();
        let mut risky = factors();
        risky.volatility = dec!(0.09);
        risky.slippage = dec!(0.009);
        risky.execution_time_ms = 25_000;
        risky.gas_price_gwei = dec!(140);
        risky.congestion_pct = dec!(90);

        let assessment = assess_risk(&risky, &config);
        assert!(assessment.total_score > dec!(0.7));
        assert!(!assessment.is_acceptable);
    }
}
