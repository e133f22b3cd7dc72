//! Spread, verdict, and report types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    LiquidityReport, NetProfitAnalysis, Opportunity, PriceImpactResult, RiskAssessment,
};
use crate::config::AnalysisConfig;
use crate::feeds::{GasEstimate, GasStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpreadDirection {
    /// Buy at A (lower), sell at B (higher).
    AToB,
    /// Buy at B (lower), sell at A (higher).
    BToA,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpreadResult {
    pub absolute: Decimal,
    /// Spread relative to the lower (buy-side) price, in percent.
    pub relative_pct: Decimal,
    pub direction: SpreadDirection,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    ExecuteImmediately,
    ExecuteWithMonitoring,
    ExecuteWithCaution,
    DoNotExecute,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Recommendation::ExecuteImmediately => "EXECUTE_IMMEDIATELY",
            Recommendation::ExecuteWithMonitoring => "EXECUTE_WITH_MONITORING",
            Recommendation::ExecuteWithCaution => "EXECUTE_WITH_CAUTION",
            Recommendation::DoNotExecute => "DO_NOT_EXECUTE",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionStep {
    pub sequence: u32,
    pub action: String,
    pub venue: String,
    pub network: String,
    pub estimated_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
    pub steps: Vec<ExecutionStep>,
    pub total_estimated_ms: u64,
    pub max_gas_cost_usd: Decimal,
}

/// Composite verdict for one analyzed opportunity.
#[derive(Debug, Clone, Serialize)]
pub struct FinalAssessment {
    pub composite_score: Decimal,
    pub profit_score: Decimal,
    pub liquidity_score: Decimal,
    pub risk_score: Decimal,
    pub gas_score: Decimal,
    pub executable: bool,
    pub recommendation: Recommendation,
    pub critical_factors: Vec<String>,
    pub execution_plan: Option<ExecutionPlan>,
    pub alternatives: Vec<String>,
}

/// Full breakdown returned by `analyze_opportunity`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub id: String,
    pub token: String,
    pub trade_amount: Decimal,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub spread: SpreadResult,
    pub buy_impact: PriceImpactResult,
    pub sell_impact: PriceImpactResult,
    pub buy_liquidity: LiquidityReport,
    pub sell_liquidity: LiquidityReport,
    pub gas: GasEstimate,
    pub profit: NetProfitAnalysis,
    pub risk: RiskAssessment,
    pub gas_strategy: Option<GasStrategy>,
    pub assessment: FinalAssessment,
}

/// One captured per-venue or per-token failure; never fatal to the cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub token: String,
    pub venue: Option<String>,
    pub stage: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub tokens_scanned: usize,
    pub venues_queried: usize,
    pub quotes_fetched: usize,
    pub opportunities_found: usize,
    pub failures: Vec<ScanFailure>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub summary: ScanSummary,
    pub opportunities: Vec<Opportunity>,
    pub recommendations: Vec<String>,
}

/// What-if variant applied to one analysis run. Every override is applied to
/// a cloned config/input, never to shared state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scenario {
    pub name: String,
    pub amount_factor: Option<Decimal>,
    pub gas_multiplier: Option<Decimal>,
    pub slippage_override: Option<Decimal>,
    pub min_spread_override: Option<Decimal>,
    pub volatility_override: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub trade_amount: Decimal,
    pub net_profit: Decimal,
    pub composite_score: Decimal,
    pub executable: bool,
    pub risk_level: super::RiskLevel,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub outcomes: Vec<ScenarioOutcome>,
    pub best_scenario: Option<String>,
    pub risk_notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineMetricsSnapshot {
    pub analyses_run: u64,
    pub scans_run: u64,
    pub opportunities_found: u64,
    pub failures_recorded: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Observability snapshot; nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub config: AnalysisConfig,
    pub metrics: EngineMetricsSnapshot,
    pub cache: CacheStats,
}
