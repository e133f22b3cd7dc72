//! End-to-end analysis orchestration
//!
//! Sequences the full pipeline for one opportunity: freshness guard, spread,
//! per-leg AMM impact and liquidity validation, gas estimate, net profit,
//! risk score, gas strategy, and the composite executability verdict. Also
//! drives batch scanning and exposes the observability snapshot.

use chrono::Utc;
use futures::StreamExt;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::arbitrage::{calculate_net_profit, calculate_spread};
use crate::config::AnalysisConfig;
use crate::errors::{EngineError, EngineResult};
use crate::feeds::{
    ExecutionConstraints, GasEstimate, GasEstimator, GasStrategy, OperationKind, PlannedOperation,
    PriceFeed,
};
use crate::risk::assess_risk;
use crate::scanner::OpportunityScanner;
use crate::types::{
    AnalysisReport, CacheStats, EngineMetricsSnapshot, EngineStats, ExecutionPlan, ExecutionStep,
    FinalAssessment, LiquidityReport, OpportunityInput, PriceQuote, Recommendation, RiskFactors,
    RiskLevel, ScanFailure, ScanReport, ScanSummary, Token, VenueRef,
};
use crate::utils::clamp01;
use crate::validation::{ensure_live_pool, ensure_live_quote, validate_liquidity};

// Composite verdict weights
const WEIGHT_PROFIT: Decimal = dec!(0.4);
const WEIGHT_LIQUIDITY: Decimal = dec!(0.3);
const WEIGHT_RISK: Decimal = dec!(0.2);
const WEIGHT_GAS: Decimal = dec!(0.1);

/// Batch scan parameters.
#[derive(Debug, Clone)]
pub struct ScanParams {
    pub trade_amount: Decimal,
    pub max_results: Option<usize>,
    /// Fan tokens out concurrently (bounded) or scan them sequentially.
    pub concurrent: bool,
}

#[derive(Default)]
struct EngineMetrics {
    analyses_run: AtomicU64,
    scans_run: AtomicU64,
    opportunities_found: AtomicU64,
    failures_recorded: AtomicU64,
}

impl EngineMetrics {
    fn snapshot(&self) -> EngineMetricsSnapshot {
        EngineMetricsSnapshot {
            analyses_run: self.analyses_run.load(Ordering::Relaxed),
            scans_run: self.scans_run.load(Ordering::Relaxed),
            opportunities_found: self.opportunities_found.load(Ordering::Relaxed),
            failures_recorded: self.failures_recorded.load(Ordering::Relaxed),
        }
    }
}

pub struct AnalysisEngine {
    feed: Arc<dyn PriceFeed>,
    gas_estimator: Arc<dyn GasEstimator>,
    scanner: OpportunityScanner,
    config: AnalysisConfig,
    metrics: EngineMetrics,
}

impl AnalysisEngine {
    pub fn new(
        feed: Arc<dyn PriceFeed>,
        gas_estimator: Arc<dyn GasEstimator>,
        venues: Vec<VenueRef>,
        config: AnalysisConfig,
    ) -> Self {
        let scanner = OpportunityScanner::new(
            Arc::clone(&feed),
            venues,
            Duration::from_secs(config.cache_ttl_secs),
        );
        Self {
            feed,
            gas_estimator,
            scanner,
            config,
            metrics: EngineMetrics::default(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn scanner(&self) -> &OpportunityScanner {
        &self.scanner
    }

    /// Analyze one opportunity with the engine's base configuration.
    pub async fn analyze_opportunity(
        &self,
        input: &OpportunityInput,
        trade_amount: Decimal,
        constraints: Option<&ExecutionConstraints>,
    ) -> EngineResult<AnalysisReport> {
        self.analyze_with_config(input, trade_amount, constraints, &self.config)
            .await
    }

    /// Analyze one opportunity under an explicit configuration. Scenario
    /// simulation calls this with per-scenario config clones.
    pub async fn analyze_with_config(
        &self,
        input: &OpportunityInput,
        trade_amount: Decimal,
        constraints: Option<&ExecutionConstraints>,
        config: &AnalysisConfig,
    ) -> EngineResult<AnalysisReport> {
        let started = Instant::now();
        let started_at = Utc::now();
        self.metrics.analyses_run.fetch_add(1, Ordering::Relaxed);

        if trade_amount <= Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "trade_amount".to_string(),
                reason: format!("non-positive amount: {trade_amount}"),
            });
        }

        // Freshness guard runs before any calculation
        ensure_live_quote(&input.buy, started_at, config)?;
        ensure_live_quote(&input.sell, started_at, config)?;

        let mut critical_factors = Vec::new();

        let spread = calculate_spread(input.buy.price, input.sell.price, config)?;
        if !spread.is_valid {
            critical_factors.push(format!(
                "spread {:.4}% below the {:.2}% minimum",
                spread.relative_pct, config.min_spread_pct
            ));
        }

        let buy_liquidity = self
            .leg_liquidity(&input.token, &input.buy, trade_amount, config)
            .await?;
        let sell_liquidity = self
            .leg_liquidity(&input.token, &input.sell, trade_amount, config)
            .await?;

        for report in [&buy_liquidity, &sell_liquidity] {
            if !report.impact.is_acceptable {
                critical_factors.push(format!(
                    "price impact {:.2}% at {} exceeds {:.2}%",
                    report.impact.price_impact * dec!(100),
                    report.venue,
                    config.max_price_impact * dec!(100)
                ));
            }
            if !report.is_valid {
                critical_factors.push(format!("liquidity validation failed at {}", report.venue));
            }
        }

        let cross_chain = input.buy.is_cross_chain_with(&input.sell);
        let operations = planned_operations(&input.buy, &input.sell, cross_chain);

        let gas = match self.estimate_gas(&operations, config).await {
            Ok(mut estimate) => {
                estimate.total_cost_usd *= config.gas_cost_multiplier;
                estimate
            }
            Err(e) => {
                warn!("gas estimate unavailable ({e}); falling back to configured default");
                critical_factors
                    .push("gas estimate unavailable; configured default used".to_string());
                GasEstimate {
                    total_cost_usd: config.default_gas_cost_usd * config.gas_cost_multiplier,
                    max_confirmation_secs: config.max_execution_time_ms / 1000,
                    gas_price_gwei: config.normal_gas_gwei,
                }
            }
        };

        // fee-exclusive execution degradation; venue fees are itemized separately
        let observed_slippage =
            buy_liquidity.impact.price_impact + sell_liquidity.impact.price_impact;
        let costs = crate::types::TradeCosts {
            gas_fee: gas.total_cost_usd,
            protocol_fee_rate: input.buy.fee_rate + input.sell.fee_rate,
            slippage_rate: observed_slippage,
            bridge_fee: if cross_chain {
                config.bridge_fee_usd
            } else {
                Decimal::ZERO
            },
        };
        let profit =
            calculate_net_profit(input.buy.price, input.sell.price, trade_amount, &costs)?;
        if !profit.is_profitable {
            critical_factors.push(format!("net profit {:.2} is not positive", profit.net_profit));
        }

        let estimated_execution_ms = if cross_chain {
            config.base_execution_ms * 3
        } else {
            config.base_execution_ms
        };
        let risk = assess_risk(
            &RiskFactors {
                volatility: constraints
                    .and_then(|c| c.volatility)
                    .unwrap_or(config.default_volatility),
                liquidity_usd: input.buy.liquidity_usd.min(input.sell.liquidity_usd),
                slippage: observed_slippage,
                execution_time_ms: estimated_execution_ms,
                gas_price_gwei: gas.gas_price_gwei,
                congestion_pct: constraints
                    .and_then(|c| c.congestion_pct)
                    .unwrap_or(config.default_congestion_pct),
            },
            config,
        );
        if risk.level == RiskLevel::High || risk.level == RiskLevel::Critical {
            critical_factors.push(format!(
                "composite risk {} ({:.3})",
                risk.level, risk.total_score
            ));
        }

        let gas_strategy = self
            .optimize_gas(profit.net_profit, &operations, constraints, config)
            .await;

        // Composite verdict
        let profit_score = profit.score;
        let liquidity_score = clamp01(
            Decimal::ONE - (buy_liquidity.risk_score + sell_liquidity.risk_score) / dec!(2),
        );
        let risk_score = clamp01(Decimal::ONE - risk.total_score);
        let gas_score = if profit.gross_profit > Decimal::ZERO {
            clamp01(Decimal::ONE - gas.total_cost_usd / profit.gross_profit)
        } else {
            Decimal::ZERO
        };
        let composite_score = clamp01(
            profit_score * WEIGHT_PROFIT
                + liquidity_score * WEIGHT_LIQUIDITY
                + risk_score * WEIGHT_RISK
                + gas_score * WEIGHT_GAS,
        );

        let executable = profit.is_profitable
            && buy_liquidity.is_valid
            && sell_liquidity.is_valid
            && risk.is_acceptable
            && composite_score >= config.min_composite_score;

        let recommendation = if !executable {
            Recommendation::DoNotExecute
        } else if composite_score >= dec!(0.8) && risk.level == RiskLevel::Low {
            Recommendation::ExecuteImmediately
        } else if composite_score >= dec!(0.7) {
            Recommendation::ExecuteWithMonitoring
        } else {
            Recommendation::ExecuteWithCaution
        };

        let execution_plan = executable.then(|| {
            build_execution_plan(&input.buy, &input.sell, cross_chain, &gas, config)
        });

        let mut alternatives = Vec::new();
        if !buy_liquidity.is_valid || !sell_liquidity.is_valid {
            alternatives.push(format!(
                "retry with a trade of {} (half the size)",
                trade_amount / dec!(2)
            ));
            alternatives.push("split the order across additional venues".to_string());
        }
        if !risk.is_acceptable {
            alternatives.push("monitor until volatility or congestion subsides".to_string());
        }
        if executable && recommendation == Recommendation::ExecuteWithCaution {
            alternatives.push("stage the trade in smaller clips".to_string());
        }

        let report = AnalysisReport {
            id: uuid::Uuid::new_v4().to_string(),
            token: input.token.symbol.clone(),
            trade_amount,
            started_at,
            duration_ms: started.elapsed().as_millis() as u64,
            spread,
            buy_impact: buy_liquidity.impact.clone(),
            sell_impact: sell_liquidity.impact.clone(),
            buy_liquidity,
            sell_liquidity,
            gas,
            profit,
            risk,
            gas_strategy,
            assessment: FinalAssessment {
                composite_score,
                profit_score,
                liquidity_score,
                risk_score,
                gas_score,
                executable,
                recommendation,
                critical_factors,
                execution_plan,
                alternatives,
            },
        };
        debug!(
            "analysis {} finished in {}ms: {}",
            report.id, report.duration_ms, report.assessment.recommendation
        );
        Ok(report)
    }

    /// Batch entry point: scan every token, merge and rank the survivors.
    /// A failing token contributes a failure row, never aborts the batch.
    pub async fn scan_and_analyze(&self, tokens: &[Token], params: &ScanParams) -> ScanReport {
        let started = Instant::now();
        self.metrics.scans_run.fetch_add(1, Ordering::Relaxed);

        let scans = if params.concurrent {
            futures::stream::iter(tokens.iter().map(|token| {
                let config = &self.config;
                async move { self.scanner.scan_token(token, params.trade_amount, config).await }
            }))
            .buffer_unordered(self.config.max_concurrent_scans)
            .collect::<Vec<_>>()
            .await
        } else {
            let mut out = Vec::with_capacity(tokens.len());
            for token in tokens {
                out.push(
                    self.scanner
                        .scan_token(token, params.trade_amount, &self.config)
                        .await,
                );
            }
            out
        };

        let mut opportunities = Vec::new();
        let mut failures: Vec<ScanFailure> = Vec::new();
        let mut quotes_fetched = 0;
        for scan in scans {
            quotes_fetched += scan.quotes_fetched;
            failures.extend(scan.failures);
            opportunities.extend(scan.opportunities);
        }

        let max_results = params.max_results.unwrap_or(self.config.max_results);
        crate::scanner::rank_opportunities(&mut opportunities, max_results);

        self.metrics
            .opportunities_found
            .fetch_add(opportunities.len() as u64, Ordering::Relaxed);
        self.metrics
            .failures_recorded
            .fetch_add(failures.len() as u64, Ordering::Relaxed);

        let recommendations = batch_recommendations(&opportunities, &failures);

        ScanReport {
            summary: ScanSummary {
                tokens_scanned: tokens.len(),
                venues_queried: self.scanner.venues().len(),
                quotes_fetched,
                opportunities_found: opportunities.len(),
                failures,
                duration_ms: started.elapsed().as_millis() as u64,
            },
            opportunities,
            recommendations,
        }
    }

    /// Observability snapshot; counters and cache stats only, nothing persisted.
    pub async fn engine_stats(&self) -> EngineStats {
        let cache: CacheStats = self.scanner.cache_stats().await;
        EngineStats {
            config: self.config.clone(),
            metrics: self.metrics.snapshot(),
            cache,
        }
    }

    async fn leg_liquidity(
        &self,
        token: &Token,
        quote: &PriceQuote,
        trade_amount: Decimal,
        config: &AnalysisConfig,
    ) -> EngineResult<LiquidityReport> {
        let venue = VenueRef::new(quote.venue.clone(), quote.network.clone());
        let pool = timeout(
            Duration::from_millis(config.venue_timeout_ms),
            self.feed.get_pool_state(&venue, token),
        )
        .await
        .map_err(|_| EngineError::CollaboratorTimeout {
            collaborator: format!("price feed ({})", quote.venue),
            timeout_ms: config.venue_timeout_ms,
        })?
        .map_err(|e| EngineError::Feed {
            venue: quote.venue.clone(),
            message: e.to_string(),
        })?;

        ensure_live_pool(&pool, Utc::now(), config)?;
        validate_liquidity(&pool, quote, trade_amount, config)
    }

    async fn estimate_gas(
        &self,
        operations: &[PlannedOperation],
        config: &AnalysisConfig,
    ) -> EngineResult<GasEstimate> {
        timeout(
            Duration::from_millis(config.gas_timeout_ms),
            self.gas_estimator.estimate(operations),
        )
        .await
        .map_err(|_| EngineError::CollaboratorTimeout {
            collaborator: "gas estimator".to_string(),
            timeout_ms: config.gas_timeout_ms,
        })?
        .map_err(|e| EngineError::Feed {
            venue: "gas estimator".to_string(),
            message: e.to_string(),
        })
    }

    /// Informational only; a missing strategy never blocks the verdict.
    async fn optimize_gas(
        &self,
        expected_profit: Decimal,
        operations: &[PlannedOperation],
        constraints: Option<&ExecutionConstraints>,
        config: &AnalysisConfig,
    ) -> Option<GasStrategy> {
        let default_constraints = ExecutionConstraints::default();
        let constraints = constraints.unwrap_or(&default_constraints);
        match timeout(
            Duration::from_millis(config.gas_timeout_ms),
            self.gas_estimator
                .optimize_strategy(expected_profit, operations, constraints),
        )
        .await
        {
            Ok(Ok(strategy)) => Some(strategy),
            Ok(Err(e)) => {
                debug!("gas strategy optimization failed: {e}");
                None
            }
            Err(_) => {
                debug!("gas strategy optimization timed out");
                None
            }
        }
    }
}

fn planned_operations(
    buy: &PriceQuote,
    sell: &PriceQuote,
    cross_chain: bool,
) -> Vec<PlannedOperation> {
    let mut operations = vec![PlannedOperation {
        kind: OperationKind::Swap,
        venue: buy.venue.clone(),
        network: buy.network.clone(),
    }];
    if cross_chain {
        operations.push(PlannedOperation {
            kind: OperationKind::Bridge,
            venue: "bridge".to_string(),
            network: sell.network.clone(),
        });
    }
    operations.push(PlannedOperation {
        kind: OperationKind::Swap,
        venue: sell.venue.clone(),
        network: sell.network.clone(),
    });
    operations
}

fn build_execution_plan(
    buy: &PriceQuote,
    sell: &PriceQuote,
    cross_chain: bool,
    gas: &GasEstimate,
    config: &AnalysisConfig,
) -> ExecutionPlan {
    let mut steps = vec![ExecutionStep {
        sequence: 1,
        action: format!("buy on {}", buy.venue),
        venue: buy.venue.clone(),
        network: buy.network.clone(),
        estimated_ms: config.base_execution_ms,
    }];
    if cross_chain {
        steps.push(ExecutionStep {
            sequence: 2,
            action: format!("bridge {} -> {}", buy.network, sell.network),
            venue: "bridge".to_string(),
            network: sell.network.clone(),
            estimated_ms: config.base_execution_ms * 2,
        });
    }
    steps.push(ExecutionStep {
        sequence: steps.len() as u32 + 1,
        action: format!("sell on {}", sell.venue),
        venue: sell.venue.clone(),
        network: sell.network.clone(),
        estimated_ms: config.base_execution_ms,
    });

    let total_estimated_ms = steps.iter().map(|s| s.estimated_ms).sum();
    ExecutionPlan {
        steps,
        total_estimated_ms,
        max_gas_cost_usd: gas.total_cost_usd * dec!(1.25),
    }
}

fn batch_recommendations(
    opportunities: &[crate::types::Opportunity],
    failures: &[ScanFailure],
) -> Vec<String> {
    let mut recommendations = Vec::new();
    match opportunities.first() {
        Some(top) => {
            recommendations.push(format!(
                "top candidate: {} via {} -> {} at {:.2}% net",
                top.token, top.buy.venue, top.sell.venue, top.profit.net_profit_pct
            ));
            if opportunities.iter().any(|o| o.cross_chain) {
                recommendations
                    .push("cross-chain routes present; confirm bridge costs first".to_string());
            }
        }
        None => {
            recommendations
                .push("no opportunities above thresholds; widen venues or lower gates".to_string());
        }
    }
    if !failures.is_empty() {
        recommendations.push(format!(
            "{} venue/token failures this cycle; stale or unreachable feeds reduce coverage",
            failures.len()
        ));
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PoolParams, PoolState, Scenario};
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    struct FixtureFeed {
        buy_price: Decimal,
        sell_price: Decimal,
        quote_age_secs: i64,
    }

    fn fixture_quote(venue: &str, price: Decimal, age_secs: i64) -> PriceQuote {
        PriceQuote {
            venue: venue.to_string(),
            network: "ethereum".to_string(),
            token: "WETH".to_string(),
            price,
            fee_rate: dec!(0.003),
            reliability: dec!(0.95),
            liquidity_usd: dec!(3000000),
            observed_at: Utc::now() - ChronoDuration::seconds(age_secs),
        }
    }

    #[async_trait]
    impl PriceFeed for FixtureFeed {
        async fn get_quotes(
            &self,
            _token: &Token,
            venues: &[VenueRef],
        ) -> anyhow::Result<Vec<PriceQuote>> {
            let venue = &venues[0];
            if venue.name == "broken-venue" {
                anyhow::bail!("feed offline");
            }
            let price = if venue.name == "uniswap-v3" {
                self.buy_price
            } else {
                self.sell_price
            };
            Ok(vec![fixture_quote(&venue.name, price, self.quote_age_secs)])
        }

        async fn get_pool_state(
            &self,
            venue: &VenueRef,
            _token: &Token,
        ) -> anyhow::Result<PoolState> {
            Ok(PoolState {
                venue: venue.name.clone(),
                network: venue.network.clone(),
                params: PoolParams::ConstantProduct {
                    reserve_in: dec!(2000000),
                    reserve_out: dec!(4000000),
                },
                fee_rate: dec!(0.003),
                volume_24h_usd: dec!(800000),
                observed_at: Utc::now(),
            })
        }
    }

    struct FixtureGas {
        fail: bool,
    }

    #[async_trait]
    impl GasEstimator for FixtureGas {
        async fn estimate(&self, _operations: &[PlannedOperation]) -> anyhow::Result<GasEstimate> {
            if self.fail {
                anyhow::bail!("estimator offline");
            }
            Ok(GasEstimate {
                total_cost_usd: dec!(4),
                max_confirmation_secs: 30,
                gas_price_gwei: dec!(40),
            })
        }

        async fn optimize_strategy(
            &self,
            _expected_profit_usd: Decimal,
            _operations: &[PlannedOperation],
            _constraints: &ExecutionConstraints,
        ) -> anyhow::Result<GasStrategy> {
            if self.fail {
                anyhow::bail!("estimator offline");
            }
            Ok(GasStrategy {
                max_fee_gwei: dec!(50),
                priority_fee_gwei: dec!(2),
                expected_cost_usd: dec!(4),
                rationale: "fixture".to_string(),
            })
        }
    }

    fn engine(feed: FixtureFeed, gas_fail: bool) -> AnalysisEngine {
        AnalysisEngine::new(
            Arc::new(feed),
            Arc::new(FixtureGas { fail: gas_fail }),
            vec![
                VenueRef::new("uniswap-v3", "ethereum"),
                VenueRef::new("sushiswap", "ethereum"),
            ],
            AnalysisConfig::default(),
        )
    }

    fn input(buy_price: Decimal, sell_price: Decimal, age_secs: i64) -> OpportunityInput {
        OpportunityInput {
            token: Token::new("WETH", "ethereum", 18),
            buy: fixture_quote("uniswap-v3", buy_price, age_secs),
            sell: fixture_quote("sushiswap", sell_price, age_secs),
        }
    }

    #[tokio::test]
    async fn test_full_pipeline_executes_wide_spread() {
        let engine = engine(
            FixtureFeed {
                buy_price: dec!(2000),
                sell_price: dec!(2080),
                quote_age_secs: 1,
            },
            false,
        );
        let report = engine
            .analyze_opportunity(&input(dec!(2000), dec!(2080), 1), dec!(10), None)
            .await
            .unwrap();

        assert!(report.spread.is_valid);
        assert!(report.profit.is_profitable);
        assert!(report.assessment.executable);
        assert_ne!(report.assessment.recommendation, Recommendation::DoNotExecute);

        let plan = report.assessment.execution_plan.expect("plan for executable verdict");
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].venue, "uniswap-v3");
        assert_eq!(plan.steps[1].venue, "sushiswap");
    }

    #[tokio::test]
    async fn test_stale_input_fails_fast() {
        let engine = engine(
            FixtureFeed {
                buy_price: dec!(2000),
                sell_price: dec!(2080),
                quote_age_secs: 1,
            },
            false,
        );
        let err = engine
            .analyze_opportunity(&input(dec!(2000), dec!(2080), 90), dec!(10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::StaleData { .. }));
    }

    #[tokio::test]
    async fn test_gas_fallback_records_critical_factor() {
        let engine = engine(
            FixtureFeed {
                buy_price: dec!(2000),
                sell_price: dec!(2080),
                quote_age_secs: 1,
            },
            true,
        );
        let report = engine
            .analyze_opportunity(&input(dec!(2000), dec!(2080), 1), dec!(10), None)
            .await
            .unwrap();

        assert_eq!(report.gas.total_cost_usd, AnalysisConfig::default().default_gas_cost_usd);
        assert!(report
            .assessment
            .critical_factors
            .iter()
            .any(|f| f.contains("gas estimate unavailable")));
        assert!(report.gas_strategy.is_none());
    }

    #[tokio::test]
    async fn test_unprofitable_spread_not_executable() {
        let engine = engine(
            FixtureFeed {
                buy_price: dec!(2000),
                sell_price: dec!(2002),
                quote_age_secs: 1,
            },
            false,
        );
        let report = engine
            .analyze_opportunity(&input(dec!(2000), dec!(2002), 1), dec!(10), None)
            .await
            .unwrap();

        assert!(!report.profit.is_profitable);
        assert!(!report.assessment.executable);
        assert_eq!(report.assessment.recommendation, Recommendation::DoNotExecute);
        assert!(report.assessment.execution_plan.is_none());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount() {
        let engine = engine(
            FixtureFeed {
                buy_price: dec!(2000),
                sell_price: dec!(2080),
                quote_age_secs: 1,
            },
            false,
        );
        let err = engine
            .analyze_opportunity(&input(dec!(2000), dec!(2080), 1), dec!(0), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_scan_and_analyze_batches_tokens() {
        let engine = engine(
            FixtureFeed {
                buy_price: dec!(2000),
                sell_price: dec!(2060),
                quote_age_secs: 1,
            },
            false,
        );
        let tokens = vec![
            Token::new("WETH", "ethereum", 18),
            Token::new("WBTC", "ethereum", 8),
        ];
        let report = engine
            .scan_and_analyze(
                &tokens,
                &ScanParams {
                    trade_amount: dec!(5),
                    max_results: Some(5),
                    concurrent: true,
                },
            )
            .await;

        assert_eq!(report.summary.tokens_scanned, 2);
        assert!(report.summary.opportunities_found > 0);
        assert!(!report.recommendations.is_empty());
        for pair in report.opportunities.windows(2) {
            assert!(pair[0].profit.net_profit_pct >= pair[1].profit.net_profit_pct);
        }
    }

    #[tokio::test]
    async fn test_scenarios_pick_most_favorable() {
        let engine = engine(
            FixtureFeed {
                buy_price: dec!(2000),
                sell_price: dec!(2080),
                quote_age_secs: 1,
            },
            false,
        );
        let scenarios = vec![
            Scenario {
                name: "baseline".to_string(),
                ..Scenario::default()
            },
            Scenario {
                name: "gas-spike".to_string(),
                gas_multiplier: Some(dec!(20)),
                ..Scenario::default()
            },
        ];
        let report = engine
            .simulate_scenarios(&input(dec!(2000), dec!(2080), 1), dec!(10), &scenarios)
            .await;

        assert_eq!(report.outcomes.len(), 2);
        let baseline = &report.outcomes[0];
        let spike = &report.outcomes[1];
        assert!(baseline.net_profit > spike.net_profit);
        assert_eq!(report.best_scenario.as_deref(), Some("baseline"));
    }

    #[test]
    fn test_engine_stats_counts_analyses() {
        // sync harness around the async engine
        tokio_test::block_on(async {
            let engine = engine(
                FixtureFeed {
                    buy_price: dec!(2000),
                    sell_price: dec!(2080),
                    quote_age_secs: 1,
                },
                false,
            );
            engine
                .analyze_opportunity(&input(dec!(2000), dec!(2080), 1), dec!(10), None)
                .await
                .unwrap();

            let stats = engine.engine_stats().await;
            assert_eq!(stats.metrics.analyses_run, 1);
            assert_eq!(stats.metrics.scans_run, 0);
        });
    }
}
