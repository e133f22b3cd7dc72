//! Demo harness: wires an in-memory feed and gas estimator into the engine
//! and runs a few scan-and-analyze cycles against jittered venue prices.

use anyhow::Result;
use arb_analysis_engine::*;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::info;

use arb_analysis_engine::feeds::{
    ExecutionConstraints, GasEstimate, GasEstimator, GasStrategy, PlannedOperation, PriceFeed,
};

/// In-memory feed with per-venue price offsets plus a small random jitter,
/// so consecutive cycles see shifting spreads.
struct SyntheticFeed;

fn venue_profile(venue: &str) -> (Decimal, Decimal, Decimal) {
    // (price offset, fee rate, reliability)
    match venue {
        "uniswap-v3" => (dec!(0), dec!(0.003), dec!(0.97)),
        "sushiswap" => (dec!(14), dec!(0.003), dec!(0.93)),
        "quickswap" => (dec!(31), dec!(0.003), dec!(0.90)),
        "curve" => (dec!(6), dec!(0.0004), dec!(0.96)),
        _ => (dec!(0), dec!(0.003), dec!(0.85)),
    }
}

fn base_price(symbol: &str) -> Decimal {
    match symbol {
        "WETH" => dec!(2400),
        "WBTC" => dec!(64000),
        _ => dec!(1),
    }
}

fn jitter() -> Decimal {
    // +-0.4% around the venue price
    let raw = (rand::random::<f64>() - 0.5) * 0.008;
    Decimal::from_f64(raw).unwrap_or(Decimal::ZERO) + Decimal::ONE
}

#[async_trait]
impl PriceFeed for SyntheticFeed {
    async fn get_quotes(&self, token: &Token, venues: &[VenueRef]) -> Result<Vec<PriceQuote>> {
        let mut quotes = Vec::with_capacity(venues.len());
        for venue in venues {
            let (offset, fee_rate, reliability) = venue_profile(&venue.name);
            quotes.push(PriceQuote {
                venue: venue.name.clone(),
                network: venue.network.clone(),
                token: token.symbol.clone(),
                price: (base_price(&token.symbol) + offset) * jitter(),
                fee_rate,
                reliability,
                liquidity_usd: dec!(3000000),
                observed_at: Utc::now(),
            });
        }
        Ok(quotes)
    }

    async fn get_pool_state(&self, venue: &VenueRef, _token: &Token) -> Result<PoolState> {
        let params = match venue.name.as_str() {
            "uniswap-v3" => PoolParams::Concentrated {
                liquidity_per_tick: dec!(40000),
                current_tick: 100,
                tick_lower: -5000,
                tick_upper: 5000,
                tick_spacing: 10,
            },
            "curve" => PoolParams::Stable {
                reserves: vec![dec!(4000000), dec!(4000000)],
                amplification: dec!(200),
            },
            _ => PoolParams::ConstantProduct {
                reserve_in: dec!(1500000),
                reserve_out: dec!(3000000),
            },
        };
        let (_, fee_rate, _) = venue_profile(&venue.name);
        Ok(PoolState {
            venue: venue.name.clone(),
            network: venue.network.clone(),
            params,
            fee_rate,
            volume_24h_usd: dec!(900000),
            observed_at: Utc::now(),
        })
    }
}

struct FlatGasEstimator;

#[async_trait]
impl GasEstimator for FlatGasEstimator {
    async fn estimate(&self, operations: &[PlannedOperation]) -> Result<GasEstimate> {
        Ok(GasEstimate {
            total_cost_usd: dec!(1.8) * Decimal::from(operations.len()),
            max_confirmation_secs: 45,
            gas_price_gwei: dec!(42),
        })
    }

    async fn optimize_strategy(
        &self,
        expected_profit_usd: Decimal,
        _operations: &[PlannedOperation],
        _constraints: &ExecutionConstraints,
    ) -> Result<GasStrategy> {
        Ok(GasStrategy {
            max_fee_gwei: dec!(55),
            priority_fee_gwei: dec!(2),
            expected_cost_usd: dec!(4.2),
            rationale: format!("standard priority for ${expected_profit_usd:.2} expected profit"),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    let config = AnalysisConfig::from_env();

    info!("🔎 Arbitrage Analysis Engine v0.3.0 - demo harness");
    info!("📋 Configuration:");
    info!("   Min Spread: {}%", config.min_spread_pct);
    info!("   Min Net Profit: {}%", config.min_net_profit_pct);
    info!("   Max Price Impact: {}%", config.max_price_impact * dec!(100));
    info!("   Quote Freshness: {}s", config.quote_freshness_secs);
    info!("   Cache TTL: {}s", config.cache_ttl_secs);

    let venues = vec![
        VenueRef::new("uniswap-v3", "ethereum"),
        VenueRef::new("sushiswap", "ethereum"),
        VenueRef::new("curve", "ethereum"),
        VenueRef::new("quickswap", "polygon"),
    ];
    let tokens = vec![Token::new("WETH", "ethereum", 18), Token::new("WBTC", "ethereum", 8)];

    let engine = AnalysisEngine::new(
        Arc::new(SyntheticFeed),
        Arc::new(FlatGasEstimator),
        venues,
        config,
    );

    let params = ScanParams {
        trade_amount: dec!(5),
        max_results: Some(10),
        concurrent: true,
    };

    let start_time = Instant::now();
    let mut cycles = 0u64;
    let mut opportunities_found = 0u64;
    let mut executable_found = 0u64;

    info!("\n🚀 Starting scan cycles...\n");
    let mut interval = time::interval(Duration::from_secs(2));

    for _ in 0..5 {
        interval.tick().await;
        cycles += 1;

        let report = engine.scan_and_analyze(&tokens, &params).await;
        utils::print_scan_report(&report);
        opportunities_found += report.opportunities.len() as u64;

        // full pipeline on the top-ranked candidate
        if let Some(top) = report.opportunities.first() {
            utils::print_opportunity(top);
            let token = tokens
                .iter()
                .find(|t| t.symbol == top.token)
                .cloned()
                .unwrap_or_else(|| Token::new(top.token.clone(), top.buy.network.clone(), 18));
            let input = OpportunityInput {
                token,
                buy: top.buy.clone(),
                sell: top.sell.clone(),
            };
            match engine.analyze_opportunity(&input, params.trade_amount, None).await {
                Ok(analysis) => {
                    utils::print_analysis_report(&analysis);
                    if analysis.assessment.executable {
                        executable_found += 1;
                    }

                    let scenarios = vec![
                        Scenario {
                            name: "baseline".to_string(),
                            ..Scenario::default()
                        },
                        Scenario {
                            name: "half-size".to_string(),
                            amount_factor: Some(dec!(0.5)),
                            ..Scenario::default()
                        },
                        Scenario {
                            name: "gas-spike".to_string(),
                            gas_multiplier: Some(dec!(3)),
                            ..Scenario::default()
                        },
                    ];
                    let simulated = engine
                        .simulate_scenarios(&input, params.trade_amount, &scenarios)
                        .await;
                    for note in &simulated.risk_notes {
                        info!("   🧪 {}", note);
                    }
                }
                Err(e) => info!("   analysis failed: {e}"),
            }
        }
    }

    let stats = engine.engine_stats().await;
    info!(
        "⚙️  Engine: {} analyses, {} scans, cache {}/{} hit/miss",
        stats.metrics.analyses_run, stats.metrics.scans_run, stats.cache.hits, stats.cache.misses
    );
    info!("📄 Stats snapshot: {}", serde_json::to_string(&stats)?);
    utils::print_session_stats(start_time, cycles, opportunities_found, executable_found);

    Ok(())
}
