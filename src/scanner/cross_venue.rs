//! Cross-venue opportunity scanning
//!
//! One scan cycle per token: fetch quotes venue-by-venue (a failing venue is
//! dropped, never fatal), compare every pair, filter through the spread and
//! profit gates, rank survivors, and enrich them with validation metadata.

use chrono::Utc;
use futures::future::join_all;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::arbitrage::{calculate_net_profit, calculate_spread};
use crate::config::AnalysisConfig;
use crate::feeds::PriceFeed;
use crate::risk::assess_risk;
use crate::scanner::cache::{ScanKey, SnapshotCache};
use crate::types::{
    ComplexityTier, ExecutionUrgency, Opportunity, OpportunityKind, OpportunityValidation,
    PriceQuote, RiskFactors, ScanFailure, SpreadDirection, Token, TradeCosts, VenueRef,
};
use crate::utils::clamp01;
use crate::validation::ensure_live_quote;

/// Result of scanning one token across the configured venues.
#[derive(Debug, Clone)]
pub struct TokenScan {
    pub token: String,
    pub opportunities: Vec<Opportunity>,
    pub failures: Vec<ScanFailure>,
    pub quotes_fetched: usize,
}

pub struct OpportunityScanner {
    feed: Arc<dyn PriceFeed>,
    venues: Vec<VenueRef>,
    cache: SnapshotCache<TokenScan>,
}

impl OpportunityScanner {
    pub fn new(feed: Arc<dyn PriceFeed>, venues: Vec<VenueRef>, cache_ttl: Duration) -> Self {
        Self {
            feed,
            venues,
            cache: SnapshotCache::new(cache_ttl),
        }
    }

    pub fn venues(&self) -> &[VenueRef] {
        &self.venues
    }

    pub async fn cache_stats(&self) -> crate::types::CacheStats {
        self.cache.stats().await
    }

    /// Fetch fresh quotes for a token, one task per venue. Timeouts and feed
    /// errors become per-venue failure rows.
    pub async fn fetch_quotes(
        &self,
        token: &Token,
        config: &AnalysisConfig,
    ) -> (Vec<PriceQuote>, Vec<ScanFailure>) {
        let per_venue = Duration::from_millis(config.venue_timeout_ms);
        let tasks = self.venues.iter().map(|venue| {
            let feed = Arc::clone(&self.feed);
            async move {
                let outcome =
                    timeout(per_venue, feed.get_quotes(token, std::slice::from_ref(venue))).await;
                (venue.clone(), outcome)
            }
        });

        let mut quotes = Vec::new();
        let mut failures = Vec::new();
        let now = Utc::now();

        for (venue, outcome) in join_all(tasks).await {
            match outcome {
                Err(_) => failures.push(ScanFailure {
                    token: token.symbol.clone(),
                    venue: Some(venue.name.clone()),
                    stage: "fetch".to_string(),
                    message: format!("no answer within {}ms", config.venue_timeout_ms),
                }),
                Ok(Err(e)) => failures.push(ScanFailure {
                    token: token.symbol.clone(),
                    venue: Some(venue.name.clone()),
                    stage: "fetch".to_string(),
                    message: e.to_string(),
                }),
                Ok(Ok(venue_quotes)) => {
                    if venue_quotes.is_empty() {
                        failures.push(ScanFailure {
                            token: token.symbol.clone(),
                            venue: Some(venue.name.clone()),
                            stage: "fetch".to_string(),
                            message: "venue returned no quotes".to_string(),
                        });
                        continue;
                    }
                    for quote in venue_quotes {
                        match ensure_live_quote(&quote, now, config) {
                            Ok(()) => quotes.push(quote),
                            Err(e) => failures.push(ScanFailure {
                                token: token.symbol.clone(),
                                venue: Some(quote.venue.clone()),
                                stage: e.stage().to_string(),
                                message: e.to_string(),
                            }),
                        }
                    }
                }
            }
        }

        (quotes, failures)
    }

    /// One full scan cycle for a token, served from the snapshot cache when a
    /// fresh entry exists.
    pub async fn scan_token(
        &self,
        token: &Token,
        trade_amount: Decimal,
        config: &AnalysisConfig,
    ) -> TokenScan {
        let key = ScanKey::new(
            token.symbol.clone(),
            self.venues.iter().map(|v| v.network.clone()).collect(),
        );
        if let Some(cached) = self.cache.get(&key).await {
            debug!("scan cache hit for {}", token.symbol);
            return (*cached).clone();
        }

        let (quotes, mut failures) = self.fetch_quotes(token, config).await;
        let quotes_fetched = quotes.len();

        let mut opportunities = Vec::new();
        for i in 0..quotes.len() {
            for j in (i + 1)..quotes.len() {
                match self.build_candidate(token, &quotes[i], &quotes[j], trade_amount, config) {
                    Ok(Some(opportunity)) => opportunities.push(opportunity),
                    Ok(None) => {}
                    Err(failure) => failures.push(failure),
                }
            }
        }

        rank_opportunities(&mut opportunities, config.max_results);

        let scan = TokenScan {
            token: token.symbol.clone(),
            opportunities,
            failures,
            quotes_fetched,
        };
        self.cache.insert(key, scan.clone()).await;
        scan
    }

    /// Pairwise comparison of two venue quotes into a ranked candidate.
    /// Returns Ok(None) when a gate filters the pair out.
    fn build_candidate(
        &self,
        token: &Token,
        quote_a: &PriceQuote,
        quote_b: &PriceQuote,
        trade_amount: Decimal,
        config: &AnalysisConfig,
    ) -> Result<Option<Opportunity>, ScanFailure> {
        let spread = calculate_spread(quote_a.price, quote_b.price, config).map_err(|e| {
            ScanFailure {
                token: token.symbol.clone(),
                venue: Some(quote_a.venue.clone()),
                stage: e.stage().to_string(),
                message: e.to_string(),
            }
        })?;

        let spread_bps = spread.relative_pct * dec!(100);
        if !spread.is_valid || spread_bps < Decimal::from(config.min_spread_bps) {
            return Ok(None);
        }

        let (buy, sell) = match spread.direction {
            SpreadDirection::AToB => (quote_a, quote_b),
            SpreadDirection::BToA => (quote_b, quote_a),
        };

        let cross_chain = buy.is_cross_chain_with(sell);
        let costs = TradeCosts {
            gas_fee: config.default_gas_cost_usd,
            protocol_fee_rate: buy.fee_rate + sell.fee_rate,
            slippage_rate: config.default_slippage_rate,
            bridge_fee: if cross_chain {
                config.bridge_fee_usd
            } else {
                Decimal::ZERO
            },
        };

        let profit = calculate_net_profit(buy.price, sell.price, trade_amount, &costs)
            .map_err(|e| ScanFailure {
                token: token.symbol.clone(),
                venue: Some(buy.venue.clone()),
                stage: e.stage().to_string(),
                message: e.to_string(),
            })?;

        if !profit.is_profitable || profit.net_profit_pct < config.min_net_profit_pct {
            return Ok(None);
        }

        let complexity = if cross_chain {
            ComplexityTier::Medium
        } else {
            ComplexityTier::Low
        };
        let estimated_execution_ms = estimate_execution_ms(config, cross_chain, complexity);

        let min_liquidity = buy.liquidity_usd.min(sell.liquidity_usd);
        let notional = trade_amount * buy.price;
        let liquidity_adequate =
            min_liquidity >= config.min_liquidity_usd && notional <= min_liquidity * dec!(0.1);

        let risk = assess_risk(
            &RiskFactors {
                volatility: config.default_volatility,
                liquidity_usd: min_liquidity,
                slippage: config.default_slippage_rate,
                execution_time_ms: estimated_execution_ms,
                gas_price_gwei: config.normal_gas_gwei,
                congestion_pct: config.default_congestion_pct,
            },
            config,
        );

        let confidence = buy.reliability.min(sell.reliability);
        let urgency = if spread.relative_pct >= config.min_spread_pct * dec!(3) {
            ExecutionUrgency::Fast
        } else if spread.relative_pct >= config.min_spread_pct * dec!(1.5) {
            ExecutionUrgency::Normal
        } else {
            ExecutionUrgency::Cautious
        };

        let mut tags = Vec::new();
        if cross_chain {
            tags.push("cross-chain".to_string());
        }
        if spread.relative_pct >= config.min_spread_pct * dec!(5) {
            tags.push("high-spread".to_string());
        }
        if !liquidity_adequate {
            tags.push("thin-liquidity".to_string());
        }

        let liquidity_floor_score = clamp01(min_liquidity / config.floor_constant_product);
        let composite_score = clamp01(
            profit.score * dec!(0.5) + liquidity_floor_score * dec!(0.3) + confidence * dec!(0.2),
        );

        Ok(Some(Opportunity {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind: OpportunityKind::Simple,
            token: token.symbol.clone(),
            buy: buy.clone(),
            sell: sell.clone(),
            route: None,
            spread,
            validation: OpportunityValidation {
                liquidity_adequate,
                executable: liquidity_adequate && profit.is_profitable && risk.is_acceptable,
                estimated_execution_ms,
            },
            profit,
            cross_chain,
            complexity,
            rank: 0,
            composite_score,
            risk_level: risk.level,
            confidence,
            urgency,
            tags,
        }))
    }
}

pub(crate) fn estimate_execution_ms(
    config: &AnalysisConfig,
    cross_chain: bool,
    complexity: ComplexityTier,
) -> u64 {
    let mut estimate = config.base_execution_ms;
    if cross_chain {
        estimate *= 3;
    }
    if complexity == ComplexityTier::High {
        estimate *= 2;
    }
    estimate
}

/// Sort descending by net-profit%, assign 1-based ranks, keep the head.
pub fn rank_opportunities(opportunities: &mut Vec<Opportunity>, max_results: usize) {
    opportunities.sort_by(|a, b| {
        b.profit
            .net_profit_pct
            .cmp(&a.profit.net_profit_pct)
            .then(b.composite_score.cmp(&a.composite_score))
    });
    opportunities.truncate(max_results);
    for (index, opportunity) in opportunities.iter_mut().enumerate() {
        opportunity.rank = (index + 1) as u32;
    }
}
