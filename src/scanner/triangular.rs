//! Triangular route composition
//!
//! A 3-leg route returns to the reference asset: buy the base token at one
//! venue, cross base→intermediate at a second, exit intermediate→reference at
//! a third. The route survives only if the output compounded through all
//! three legs' fees exceeds the input.

use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::arbitrage::{calculate_net_profit, calculate_spread};
use crate::config::AnalysisConfig;
use crate::scanner::cross_venue::{estimate_execution_ms, rank_opportunities, OpportunityScanner, TokenScan};
use crate::types::{
    ComplexityTier, ExecutionUrgency, Opportunity, OpportunityKind, OpportunityValidation,
    PriceQuote, RouteLeg, Token, TradeCosts,
};

/// Multiplier on the input after compounding all three legs.
///
/// Leg rates derive from per-venue quotes: entering the base at venue 1 costs
/// `p_b1`, the venue-2 cross is worth `p_b2 / p_i2` intermediate per base,
/// and the venue-3 exit pays `p_i3` per intermediate.
pub fn route_multiplier(
    base_entry: &PriceQuote,
    base_cross: &PriceQuote,
    inter_cross: &PriceQuote,
    inter_exit: &PriceQuote,
) -> Decimal {
    let fee_factor = (Decimal::ONE - base_entry.fee_rate)
        * (Decimal::ONE - base_cross.fee_rate)
        * (Decimal::ONE - inter_exit.fee_rate);
    fee_factor * (base_cross.price / base_entry.price) * (inter_exit.price / inter_cross.price)
}

/// Compose one triangular candidate, or None when the compounded output does
/// not exceed the input or a downstream gate rejects it.
pub fn compose_route(
    base: &Token,
    base_entry: &PriceQuote,
    base_cross: &PriceQuote,
    inter_cross: &PriceQuote,
    inter_exit: &PriceQuote,
    trade_amount: Decimal,
    config: &AnalysisConfig,
) -> Option<Opportunity> {
    let multiplier = route_multiplier(base_entry, base_cross, inter_cross, inter_exit);
    if multiplier <= Decimal::ONE {
        return None;
    }

    // reuse the profit calculator with the route as a synthetic 1 -> multiplier trade
    let cross_chain = base_entry.network != base_cross.network
        || base_cross.network != inter_exit.network;
    let costs = TradeCosts {
        gas_fee: config.default_gas_cost_usd,
        protocol_fee_rate: Decimal::ZERO, // venue fees are already compounded
        slippage_rate: config.default_slippage_rate,
        bridge_fee: if cross_chain {
            config.bridge_fee_usd
        } else {
            Decimal::ZERO
        },
    };
    let profit =
        calculate_net_profit(Decimal::ONE, multiplier, trade_amount, &costs).ok()?;
    if !profit.is_profitable || profit.net_profit_pct < config.min_net_profit_pct {
        return None;
    }

    let spread = calculate_spread(Decimal::ONE, multiplier, config).ok()?;

    let route = vec![
        RouteLeg {
            venue: base_entry.venue.clone(),
            network: base_entry.network.clone(),
            pair: format!("REF/{}", base.symbol),
            rate: Decimal::ONE / base_entry.price,
            fee_rate: base_entry.fee_rate,
        },
        RouteLeg {
            venue: base_cross.venue.clone(),
            network: base_cross.network.clone(),
            pair: format!("{}/{}", base.symbol, inter_cross.token),
            rate: base_cross.price / inter_cross.price,
            fee_rate: base_cross.fee_rate,
        },
        RouteLeg {
            venue: inter_exit.venue.clone(),
            network: inter_exit.network.clone(),
            pair: format!("{}/REF", inter_exit.token),
            rate: inter_exit.price,
            fee_rate: inter_exit.fee_rate,
        },
    ];

    let estimated_execution_ms = estimate_execution_ms(config, cross_chain, ComplexityTier::High);
    let min_liquidity = base_entry
        .liquidity_usd
        .min(base_cross.liquidity_usd)
        .min(inter_exit.liquidity_usd);
    let liquidity_adequate =
        min_liquidity >= config.min_liquidity_usd && trade_amount <= min_liquidity * dec!(0.1);
    let confidence = base_entry
        .reliability
        .min(base_cross.reliability)
        .min(inter_exit.reliability);

    let risk = crate::risk::assess_risk(
        &crate::types::RiskFactors {
            volatility: config.default_volatility,
            liquidity_usd: min_liquidity,
            slippage: config.default_slippage_rate,
            execution_time_ms: estimated_execution_ms,
            gas_price_gwei: config.normal_gas_gwei,
            congestion_pct: config.default_congestion_pct,
        },
        config,
    );

    let mut tags = vec!["triangular".to_string()];
    if cross_chain {
        tags.push("cross-chain".to_string());
    }

    Some(Opportunity {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        kind: OpportunityKind::Triangular,
        token: base.symbol.clone(),
        buy: base_entry.clone(),
        sell: inter_exit.clone(),
        route: Some(route),
        spread,
        validation: OpportunityValidation {
            liquidity_adequate,
            executable: liquidity_adequate && profit.is_profitable && risk.is_acceptable,
            estimated_execution_ms,
        },
        composite_score: profit.score * dec!(0.6) + confidence * dec!(0.4),
        profit,
        cross_chain,
        complexity: ComplexityTier::High,
        rank: 0,
        risk_level: risk.level,
        confidence,
        urgency: ExecutionUrgency::Cautious,
        tags,
    })
}

impl OpportunityScanner {
    /// Scan 3-leg routes over every venue triple that can quote both tokens.
    pub async fn scan_triangular(
        &self,
        base: &Token,
        intermediate: &Token,
        trade_amount: Decimal,
        config: &AnalysisConfig,
    ) -> TokenScan {
        let (base_quotes, mut failures) = self.fetch_quotes(base, config).await;
        let (inter_quotes, inter_failures) = self.fetch_quotes(intermediate, config).await;
        failures.extend(inter_failures);
        let quotes_fetched = base_quotes.len() + inter_quotes.len();

        let mut opportunities = Vec::new();
        for base_entry in &base_quotes {
            for base_cross in &base_quotes {
                if base_cross.venue == base_entry.venue {
                    continue;
                }
                let Some(inter_cross) = inter_quotes.iter().find(|q| q.venue == base_cross.venue)
                else {
                    continue;
                };
                for inter_exit in &inter_quotes {
                    if inter_exit.venue == base_cross.venue {
                        continue;
                    }
                    if let Some(opportunity) = compose_route(
                        base,
                        base_entry,
                        base_cross,
                        inter_cross,
                        inter_exit,
                        trade_amount,
                        config,
                    ) {
                        opportunities.push(opportunity);
                    }
                }
            }
        }

        rank_opportunities(&mut opportunities, config.max_results);

        TokenScan {
            token: format!("{}-{}", base.symbol, intermediate.symbol),
            opportunities,
            failures,
            quotes_fetched,
        }
    }
}
