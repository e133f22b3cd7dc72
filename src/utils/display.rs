//! Display and printing utilities

use std::time::Instant;
use tracing::{info, warn};

use crate::types::{AnalysisReport, Opportunity, ScanReport};

pub fn print_opportunity(opp: &Opportunity) {
    warn!("\n🎯 OPPORTUNITY #{} (rank {})", opp.id, opp.rank);
    warn!("📍 Token: {} | {:?}", opp.token, opp.kind);
    warn!(
        "📋 Route: buy {} @ {} → sell {} @ {}",
        opp.buy.venue, opp.buy.price, opp.sell.venue, opp.sell.price
    );
    warn!("💰 Profit Analysis:");
    warn!("   Spread: {:.3}%", opp.spread.relative_pct);
    warn!("   Net Profit: ${:.2} ({:.2}%)", opp.profit.net_profit, opp.profit.net_profit_pct);
    warn!("   Composite Score: {:.3}", opp.composite_score);
    warn!(
        "   Risk: {} | Confidence: {:.2} | Urgency: {:?}",
        opp.risk_level, opp.confidence, opp.urgency
    );
    if opp.cross_chain {
        warn!("   🌉 Cross-chain ({} → {})", opp.buy.network, opp.sell.network);
    }
    if !opp.tags.is_empty() {
        warn!("   Tags: {}", opp.tags.join(", "));
    }
}

pub fn print_analysis_report(report: &AnalysisReport) {
    info!("\n📑 Analysis {} for {} ({}ms)", report.id, report.token, report.duration_ms);
    info!(
        "   Spread: {:.3}% | Net: ${:.2} | Risk: {} ({:.3})",
        report.spread.relative_pct,
        report.profit.net_profit,
        report.risk.level,
        report.risk.total_score
    );
    info!(
        "   Verdict: {} (score {:.3}, executable: {})",
        report.assessment.recommendation,
        report.assessment.composite_score,
        report.assessment.executable
    );
    for factor in &report.assessment.critical_factors {
        info!("   ⚠️  {}", factor);
    }
}

pub fn print_scan_report(report: &ScanReport) {
    info!(
        "🔍 Scan: {} tokens, {} venues, {} quotes, {} opportunities, {} failures ({}ms)",
        report.summary.tokens_scanned,
        report.summary.venues_queried,
        report.summary.quotes_fetched,
        report.summary.opportunities_found,
        report.summary.failures.len(),
        report.summary.duration_ms
    );
    for failure in &report.summary.failures {
        info!(
            "   ❌ {} / {} at {}: {}",
            failure.token,
            failure.venue.as_deref().unwrap_or("-"),
            failure.stage,
            failure.message
        );
    }
    for rec in &report.recommendations {
        info!("   💡 {}", rec);
    }
}

pub fn print_session_stats(
    start_time: Instant,
    cycles: u64,
    opportunities_found: u64,
    executable_found: u64,
) {
    let runtime = start_time.elapsed().as_secs();
    info!("\n📊 Session Statistics ({}s)", runtime);
    info!("   Scan cycles: {}", cycles);
    info!("   Opportunities found: {}", opportunities_found);
    info!("   Executable (validated): {}", executable_found);
    info!(
        "   Hit rate: {:.1}%",
        if opportunities_found > 0 {
            (executable_found as f64 / opportunities_found as f64) * 100.0
        } else {
            0.0
        }
    );
    info!("");
}
