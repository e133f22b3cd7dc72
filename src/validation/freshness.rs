//! Data-freshness guard
//!
//! Runs before any calculation: stale quotes and payloads carrying
//! simulated/placeholder markers fail fast instead of silently feeding the
//! pipeline.

use chrono::{DateTime, Utc};

use crate::config::AnalysisConfig;
use crate::errors::{EngineError, EngineResult};
use crate::types::{PoolState, PriceQuote};

const PLACEHOLDER_MARKERS: &[&str] = &["simulated", "placeholder", "mock", "dummy", "test-data"];

fn find_marker(value: &str) -> Option<&'static str> {
    let lowered = value.to_lowercase();
    PLACEHOLDER_MARKERS
        .iter()
        .find(|marker| lowered.contains(**marker))
        .copied()
}

/// Reject a quote that is older than the freshness bound or that carries a
/// placeholder marker in its venue/token fields.
pub fn ensure_live_quote(
    quote: &PriceQuote,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> EngineResult<()> {
    for field in [&quote.venue, &quote.token] {
        if let Some(marker) = find_marker(field) {
            return Err(EngineError::StaleData {
                source: format!("{} ({marker} payload)", quote.venue),
                age_secs: 0,
                max_age_secs: config.quote_freshness_secs,
            });
        }
    }

    let age = quote.age_secs(now);
    if age > config.quote_freshness_secs || age < 0 {
        return Err(EngineError::StaleData {
            source: quote.venue.clone(),
            age_secs: age,
            max_age_secs: config.quote_freshness_secs,
        });
    }
    Ok(())
}

/// Same bound applied to a pool snapshot.
pub fn ensure_live_pool(
    pool: &PoolState,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> EngineResult<()> {
    if let Some(marker) = find_marker(&pool.venue) {
        return Err(EngineError::StaleData {
            source: format!("{} ({marker} payload)", pool.venue),
            age_secs: 0,
            max_age_secs: config.quote_freshness_secs,
        });
    }

    let age = (now - pool.observed_at).num_seconds();
    if age > config.quote_freshness_secs || age < 0 {
        return Err(EngineError::StaleData {
            source: pool.venue.clone(),
            age_secs: age,
            max_age_secs: config.quote_freshness_secs,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn quote(venue: &str, age_secs: i64) -> PriceQuote {
        PriceQuote {
            venue: venue.to_string(),
            network: "ethereum".to_string(),
            token: "WETH".to_string(),
            price: dec!(2000),
            fee_rate: dec!(0.003),
            reliability: dec!(0.95),
            liquidity_usd: dec!(1000000),
            observed_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_fresh_quote_passes() {
        let config = AnalysisConfig::default();
        assert!(ensure_live_quote(&quote("uniswap-v3", 5), Utc::now(), &config).is_ok());
    }

    #[test]
    fn test_stale_quote_rejected() {
        let config = AnalysisConfig::default();
        let err = ensure_live_quote(&quote("uniswap-v3", 45), Utc::now(), &config).unwrap_err();
        assert!(matches!(err, EngineError::StaleData { age_secs: 45, .. }));
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let config = AnalysisConfig::default();
        assert!(ensure_live_quote(&quote("uniswap-v3", -10), Utc::now(), &config).is_err());
    }

    #[test]
    fn test_placeholder_marker_rejected() {
        let config = AnalysisConfig::default();
        for venue in ["mock-dex", "Simulated-Feed", "placeholder"] {
            assert!(ensure_live_quote(&quote(venue, 1), Utc::now(), &config).is_err());
        }
    }
}
