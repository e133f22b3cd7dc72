//! Venue price quote types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// One venue's price for a token, tagged with freshness and reliability.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub venue: String,
    pub network: String,
    pub token: String,
    pub price: Decimal,
    pub fee_rate: Decimal,
    /// Venue reliability score in [0, 1].
    pub reliability: Decimal,
    /// Available liquidity in reference currency.
    pub liquidity_usd: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.observed_at).num_seconds()
    }

    pub fn is_cross_chain_with(&self, other: &PriceQuote) -> bool {
        self.network != other.network
    }
}

/// Venue handle used when asking the feed for quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VenueRef {
    pub name: String,
    pub network: String,
}

impl VenueRef {
    pub fn new(name: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            network: network.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_age_and_cross_chain() {
        let now = Utc::now();
        let quote = PriceQuote {
            venue: "quickswap".to_string(),
            network: "polygon".to_string(),
            token: "WETH".to_string(),
            price: dec!(2000),
            fee_rate: dec!(0.003),
            reliability: dec!(0.9),
            liquidity_usd: dec!(500000),
            observed_at: now - Duration::seconds(12),
        };
        let mut other = quote.clone();
        other.network = "ethereum".to_string();

        assert_eq!(quote.age_secs(now), 12);
        assert!(quote.is_cross_chain_with(&other));
        assert!(!quote.is_cross_chain_with(&quote.clone()));
    }
}
