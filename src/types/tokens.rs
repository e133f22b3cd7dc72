//! Token identity

use serde::Serialize;

/// Asset identifier scoped to a network. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub symbol: String,
    pub network: String,
    pub decimals: u32,
}

impl Token {
    pub fn new(symbol: impl Into<String>, network: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            network: network.into(),
            decimals,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.network)
    }
}
