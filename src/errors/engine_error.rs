//! Custom error types for the analysis engine

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput {
        field: String,
        reason: String,
    },

    #[error("Stale data from {source}: {age_secs}s old (max {max_age_secs}s)")]
    StaleData {
        source: String,
        age_secs: i64,
        max_age_secs: i64,
    },

    #[error("Invalid pool state at {venue}: {details}")]
    PoolStateInvalid {
        venue: String,
        details: String,
    },

    #[error("Price impact at {venue} is {impact_pct}% (max {max_pct}%)")]
    ImpactExceeded {
        venue: String,
        impact_pct: Decimal,
        max_pct: Decimal,
    },

    #[error("Insufficient liquidity at {venue}: {details}")]
    LiquidityInsufficient {
        venue: String,
        details: String,
    },

    #[error("{collaborator} did not answer within {timeout_ms}ms")]
    CollaboratorTimeout {
        collaborator: String,
        timeout_ms: u64,
    },

    #[error("Feed error from {venue}: {message}")]
    Feed {
        venue: String,
        message: String,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Stage/venue label used when a failure is folded into a scan summary.
    pub fn stage(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { .. } => "input",
            EngineError::StaleData { .. } => "freshness",
            EngineError::PoolStateInvalid { .. } => "pool-state",
            EngineError::ImpactExceeded { .. } => "price-impact",
            EngineError::LiquidityInsufficient { .. } => "liquidity",
            EngineError::CollaboratorTimeout { .. } => "collaborator",
            EngineError::Feed { .. } => "feed",
        }
    }

    /// Fatal errors abort the single calculation; non-fatal ones downgrade it.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            EngineError::ImpactExceeded { .. } | EngineError::LiquidityInsufficient { .. }
        )
    }
}
