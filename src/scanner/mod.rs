//! Opportunity scanning across venues and chains

pub mod cache;
pub mod cross_venue;
pub mod triangular;

pub use cache::*;
pub use cross_venue::*;
pub use triangular::*;
