//! Core data types and structures

pub mod tokens;
pub mod pools;
pub mod quotes;
pub mod impact;
pub mod profit;
pub mod risk;
pub mod liquidity;
pub mod opportunity;
pub mod assessment;

pub use tokens::*;
pub use pools::*;
pub use quotes::*;
pub use impact::*;
pub use profit::*;
pub use risk::*;
pub use liquidity::*;
pub use opportunity::*;
pub use assessment::*;
