//! Spread and profitability math

pub mod calculator;

pub use calculator::*;
