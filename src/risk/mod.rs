//! Risk scoring

pub mod scorer;

pub use scorer::*;
