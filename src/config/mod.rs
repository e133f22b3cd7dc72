//! Configuration for the analysis engine
//!
//! Configuration is an explicit value passed into every analysis call, so
//! scenario simulation can vary thresholds without touching shared state.

pub mod settings;

pub use settings::*;
