//! Error taxonomy for the analysis pipeline

pub mod engine_error;

pub use engine_error::*;
