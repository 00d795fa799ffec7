//! # Core Type Definitions
//!
//! Cycle windows and derived phase types.

pub mod cycle;
pub mod phase;

// Re-export all types
pub use cycle::*;
pub use phase::*;
