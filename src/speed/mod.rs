//! Speed recomputation engine.

pub mod engine;

// Re-export main functions
pub use engine::{compute_speeds, format_speed, parse_timestamp, SpeedSample};
