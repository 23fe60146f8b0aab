//! Utility helpers: 2D math, scoped logging timers, and step profiling.

pub mod logging;
pub mod math;
pub mod profiling;

pub use math::*;
