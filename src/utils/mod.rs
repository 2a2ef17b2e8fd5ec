//! Utility helpers: stability warnings and run profiling.

pub mod logging;
pub mod profiling;

pub use logging::warn_if_step_unstable;
pub use profiling::{RunProfiler, StageTimer};
