//! Result recording: monitored-DOF selection and the displacement series.

pub mod monitor;
pub mod recorder;

pub use monitor::{MonitorPolicy, FALLBACK_DOF};
pub use recorder::{DisplacementSeries, ResultRecorder};
