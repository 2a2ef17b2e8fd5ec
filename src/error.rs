//! Error types for the lattice solver.
//!
//! This module provides a unified error type [`DemError`] and a convenient [`Result`] alias.

use std::fmt;

/// Main error type for the solver.
///
/// Every fallible operation, from loading a mesh record to stepping the
/// integrator, returns this error type. A run that fails at any point yields
/// no results.
#[derive(Debug)]
pub enum DemError {
    /// The mesh record is inconsistent (lengths, indices, flags).
    MalformedInput(String),
    /// The run parameters are unusable for the given particle system.
    InvalidConfig(String),
    /// Two connected particles sit at (numerically) zero distance.
    DegenerateContact {
        particle: usize,
        neighbor: usize,
        distance: f64,
    },
    /// A displacement became non-finite or left the configured bound.
    NumericalInstability {
        step: usize,
        particle: usize,
        magnitude: f64,
    },
    /// The simulation was used after a failed step.
    Aborted { step: usize },
    /// An I/O operation failed (reading a mesh, writing results).
    Io(std::io::Error),
    /// A record could not be (de)serialized.
    Json(serde_json::Error),
}

impl fmt::Display for DemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedInput(msg) => write!(f, "Malformed input: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::DegenerateContact {
                particle,
                neighbor,
                distance,
            } => write!(
                f,
                "Degenerate contact between particles {particle} and {neighbor} (distance {distance:e})"
            ),
            Self::NumericalInstability {
                step,
                particle,
                magnitude,
            } => write!(
                f,
                "Numerical instability at step {step}: particle {particle} displaced by {magnitude:e}"
            ),
            Self::Aborted { step } => write!(f, "Simulation aborted after failure at step {step}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for DemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenient Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, DemError>;

impl From<std::io::Error> for DemError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for DemError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
