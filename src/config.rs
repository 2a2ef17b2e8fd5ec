//! Default run parameters and the immutable [`RunConfig`] passed to a simulation.

use serde::{Deserialize, Serialize};

use crate::error::{DemError, Result};
use crate::output::monitor::MonitorPolicy;

/// Default number of integration steps per run.
pub const DEFAULT_STEPS: usize = 600;

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f64 = 4.0e-5;

/// Default particle radius. Connected particles are at rest at twice this distance.
pub const DEFAULT_RADIUS: f64 = 1.0;

/// Default lumped mass shared by every particle (steel density, unit volume).
pub const DEFAULT_MASS: f64 = 7850.0;

/// Default contact spring stiffness (steel Young's modulus).
pub const DEFAULT_STIFFNESS: f64 = 2.1e11;

/// Separations at or below this value are treated as coincident particles.
pub const MIN_CONTACT_DISTANCE: f64 = 1.0e-12;

/// Fraction of `sqrt(mass / stiffness)` above which a timestep is reported as unstable.
pub const STABLE_STEP_FRACTION: f64 = 0.5;

/// Parameters of a single run. Not persisted in the mesh record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of steps to integrate; one sample is recorded per step.
    pub steps: usize,
    /// Integration step `h`.
    pub time_step: f64,
    pub radius: f64,
    pub mass: f64,
    pub stiffness: f64,
    /// Which degree of freedom the recorder samples.
    pub monitor: MonitorPolicy,
    /// Abort once any displacement magnitude exceeds this bound.
    pub divergence_bound: Option<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            time_step: DEFAULT_TIME_STEP,
            radius: DEFAULT_RADIUS,
            mass: DEFAULT_MASS,
            stiffness: DEFAULT_STIFFNESS,
            monitor: MonitorPolicy::default(),
            divergence_bound: None,
        }
    }
}

impl RunConfig {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_monitor(mut self, monitor: MonitorPolicy) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_divergence_bound(mut self, bound: f64) -> Self {
        self.divergence_bound = Some(bound);
        self
    }

    /// Time scale `sqrt(mass / stiffness)` of a single spring. Infinite without stiffness.
    pub fn natural_time_scale(&self) -> f64 {
        if self.stiffness == 0.0 {
            f64::INFINITY
        } else {
            (self.mass / self.stiffness).sqrt()
        }
    }

    /// Whether the step is small relative to [`Self::natural_time_scale`].
    pub fn is_step_stable(&self) -> bool {
        self.time_step <= STABLE_STEP_FRACTION * self.natural_time_scale()
    }

    /// Checks the scalar parameters. Monitor resolution is checked against a system later.
    pub fn validate(&self) -> Result<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(DemError::InvalidConfig(format!(
                "time step must be positive and finite, got {}",
                self.time_step
            )));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(DemError::InvalidConfig(format!(
                "mass must be positive and finite, got {}",
                self.mass
            )));
        }
        if !(self.stiffness.is_finite() && self.stiffness >= 0.0) {
            return Err(DemError::InvalidConfig(format!(
                "stiffness must be non-negative and finite, got {}",
                self.stiffness
            )));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(DemError::InvalidConfig(format!(
                "radius must be non-negative and finite, got {}",
                self.radius
            )));
        }
        if let Some(bound) = self.divergence_bound {
            if bound.is_nan() || bound <= 0.0 {
                return Err(DemError::InvalidConfig(format!(
                    "divergence bound must be positive, got {bound}"
                )));
            }
        }
        Ok(())
    }
}
