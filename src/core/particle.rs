use super::types::{Axis, Restraint};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Lattice node carrying its reference position, kinematic state, and boundary conditions.
///
/// Mass is not stored here: every particle shares the lumped mass of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub reference: DVec2,
    pub displacement: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
    pub restraint: Restraint,
    pub external_force: DVec2,
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(DVec2::ZERO)
    }
}

impl Particle {
    pub fn new(reference: DVec2) -> Self {
        Self {
            reference,
            displacement: DVec2::ZERO,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            restraint: Restraint::FREE,
            external_force: DVec2::ZERO,
        }
    }

    pub fn with_restraint(mut self, restraint: Restraint) -> Self {
        self.restraint = restraint;
        self
    }

    pub fn with_external_force(mut self, force: DVec2) -> Self {
        self.external_force = force;
        self
    }

    /// Current position: reference plus displacement.
    pub fn position(&self) -> DVec2 {
        self.reference + self.displacement
    }

    pub fn displacement_along(&self, axis: Axis) -> f64 {
        axis.component(self.displacement)
    }

    /// Zeroes displacement on restrained axes. Velocity and acceleration are left untouched.
    pub fn clamp_restrained(&mut self) {
        if self.restraint.x {
            self.displacement.x = 0.0;
        }
        if self.restraint.y {
            self.displacement.y = 0.0;
        }
    }

    /// Returns the particle to its undeformed, resting state.
    pub fn reset_motion(&mut self) {
        self.displacement = DVec2::ZERO;
        self.velocity = DVec2::ZERO;
        self.acceleration = DVec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_only_touches_displacement_on_fixed_axes() {
        let mut particle = Particle::new(DVec2::new(1.0, 2.0)).with_restraint(Restraint::new(true, false));
        particle.displacement = DVec2::new(0.5, -0.25);
        particle.velocity = DVec2::new(3.0, 4.0);

        particle.clamp_restrained();

        assert_eq!(particle.displacement, DVec2::new(0.0, -0.25));
        assert_eq!(particle.velocity, DVec2::new(3.0, 4.0));
        assert_eq!(particle.position(), DVec2::new(1.0, 1.75));
    }
}
