use crate::core::Particle;
use crate::error::{DemError, Result};

/// Aborts a run whose displacements blow up.
///
/// Non-finite displacements always fail; a finite bound is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct DivergenceGuard {
    pub bound: Option<f64>,
}

impl DivergenceGuard {
    pub fn new(bound: Option<f64>) -> Self {
        Self { bound }
    }

    pub fn check(&self, step: usize, particles: &[Particle]) -> Result<()> {
        let limit = self.bound.unwrap_or(f64::INFINITY);
        for (i, particle) in particles.iter().enumerate() {
            let magnitude = particle.displacement.length();
            if !particle.displacement.is_finite() || magnitude > limit {
                return Err(DemError::NumericalInstability {
                    step,
                    particle: i,
                    magnitude,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn displaced(u: DVec2) -> Vec<Particle> {
        let mut particle = Particle::default();
        particle.displacement = u;
        vec![Particle::default(), particle]
    }

    #[test]
    fn nan_fails_even_without_bound() {
        let guard = DivergenceGuard::default();
        let err = guard.check(7, &displaced(DVec2::new(f64::NAN, 0.0))).unwrap_err();
        assert!(matches!(
            err,
            DemError::NumericalInstability { step: 7, particle: 1, .. }
        ));
    }

    #[test]
    fn bound_applies_to_magnitude() {
        let guard = DivergenceGuard::new(Some(1.0));
        assert!(guard.check(0, &displaced(DVec2::new(0.6, 0.6))).is_ok());
        assert!(guard.check(0, &displaced(DVec2::new(0.8, 0.8))).is_err());
    }
}
