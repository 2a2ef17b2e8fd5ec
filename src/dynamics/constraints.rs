use crate::core::Particle;

/// Clamps restrained displacement components to zero.
///
/// Runs after every drift, before forces are evaluated. Velocity and
/// acceleration of a restrained axis keep integrating; only the displacement
/// is overridden.
#[derive(Debug, Clone, Default)]
pub struct ConstraintEnforcer {
    restrained: Vec<usize>,
}

impl ConstraintEnforcer {
    /// Caches which particles carry any restraint.
    pub fn new(particles: &[Particle]) -> Self {
        let restrained = particles
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.restraint.is_free())
            .map(|(i, _)| i)
            .collect();
        Self { restrained }
    }

    pub fn restrained_count(&self) -> usize {
        self.restrained.len()
    }

    pub fn apply(&self, particles: &mut [Particle]) {
        for &i in &self.restrained {
            particles[i].clamp_restrained();
        }
    }
}
