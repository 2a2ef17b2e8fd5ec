use glam::DVec2;

use crate::config::MIN_CONTACT_DISTANCE;
use crate::core::{Particle, Topology};
use crate::error::{DemError, Result};

/// Linear spring between topological neighbours with rest length `2 * radius`.
///
/// The spring is bidirectional: separated pairs are pulled together and
/// interpenetrating pairs pushed apart. Each particle only sums the entries of
/// its own adjacency row, so a symmetric topology yields equal and opposite
/// reactions.
#[derive(Debug, Clone)]
pub struct ContactForceEvaluator {
    pub radius: f64,
    pub stiffness: f64,
    parallel: bool,
}

impl ContactForceEvaluator {
    pub fn new(radius: f64, stiffness: f64) -> Self {
        Self {
            radius,
            stiffness,
            parallel: false,
        }
    }

    /// Requests per-particle parallel evaluation. Has no effect without the `parallel` feature.
    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    /// Internal force on particle `j` from its neighbours at their current positions.
    pub fn particle_force(&self, j: usize, particles: &[Particle], topology: &Topology) -> Result<DVec2> {
        let pj = particles[j].position();
        let rest = 2.0 * self.radius;
        let mut force = DVec2::ZERO;
        for &k in topology.neighbors(j) {
            let delta = pj - particles[k].position();
            let distance = delta.length();
            if !(distance > MIN_CONTACT_DISTANCE) {
                return Err(DemError::DegenerateContact {
                    particle: j,
                    neighbor: k,
                    distance,
                });
            }
            let gap = distance - rest;
            force += self.stiffness * gap * delta / distance;
        }
        Ok(force)
    }

    /// Recomputes the internal force of every particle into `forces`.
    ///
    /// `forces` and `topology` must both cover every particle; `forces` is fully overwritten.
    pub fn evaluate(&self, particles: &[Particle], topology: &Topology, forces: &mut [DVec2]) -> Result<()> {
        if forces.len() != particles.len() || topology.len() != particles.len() {
            return Err(DemError::InvalidConfig(format!(
                "force buffer of {} and {} adjacency rows for {} particles",
                forces.len(),
                topology.len(),
                particles.len()
            )));
        }

        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                use rayon::prelude::*;
                return forces.par_iter_mut().enumerate().try_for_each(|(j, slot)| {
                    *slot = self.particle_force(j, particles, topology)?;
                    Ok(())
                });
            }
        }

        for (j, slot) in forces.iter_mut().enumerate() {
            *slot = self.particle_force(j, particles, topology)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair(separation: DVec2) -> (Vec<Particle>, Topology) {
        let particles = vec![Particle::new(DVec2::ZERO), Particle::new(separation)];
        (particles, Topology::from_rows(&[vec![1], vec![0]]))
    }

    #[test]
    fn pair_at_rest_length_is_in_equilibrium() {
        let (particles, topology) = pair(DVec2::new(2.0, 0.0));
        let evaluator = ContactForceEvaluator::new(1.0, 1.0e9);
        let mut forces = vec![DVec2::ONE; 2];
        evaluator.evaluate(&particles, &topology, &mut forces).unwrap();
        assert_eq!(forces, vec![DVec2::ZERO; 2]);
    }

    #[test]
    fn stretched_pair_gets_equal_and_opposite_forces() {
        let (particles, topology) = pair(DVec2::new(3.0, 4.0));
        let evaluator = ContactForceEvaluator::new(1.0, 10.0);
        let mut forces = vec![DVec2::ZERO; 2];
        evaluator.evaluate(&particles, &topology, &mut forces).unwrap();

        // gap = 5 - 2 = 3, direction from 1 to 0 = (-0.6, -0.8)
        assert_relative_eq!(forces[0].x, 10.0 * 3.0 * -0.6, epsilon = 1e-12);
        assert_relative_eq!(forces[0].y, 10.0 * 3.0 * -0.8, epsilon = 1e-12);
        assert_relative_eq!((forces[0] + forces[1]).length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn interpenetrating_pair_is_pushed_apart() {
        let (particles, topology) = pair(DVec2::new(1.0, 0.0));
        let evaluator = ContactForceEvaluator::new(1.0, 1.0);
        let force = evaluator.particle_force(1, &particles, &topology).unwrap();
        // Negative gap: the internal force points at the neighbour, so `-fi / mass` pushes away.
        assert!(force.x < 0.0);
    }

    #[test]
    fn displacement_enters_current_positions() {
        let (mut particles, topology) = pair(DVec2::new(2.0, 0.0));
        particles[1].displacement = DVec2::new(0.5, 0.0);
        let evaluator = ContactForceEvaluator::new(1.0, 2.0);
        let force = evaluator.particle_force(0, &particles, &topology).unwrap();
        assert_relative_eq!(force.x, 2.0 * 0.5 * -1.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_neighbours_are_degenerate() {
        let (particles, topology) = pair(DVec2::ZERO);
        let evaluator = ContactForceEvaluator::new(1.0, 1.0);
        let mut forces = vec![DVec2::ZERO; 2];
        let err = evaluator.evaluate(&particles, &topology, &mut forces).unwrap_err();
        assert!(matches!(
            err,
            DemError::DegenerateContact { particle: 0, neighbor: 1, .. }
        ));
    }

    #[test]
    fn short_force_buffer_is_rejected() {
        let (particles, topology) = pair(DVec2::new(2.0, 0.0));
        let evaluator = ContactForceEvaluator::new(1.0, 1.0);
        let mut forces = vec![DVec2::X; 1];
        let err = evaluator.evaluate(&particles, &topology, &mut forces).unwrap_err();
        assert!(matches!(err, DemError::InvalidConfig(_)), "{err}");
        assert_eq!(forces, vec![DVec2::X]);

        let mut forces = vec![DVec2::ZERO; 2];
        let err = evaluator
            .evaluate(&particles, &Topology::isolated(3), &mut forces)
            .unwrap_err();
        assert!(matches!(err, DemError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn isolated_particles_feel_nothing() {
        let particles = vec![Particle::new(DVec2::ZERO), Particle::new(DVec2::ZERO)];
        let evaluator = ContactForceEvaluator::new(1.0, 1.0);
        let mut forces = vec![DVec2::X; 2];
        evaluator
            .evaluate(&particles, &Topology::isolated(2), &mut forces)
            .unwrap();
        assert_eq!(forces, vec![DVec2::ZERO; 2]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential_bit_for_bit() {
        use crate::mesh::{load, LatticeBuilder};

        let record = LatticeBuilder::new(8, 6, 2.1).build().unwrap();
        let mut system = load(&record).unwrap();
        for (i, p) in system.particles_mut().iter_mut().enumerate() {
            p.displacement = DVec2::new((i as f64 * 0.37).sin(), (i as f64 * 0.11).cos()) * 0.05;
        }

        let mut sequential = ContactForceEvaluator::new(1.0, 3.0e5);
        let mut parallel = sequential.clone();
        sequential.set_parallel(false);
        parallel.set_parallel(true);

        let mut a = vec![DVec2::ZERO; system.len()];
        let mut b = vec![DVec2::ZERO; system.len()];
        sequential.evaluate(system.particles(), system.topology(), &mut a).unwrap();
        parallel.evaluate(system.particles(), system.topology(), &mut b).unwrap();
        assert_eq!(a, b);
    }
}
