use super::{
    particle::Particle,
    topology::Topology,
    types::{Axis, Dof},
};
use crate::error::{DemError, Result};

/// Particles plus the static adjacency connecting them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    topology: Topology,
}

impl ParticleSystem {
    pub fn new(particles: Vec<Particle>, topology: Topology) -> Result<Self> {
        if particles.len() != topology.len() {
            return Err(DemError::MalformedInput(format!(
                "{} particles but {} adjacency rows",
                particles.len(),
                topology.len()
            )));
        }
        if let Some(bad) = (0..topology.len())
            .flat_map(|i| topology.neighbors(i).iter().copied())
            .find(|&k| k >= particles.len())
        {
            return Err(DemError::MalformedInput(format!(
                "neighbour index {bad} out of range for {} particles",
                particles.len()
            )));
        }
        Ok(Self {
            particles,
            topology,
        })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn dof_count(&self) -> usize {
        2 * self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Mutable particles alongside the read-only adjacency.
    pub fn split_mut(&mut self) -> (&mut [Particle], &Topology) {
        (&mut self.particles, &self.topology)
    }

    /// Iterates over every DOF in flattened order.
    pub fn dofs(&self) -> impl Iterator<Item = Dof> + '_ {
        (0..self.particles.len()).flat_map(|p| Axis::ALL.into_iter().map(move |axis| Dof::new(p, axis)))
    }

    pub fn contains_dof(&self, dof: Dof) -> bool {
        dof.particle < self.particles.len()
    }

    pub fn displacement(&self, dof: Dof) -> Option<f64> {
        self.particle(dof.particle).map(|p| p.displacement_along(dof.axis))
    }

    pub fn is_restrained(&self, dof: Dof) -> bool {
        self.particle(dof.particle)
            .is_some_and(|p| p.restraint.is_fixed(dof.axis))
    }

    pub fn external_force(&self, dof: Dof) -> f64 {
        self.particle(dof.particle)
            .map_or(0.0, |p| dof.axis.component(p.external_force))
    }

    /// Restores every particle to zero displacement, velocity, and acceleration.
    pub fn reset_motion(&mut self) {
        self.particles.iter_mut().for_each(Particle::reset_motion);
    }
}
