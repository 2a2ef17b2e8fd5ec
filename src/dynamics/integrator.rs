use glam::DVec2;

use super::{constraints::ConstraintEnforcer, contact::ContactForceEvaluator, guard::DivergenceGuard};
use crate::config::RunConfig;
use crate::core::{Particle, ParticleSystem};
use crate::error::Result;
use crate::utils::profiling::{RunProfiler, StageTimer};

/// Explicit leapfrog (velocity-Verlet) integrator with a constraint projection after drift.
///
/// One step runs: half kick, drift, constrain, guard, contact forces,
/// acceleration update, half kick. Mass is the single lumped scalar of the run.
#[derive(Debug, Clone)]
pub struct LeapfrogIntegrator {
    pub dt: f64,
    pub mass: f64,
    contact: ContactForceEvaluator,
    constraints: ConstraintEnforcer,
    guard: DivergenceGuard,
    internal_forces: Vec<DVec2>,
}

impl LeapfrogIntegrator {
    /// Builds the stage components for `system`. Fails with `InvalidConfig` when the
    /// run parameters do not pass [`RunConfig::validate`].
    pub fn new(config: &RunConfig, system: &ParticleSystem) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dt: config.time_step,
            mass: config.mass,
            contact: ContactForceEvaluator::new(config.radius, config.stiffness),
            constraints: ConstraintEnforcer::new(system.particles()),
            guard: DivergenceGuard::new(config.divergence_bound),
            internal_forces: vec![DVec2::ZERO; system.len()],
        })
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.contact.set_parallel(enabled);
    }

    pub fn parallel(&self) -> bool {
        self.contact.parallel()
    }

    /// Internal forces from the most recent evaluation.
    pub fn internal_forces(&self) -> &[DVec2] {
        &self.internal_forces
    }

    /// Sets the starting acceleration `a = (F_ext - fi(u)) / mass` from the current displacements.
    pub fn initialize(&mut self, system: &mut ParticleSystem) -> Result<()> {
        let (particles, topology) = system.split_mut();
        self.contact
            .evaluate(particles, topology, &mut self.internal_forces)?;
        self.update_accelerations(particles);
        Ok(())
    }

    /// Advances every particle by one step. `step` is only used for diagnostics.
    pub fn step(&mut self, step: usize, system: &mut ParticleSystem, profiler: &mut RunProfiler) -> Result<()> {
        let half_dt = 0.5 * self.dt;
        let dt = self.dt;
        let (particles, topology) = system.split_mut();

        {
            let _timer = StageTimer::new("kick-drift", &mut profiler.integration_time);
            for p in particles.iter_mut() {
                p.velocity += p.acceleration * half_dt;
                p.displacement += p.velocity * dt;
            }
        }
        {
            let _timer = StageTimer::new("constrain", &mut profiler.constraint_time);
            self.constraints.apply(particles);
            self.guard.check(step, particles)?;
        }
        {
            let _timer = StageTimer::new("contact", &mut profiler.force_time);
            self.contact
                .evaluate(particles, topology, &mut self.internal_forces)?;
        }
        {
            let _timer = StageTimer::new("kick", &mut profiler.integration_time);
            self.update_accelerations(particles);
            for p in particles.iter_mut() {
                p.velocity += p.acceleration * half_dt;
            }
        }
        profiler.steps += 1;
        Ok(())
    }

    fn update_accelerations(&self, particles: &mut [Particle]) {
        let inv_mass = 1.0 / self.mass;
        for (p, fi) in particles.iter_mut().zip(&self.internal_forces) {
            p.acceleration = (p.external_force - *fi) * inv_mass;
        }
    }
}
