use log::{debug, error, info};

use crate::{
    config::RunConfig,
    core::{Dof, ParticleSystem},
    dynamics::integrator::LeapfrogIntegrator,
    error::{DemError, Result},
    mesh::{ConnectivityPolicy, MeshLoader, MeshRecord},
    output::recorder::{DisplacementSeries, ResultRecorder},
    utils::{logging::warn_if_step_unstable, profiling::RunProfiler},
};

/// Steps between progress messages at debug level.
const PROGRESS_INTERVAL: usize = 100;

/// One run of the solver: particle state, integrator, and recorder.
///
/// A failed step poisons the simulation; every later call reports
/// [`DemError::Aborted`] so that no partial series escapes.
pub struct Simulation {
    system: ParticleSystem,
    config: RunConfig,
    integrator: LeapfrogIntegrator,
    recorder: ResultRecorder,
    profiler: RunProfiler,
    step: usize,
    failed_at: Option<usize>,
}

impl Simulation {
    /// Prepares a run from rest: zero displacement and velocity, initial
    /// acceleration from external and internal forces.
    pub fn new(mut system: ParticleSystem, config: RunConfig) -> Result<Self> {
        config.validate()?;
        let unstable = warn_if_step_unstable(&config);
        let dof = config.monitor.resolve(&system)?;

        system.reset_motion();
        let mut integrator = LeapfrogIntegrator::new(&config, &system)?;
        integrator.set_parallel(cfg!(feature = "parallel"));
        integrator.initialize(&mut system)?;

        info!(
            "simulation ready: {} particles, {} adjacency entries, {} steps of {:e}{}, monitoring DOF {}",
            system.len(),
            system.topology().entry_count(),
            config.steps,
            config.time_step,
            if unstable { " (above stability limit)" } else { "" },
            dof.flat_index()
        );

        let profiler = RunProfiler {
            particle_count: system.len(),
            entry_count: system.topology().entry_count(),
            ..RunProfiler::default()
        };

        Ok(Self {
            recorder: ResultRecorder::new(dof, config.steps),
            system,
            config,
            integrator,
            profiler,
            step: 0,
            failed_at: None,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn monitored_dof(&self) -> Dof {
        self.recorder.dof()
    }

    /// Number of completed steps.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Elapsed simulated time.
    pub fn time(&self) -> f64 {
        self.step as f64 * self.config.time_step
    }

    /// Values recorded so far.
    pub fn recorded(&self) -> &[f64] {
        self.recorder.values()
    }

    /// Internal contact forces from the latest evaluation, one per particle.
    pub fn internal_forces(&self) -> &[glam::DVec2] {
        self.integrator.internal_forces()
    }

    pub fn profiler(&self) -> &RunProfiler {
        &self.profiler
    }

    /// Enables or disables parallel contact evaluation. Results are identical either way.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.integrator.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.integrator.parallel()
    }

    /// Advances one step and returns the sampled displacement.
    pub fn step(&mut self) -> Result<f64> {
        if let Some(step) = self.failed_at {
            return Err(DemError::Aborted { step });
        }
        if let Err(err) = self
            .integrator
            .step(self.step, &mut self.system, &mut self.profiler)
        {
            error!("step {} failed: {err}", self.step);
            self.failed_at = Some(self.step);
            return Err(err);
        }
        self.step += 1;
        let value = self.recorder.sample(&self.system);
        if self.step % PROGRESS_INTERVAL == 0 {
            debug!("step {}/{}: monitored displacement {value:e}", self.step, self.config.steps);
        }
        Ok(value)
    }

    /// Runs the remaining configured steps and returns the full series.
    pub fn run(mut self) -> Result<DisplacementSeries> {
        let start = std::time::Instant::now();
        while self.step < self.config.steps {
            self.step()?;
        }
        self.profiler.total_time += start.elapsed();
        self.profiler.report();
        self.into_series()
    }

    /// Consumes the simulation and returns what has been recorded.
    pub fn into_series(self) -> Result<DisplacementSeries> {
        match self.failed_at {
            Some(step) => Err(DemError::Aborted { step }),
            None => Ok(self.recorder.finish()),
        }
    }
}

/// Loads a mesh record and runs it to completion.
pub fn simulate(record: &MeshRecord, policy: ConnectivityPolicy, config: RunConfig) -> Result<DisplacementSeries> {
    let system = MeshLoader::new(policy).load(record)?;
    Simulation::new(system, config)?.run()
}
