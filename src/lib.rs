//! Lattice DEM – explicit discrete element solver for 2D particle lattices.
//!
//! A lattice of point masses joined by linear springs (rest length twice the
//! particle radius) is advanced with a leapfrog scheme under fixed supports
//! and nodal loads. The topology is static: neighbours come from the mesh
//! record and are never rediscovered. Each run yields the displacement
//! history of one monitored degree of freedom.
//!
//! ```no_run
//! use lattice_dem::{simulate, ConnectivityPolicy, MeshRecord, RunConfig};
//!
//! let record = MeshRecord::from_path("mesh.json")?;
//! let series = simulate(&record, ConnectivityPolicy::Reject, RunConfig::default())?;
//! series.write_to_path("output.json")?;
//! # Ok::<(), lattice_dem::DemError>(())
//! ```

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod mesh;
pub mod output;
pub mod utils;
pub mod world;

pub use glam::DVec2;

pub use config::RunConfig;
pub use core::{Axis, Dof, Particle, ParticleSystem, Restraint, Topology};
pub use dynamics::{ContactForceEvaluator, ConstraintEnforcer, DivergenceGuard, LeapfrogIntegrator};
pub use error::{DemError, Result};
pub use mesh::{load, ConnectivityPolicy, DofValues, LatticeBuilder, MeshLoader, MeshRecord};
pub use output::{DisplacementSeries, MonitorPolicy, ResultRecorder};
pub use utils::RunProfiler;
pub use world::{simulate, Simulation};
