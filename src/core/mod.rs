//! Core types describing lattice particles, their adjacency, and degrees of freedom.

pub mod particle;
pub mod system;
pub mod topology;
pub mod types;

pub use particle::Particle;
pub use system::ParticleSystem;
pub use topology::Topology;
pub use types::{Axis, Dof, Restraint};
