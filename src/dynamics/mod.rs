//! Simulation dynamics: contact forces, constraint projection, divergence checks, and integration.

pub mod constraints;
pub mod contact;
pub mod guard;
pub mod integrator;

pub use constraints::ConstraintEnforcer;
pub use contact::ContactForceEvaluator;
pub use guard::DivergenceGuard;
pub use integrator::LeapfrogIntegrator;
