//! Mesh records: the persisted file format, its validating loader, and a lattice builder.

pub mod lattice;
pub mod loader;
pub mod record;

pub use lattice::LatticeBuilder;
pub use loader::{load, ConnectivityPolicy, MeshLoader};
pub use record::{DofValues, MeshRecord};
