use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One of the two in-plane axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Offset of this axis inside a particle's pair of flattened DOFs.
    pub fn offset(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// Reads this axis' component of a vector.
    pub fn component(self, v: DVec2) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }
}

/// A single degree of freedom: one axis of one particle.
///
/// Flattened DOF indices (`2 * particle + axis`) only appear at the file
/// boundary; everything inside the solver addresses DOFs through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dof {
    pub particle: usize,
    pub axis: Axis,
}

impl Dof {
    pub fn new(particle: usize, axis: Axis) -> Self {
        Self { particle, axis }
    }

    /// Builds a DOF from its position in the flattened `[x0, y0, x1, y1, ...]` order.
    pub fn from_flat(index: usize) -> Self {
        let axis = if index % 2 == 0 { Axis::X } else { Axis::Y };
        Self {
            particle: index / 2,
            axis,
        }
    }

    pub fn flat_index(self) -> usize {
        2 * self.particle + self.axis.offset()
    }
}

/// Per-axis support flags. A set flag clamps that displacement to zero every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restraint {
    pub x: bool,
    pub y: bool,
}

impl Restraint {
    pub const FREE: Restraint = Restraint { x: false, y: false };
    pub const FIXED: Restraint = Restraint { x: true, y: true };

    pub fn new(x: bool, y: bool) -> Self {
        Self { x, y }
    }

    pub fn is_fixed(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn is_free(&self) -> bool {
        !self.x && !self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_index_matches_interleaved_layout() {
        assert_eq!(Dof::new(0, Axis::X).flat_index(), 0);
        assert_eq!(Dof::new(0, Axis::Y).flat_index(), 1);
        assert_eq!(Dof::new(16, Axis::X).flat_index(), 32);
        assert_eq!(Dof::from_flat(33), Dof::new(16, Axis::Y));
    }

    #[test]
    fn restraint_reports_per_axis() {
        let roller = Restraint::new(false, true);
        assert!(!roller.is_fixed(Axis::X));
        assert!(roller.is_fixed(Axis::Y));
        assert!(!roller.is_free());
        assert!(Restraint::FREE.is_free());
    }
}
