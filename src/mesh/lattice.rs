use glam::DVec2;

use super::record::MeshRecord;
use crate::core::Restraint;
use crate::error::{DemError, Result};

/// Builder for rectangular lattices in the persisted mesh format.
///
/// Particles are numbered row by row, `index = row * columns + column`, and
/// each is connected to its left, right, lower, and upper neighbours. A
/// spacing of twice the particle radius puts every spring at rest length.
#[derive(Debug, Clone)]
pub struct LatticeBuilder {
    columns: usize,
    rows: usize,
    spacing: f64,
    origin: DVec2,
    restraints: Vec<(usize, Restraint)>,
    loads: Vec<(usize, DVec2)>,
}

impl LatticeBuilder {
    pub fn new(columns: usize, rows: usize, spacing: f64) -> Self {
        Self {
            columns,
            rows,
            spacing,
            origin: DVec2::ZERO,
            restraints: Vec::new(),
            loads: Vec::new(),
        }
    }

    pub fn origin(mut self, origin: DVec2) -> Self {
        self.origin = origin;
        self
    }

    /// Index of the particle at `(column, row)`.
    pub fn index(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fully restrains every particle in a column.
    pub fn fix_column(mut self, column: usize) -> Self {
        for row in 0..self.rows {
            let index = self.index(column, row);
            self.restraints.push((index, Restraint::FIXED));
        }
        self
    }

    pub fn fix_particle(mut self, index: usize, restraint: Restraint) -> Self {
        self.restraints.push((index, restraint));
        self
    }

    /// Adds an external force to a particle. Repeated loads on one particle accumulate.
    pub fn load_particle(mut self, index: usize, force: DVec2) -> Self {
        self.loads.push((index, force));
        self
    }

    pub fn build(&self) -> Result<MeshRecord> {
        let count = self.len();
        if let Some(&(index, _)) = self.restraints.iter().find(|(i, _)| *i >= count) {
            return Err(out_of_lattice(index, count));
        }
        if let Some(&(index, _)) = self.loads.iter().find(|(i, _)| *i >= count) {
            return Err(out_of_lattice(index, count));
        }

        let mut coordinates = Vec::with_capacity(count);
        let mut connect = Vec::with_capacity(count);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let pos = self.origin + DVec2::new(column as f64, row as f64) * self.spacing;
                coordinates.push(pos.to_array());

                let mut neighbours = Vec::with_capacity(4);
                if column > 0 {
                    neighbours.push(self.index(column - 1, row));
                }
                if column + 1 < self.columns {
                    neighbours.push(self.index(column + 1, row));
                }
                if row > 0 {
                    neighbours.push(self.index(column, row - 1));
                }
                if row + 1 < self.rows {
                    neighbours.push(self.index(column, row + 1));
                }
                let mut slots = vec![0_i64; 5];
                slots[0] = neighbours.len() as i64;
                for (slot, k) in slots[1..].iter_mut().zip(&neighbours) {
                    *slot = *k as i64 + 1;
                }
                connect.push(slots);
            }
        }

        let mut forces = vec![0.0; 2 * count];
        for &(index, force) in &self.loads {
            forces[2 * index] += force.x;
            forces[2 * index + 1] += force.y;
        }
        let mut restrictions = vec![0.0; 2 * count];
        for &(index, restraint) in &self.restraints {
            if restraint.x {
                restrictions[2 * index] = 1.0;
            }
            if restraint.y {
                restrictions[2 * index + 1] = 1.0;
            }
        }

        Ok(MeshRecord {
            coordinates,
            connect,
            forces: forces.into(),
            restrictions: restrictions.into(),
        })
    }
}

fn out_of_lattice(index: usize, count: usize) -> DemError {
    DemError::MalformedInput(format!(
        "particle {index} is outside a lattice of {count} particles"
    ))
}
