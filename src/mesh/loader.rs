use glam::DVec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::record::MeshRecord;
use crate::core::{Particle, ParticleSystem, Restraint, Topology};
use crate::error::{DemError, Result};

/// How the loader treats an adjacency entry whose reverse entry is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityPolicy {
    /// Fail with [`DemError::MalformedInput`].
    #[default]
    Reject,
    /// Append the missing reverse entries.
    Symmetrize,
}

/// Turns a [`MeshRecord`] into a validated [`ParticleSystem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshLoader {
    pub policy: ConnectivityPolicy,
}

impl MeshLoader {
    pub fn new(policy: ConnectivityPolicy) -> Self {
        Self { policy }
    }

    pub fn load(&self, record: &MeshRecord) -> Result<ParticleSystem> {
        let count = record.particle_count();
        let dofs = 2 * count;

        if record.connect.len() != count {
            return Err(malformed(format!(
                "{count} coordinates but {} connect rows",
                record.connect.len()
            )));
        }
        if record.forces.len() != dofs {
            return Err(malformed(format!(
                "expected {dofs} force entries, found {}",
                record.forces.len()
            )));
        }
        if record.restrictions.len() != dofs {
            return Err(malformed(format!(
                "expected {dofs} restriction entries, found {}",
                record.restrictions.len()
            )));
        }

        let forces = record.forces.to_flat();
        let restrictions = record
            .restrictions
            .to_flat()
            .into_iter()
            .enumerate()
            .map(|(dof, flag)| parse_flag(dof, flag))
            .collect::<Result<Vec<_>>>()?;

        let mut particles = Vec::with_capacity(count);
        for (i, coords) in record.coordinates.iter().enumerate() {
            let reference = DVec2::from_array(*coords);
            if !reference.is_finite() {
                return Err(malformed(format!("particle {i} has non-finite coordinates")));
            }
            let force = DVec2::new(forces[2 * i], forces[2 * i + 1]);
            if !force.is_finite() {
                return Err(malformed(format!("particle {i} has a non-finite force")));
            }
            let restraint = Restraint::new(restrictions[2 * i], restrictions[2 * i + 1]);
            particles.push(
                Particle::new(reference)
                    .with_restraint(restraint)
                    .with_external_force(force),
            );
        }

        let rows = record
            .connect
            .iter()
            .enumerate()
            .map(|(j, row)| parse_row(j, row, count))
            .collect::<Result<Vec<_>>>()?;
        let mut topology = Topology::from_rows(&rows);

        let missing = topology.missing_reverse_edges();
        if let Some(&(i, k)) = missing.first() {
            match self.policy {
                ConnectivityPolicy::Reject => {
                    return Err(malformed(format!(
                        "particle {} lists {} as a neighbour but not vice versa ({} one-sided entries)",
                        i + 1,
                        k + 1,
                        missing.len()
                    )));
                }
                ConnectivityPolicy::Symmetrize => {
                    let (symmetric, added) = topology.symmetrized();
                    warn!("connectivity was one-sided; added {added} reverse adjacency entries");
                    topology = symmetric;
                }
            }
        }

        debug!(
            "loaded mesh: {count} particles, {} adjacency entries",
            topology.entry_count()
        );
        ParticleSystem::new(particles, topology)
    }
}

/// Loads a record with the default (rejecting) connectivity policy.
pub fn load(record: &MeshRecord) -> Result<ParticleSystem> {
    MeshLoader::default().load(record)
}

fn malformed(msg: String) -> DemError {
    DemError::MalformedInput(msg)
}

fn parse_flag(dof: usize, value: f64) -> Result<bool> {
    if value == 0.0 {
        Ok(false)
    } else if value == 1.0 {
        Ok(true)
    } else {
        Err(malformed(format!(
            "restriction flag for DOF {dof} must be 0 or 1, got {value}"
        )))
    }
}

/// Converts one `[count, k1, ..., 0, ...]` row into 0-based neighbour indices.
fn parse_row(j: usize, row: &[i64], count: usize) -> Result<Vec<usize>> {
    let Some((&declared, slots)) = row.split_first() else {
        return Ok(Vec::new());
    };
    if declared < 0 {
        return Err(malformed(format!(
            "particle {} declares a negative neighbour count {declared}",
            j + 1
        )));
    }
    if declared as usize > slots.len() {
        return Err(malformed(format!(
            "particle {} declares {declared} neighbours but its row has {} slots",
            j + 1,
            slots.len()
        )));
    }

    let mut neighbors = Vec::with_capacity(declared as usize);
    for &slot in slots.iter().filter(|&&slot| slot != 0) {
        if slot < 0 || slot as usize > count {
            return Err(malformed(format!(
                "particle {} references neighbour {slot}, valid range is 1..={count}",
                j + 1
            )));
        }
        let k = slot as usize - 1;
        if k == j {
            return Err(malformed(format!("particle {} lists itself as a neighbour", j + 1)));
        }
        if neighbors.contains(&k) {
            return Err(malformed(format!(
                "particle {} lists neighbour {slot} twice",
                j + 1
            )));
        }
        neighbors.push(k);
    }

    if neighbors.len() != declared as usize {
        return Err(malformed(format!(
            "particle {} declares {declared} neighbours but lists {}",
            j + 1,
            neighbors.len()
        )));
    }
    Ok(neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(connect: Vec<Vec<i64>>) -> MeshRecord {
        let n = connect.len();
        MeshRecord {
            coordinates: (0..n).map(|i| [2.0 * i as f64, 0.0]).collect(),
            connect,
            forces: vec![0.0; 2 * n].into(),
            restrictions: vec![0.0; 2 * n].into(),
        }
    }

    #[test]
    fn neighbours_are_translated_to_zero_based() {
        let system = load(&record(vec![vec![1, 2, 0], vec![2, 1, 3], vec![1, 2, 0]])).unwrap();
        assert_eq!(system.topology().neighbors(0), &[1]);
        assert_eq!(system.topology().neighbors(1), &[0, 2]);
    }

    #[test]
    fn empty_and_zero_count_rows_mean_isolated() {
        let system = load(&record(vec![vec![], vec![0, 0, 0]])).unwrap();
        assert_eq!(system.topology().entry_count(), 0);
    }

    #[test]
    fn negative_count_is_malformed() {
        let err = parse_row(0, &[-1, 2], 2).unwrap_err();
        assert!(matches!(err, DemError::MalformedInput(_)));
    }

    #[test]
    fn count_must_match_listed_neighbours() {
        assert!(parse_row(0, &[2, 2, 0], 3).is_err());
        assert!(parse_row(0, &[3, 2, 3], 3).is_err());
    }

    #[test]
    fn self_reference_and_duplicates_are_malformed() {
        assert!(parse_row(1, &[1, 2], 3).is_err());
        assert!(parse_row(0, &[2, 2, 2], 3).is_err());
    }

    #[test]
    fn restriction_flags_must_be_binary() {
        let mut rec = record(vec![vec![0], vec![0]]);
        rec.restrictions = vec![0.0, 0.5, 0.0, 0.0].into();
        assert!(matches!(load(&rec), Err(DemError::MalformedInput(_))));
    }

    #[test]
    fn one_sided_edge_depends_on_policy() {
        let rec = record(vec![vec![1, 2], vec![0]]);
        assert!(matches!(load(&rec), Err(DemError::MalformedInput(_))));

        let system = MeshLoader::new(ConnectivityPolicy::Symmetrize).load(&rec).unwrap();
        assert_eq!(system.topology().neighbors(1), &[0]);
    }

    #[test]
    fn boundary_data_lands_on_particles() {
        let mut rec = record(vec![vec![0], vec![0]]);
        rec.forces = vec![0.0, 0.0, 3.0, -4.0].into();
        rec.restrictions = vec![1.0, 0.0, 0.0, 0.0].into();
        let system = load(&rec).unwrap();
        assert_eq!(system.particles()[1].external_force, DVec2::new(3.0, -4.0));
        assert_eq!(system.particles()[0].restraint, Restraint::new(true, false));
    }
}
