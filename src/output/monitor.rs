use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{Dof, ParticleSystem};
use crate::error::{DemError, Result};

/// Selects the degree of freedom whose displacement history is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorPolicy {
    /// Explicit DOF in flattened `[x0, y0, x1, y1, ...]` order.
    Fixed(usize),
    /// First DOF carrying a non-zero external force.
    #[default]
    FirstLoaded,
    /// First free DOF directly following a restrained one in flattened order.
    FirstFreeBesideRestraint,
}

/// DOF sampled when a scanning policy finds no match.
pub const FALLBACK_DOF: Dof = Dof {
    particle: 0,
    axis: crate::core::Axis::X,
};

impl MonitorPolicy {
    /// Resolves the policy against a loaded system.
    ///
    /// Scans that find nothing fall back to [`FALLBACK_DOF`]. A fixed index
    /// outside the system, or any policy on an empty system, is an error.
    pub fn resolve(&self, system: &ParticleSystem) -> Result<Dof> {
        if system.is_empty() {
            return Err(DemError::InvalidConfig(
                "cannot monitor a DOF of an empty particle system".to_string(),
            ));
        }

        let found = match *self {
            MonitorPolicy::Fixed(index) => {
                let dof = Dof::from_flat(index);
                if !system.contains_dof(dof) {
                    return Err(DemError::InvalidConfig(format!(
                        "monitored DOF {index} is out of range for {} DOFs",
                        system.dof_count()
                    )));
                }
                Some(dof)
            }
            MonitorPolicy::FirstLoaded => system.dofs().find(|&dof| system.external_force(dof) != 0.0),
            MonitorPolicy::FirstFreeBesideRestraint => {
                let dofs: Vec<Dof> = system.dofs().collect();
                dofs.windows(2)
                    .find(|pair| system.is_restrained(pair[0]) && !system.is_restrained(pair[1]))
                    .map(|pair| pair[1])
            }
        };

        Ok(found.unwrap_or_else(|| {
            warn!("monitor policy {self:?} matched no DOF; recording DOF {}", FALLBACK_DOF.flat_index());
            FALLBACK_DOF
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Axis;
    use crate::mesh::{load, MeshRecord};

    fn system(forces: Vec<f64>, restrictions: Vec<f64>) -> ParticleSystem {
        let n = forces.len() / 2;
        let record = MeshRecord {
            coordinates: (0..n).map(|i| [2.0 * i as f64, 0.0]).collect(),
            connect: vec![vec![0]; n],
            forces: forces.into(),
            restrictions: restrictions.into(),
        };
        load(&record).unwrap()
    }

    #[test]
    fn first_loaded_finds_first_nonzero_force() {
        let sys = system(vec![0.0, 0.0, 0.0, 0.0, 0.0, -3.0], vec![0.0; 6]);
        assert_eq!(MonitorPolicy::FirstLoaded.resolve(&sys).unwrap(), Dof::new(2, Axis::Y));
    }

    #[test]
    fn beside_restraint_skips_to_free_neighbour_dof() {
        let sys = system(vec![0.0; 6], vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        let dof = MonitorPolicy::FirstFreeBesideRestraint.resolve(&sys).unwrap();
        assert_eq!(dof, Dof::new(1, Axis::Y));
    }

    #[test]
    fn scans_without_match_fall_back_to_first_dof() {
        let sys = system(vec![0.0; 4], vec![0.0; 4]);
        assert_eq!(MonitorPolicy::FirstLoaded.resolve(&sys).unwrap(), FALLBACK_DOF);
        assert_eq!(
            MonitorPolicy::FirstFreeBesideRestraint.resolve(&sys).unwrap(),
            FALLBACK_DOF
        );
    }

    #[test]
    fn fixed_index_is_range_checked() {
        let sys = system(vec![0.0; 4], vec![0.0; 4]);
        assert_eq!(MonitorPolicy::Fixed(3).resolve(&sys).unwrap(), Dof::new(1, Axis::Y));
        assert!(matches!(
            MonitorPolicy::Fixed(4).resolve(&sys),
            Err(DemError::InvalidConfig(_))
        ));
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let fixed: MonitorPolicy = serde_json::from_str(r#"{"fixed": 33}"#).unwrap();
        assert_eq!(fixed, MonitorPolicy::Fixed(33));
        let scan: MonitorPolicy = serde_json::from_str(r#""first_loaded""#).unwrap();
        assert_eq!(scan, MonitorPolicy::FirstLoaded);
    }
}
