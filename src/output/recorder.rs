use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::core::{Dof, ParticleSystem};
use crate::error::Result;

/// Displacement history of the monitored DOF, one value per step.
///
/// Serializes as `{"dof": 33, "resultado": [...]}`, the result file layout
/// that the plotting tools consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplacementSeries {
    /// Flattened index of the monitored DOF.
    pub dof: usize,
    #[serde(rename = "resultado")]
    pub values: Vec<f64>,
}

impl DisplacementSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Samples one DOF after every step.
#[derive(Debug, Clone)]
pub struct ResultRecorder {
    dof: Dof,
    values: Vec<f64>,
}

impl ResultRecorder {
    pub fn new(dof: Dof, capacity: usize) -> Self {
        Self {
            dof,
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn dof(&self) -> Dof {
        self.dof
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Records the monitored displacement and returns it.
    pub fn sample(&mut self, system: &ParticleSystem) -> f64 {
        let value = system.displacement(self.dof).unwrap_or(0.0);
        self.values.push(value);
        value
    }

    pub fn finish(self) -> DisplacementSeries {
        DisplacementSeries {
            dof: self.dof.flat_index(),
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Axis, Particle, Topology};
    use glam::DVec2;

    #[test]
    fn samples_follow_the_monitored_axis() {
        let mut system = ParticleSystem::new(vec![Particle::default(); 2], Topology::isolated(2)).unwrap();
        let mut recorder = ResultRecorder::new(Dof::new(1, Axis::Y), 2);

        system.particles_mut()[1].displacement = DVec2::new(5.0, -0.25);
        assert_eq!(recorder.sample(&system), -0.25);
        system.particles_mut()[1].displacement = DVec2::new(5.0, 0.5);
        recorder.sample(&system);

        let series = recorder.finish();
        assert_eq!(series.dof, 3);
        assert_eq!(series.values, vec![-0.25, 0.5]);
    }

    #[test]
    fn series_uses_result_file_keys() {
        let series = DisplacementSeries {
            dof: 0,
            values: vec![0.0, 1.5],
        };
        let text = serde_json::to_string(&series).unwrap();
        assert_eq!(text, r#"{"dof":0,"resultado":[0.0,1.5]}"#);
    }
}
