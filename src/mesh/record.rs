use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-DOF values as they appear in exported meshes.
///
/// Exporters write either a flat `[x0, y0, x1, y1, ...]` list or one
/// `[x, y]` pair per particle; both describe the same interleaved layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DofValues {
    Flat(Vec<f64>),
    Paired(Vec<[f64; 2]>),
}

impl Default for DofValues {
    fn default() -> Self {
        DofValues::Flat(Vec::new())
    }
}

impl DofValues {
    /// Number of scalar DOF entries.
    pub fn len(&self) -> usize {
        match self {
            DofValues::Flat(values) => values.len(),
            DofValues::Paired(pairs) => 2 * pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in flattened DOF order.
    pub fn to_flat(&self) -> Vec<f64> {
        match self {
            DofValues::Flat(values) => values.clone(),
            DofValues::Paired(pairs) => pairs.iter().flat_map(|p| p.iter().copied()).collect(),
        }
    }
}

impl From<Vec<f64>> for DofValues {
    fn from(values: Vec<f64>) -> Self {
        DofValues::Flat(values)
    }
}

/// Persisted mesh: reference coordinates, 1-based zero-padded adjacency, and boundary data.
///
/// ```json
/// {
///   "coordinates": [[0.0, 0.0], [2.0, 0.0]],
///   "connect": [[1, 2], [1, 1]],
///   "forces": [0, 0, 0, 0],
///   "restrictions": [0, 0, 1, 1]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub coordinates: Vec<[f64; 2]>,
    /// Rows of `[count, neighbour_1, ..., neighbour_count, 0, ...]`.
    pub connect: Vec<Vec<i64>>,
    pub forces: DofValues,
    pub restrictions: DofValues,
}

impl MeshRecord {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
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

    pub fn particle_count(&self) -> usize {
        self.coordinates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_and_paired_values_flatten_identically() {
        let flat: DofValues = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        let paired: DofValues = serde_json::from_str("[[1, 2], [3, 4]]").unwrap();
        assert_eq!(flat.to_flat(), paired.to_flat());
        assert_eq!(paired.len(), 4);
    }

    #[test]
    fn parses_exported_record() {
        let text = r#"{
            "coordinates": [[0, 0], [2.0, 0]],
            "connect": [[1, 2], [1, 1]],
            "forces": [0, 0, 0, 0],
            "restrictions": [[0, 0], [1, 1]]
        }"#;
        let record = MeshRecord::from_json_str(text).unwrap();
        assert_eq!(record.particle_count(), 2);
        assert_eq!(record.connect[0], vec![1, 2]);
        assert_eq!(record.restrictions.to_flat(), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn record_survives_json_writer() {
        let record = MeshRecord {
            coordinates: vec![[0.0, 0.0]],
            connect: vec![vec![0]],
            forces: vec![1.5, 0.0].into(),
            restrictions: vec![0.0, 1.0].into(),
        };
        let mut buffer = Vec::new();
        record.to_writer(&mut buffer).unwrap();
        let back = MeshRecord::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(back, record);
    }
}
