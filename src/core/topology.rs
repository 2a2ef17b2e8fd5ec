use crate::error::{DemError, Result};

/// Static neighbour lists stored as compressed rows with 0-based indices.
///
/// Row `i` lists the particles that `i` exerts a spring reaction against. A
/// physical edge appears in both endpoint rows; [`Topology::missing_reverse_edges`]
/// reports entries that break that rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
}

impl Topology {
    /// Topology with `count` particles and no edges.
    pub fn isolated(count: usize) -> Self {
        Self {
            offsets: vec![0; count + 1],
            neighbors: Vec::new(),
        }
    }

    /// Packs per-particle rows. Indices are trusted; the loader checks them.
    pub fn from_rows<R>(rows: &[R]) -> Self
    where
        R: AsRef<[usize]>,
    {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut neighbors = Vec::with_capacity(rows.iter().map(|r| r.as_ref().len()).sum());
        offsets.push(0);
        for row in rows {
            neighbors.extend_from_slice(row.as_ref());
            offsets.push(neighbors.len());
        }
        Self { offsets, neighbors }
    }

    /// Adopts prebuilt compressed rows after checking that `offsets` starts at
    /// zero, never decreases, and ends at `neighbors.len()`.
    pub fn from_csr(offsets: Vec<usize>, neighbors: Vec<usize>) -> Result<Self> {
        if offsets.first() != Some(&0) {
            return Err(DemError::MalformedInput(
                "row offsets must start at 0".to_string(),
            ));
        }
        if let Some(row) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(DemError::MalformedInput(format!(
                "row offsets decrease at row {row}"
            )));
        }
        if offsets.last() != Some(&neighbors.len()) {
            return Err(DemError::MalformedInput(format!(
                "row offsets end at {:?} but {} neighbour entries are stored",
                offsets.last(),
                neighbors.len()
            )));
        }
        Ok(Self { offsets, neighbors })
    }

    /// Number of particles (rows).
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn neighbors(&self, particle: usize) -> &[usize] {
        &self.neighbors[self.offsets[particle]..self.offsets[particle + 1]]
    }

    /// Total number of directed adjacency entries (twice the edge count when symmetric).
    pub fn entry_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.neighbors(from).contains(&to)
    }

    /// Entries `(i, k)` whose reverse `(k, i)` is absent from row `k`.
    pub fn missing_reverse_edges(&self) -> Vec<(usize, usize)> {
        (0..self.len())
            .flat_map(|i| self.neighbors(i).iter().map(move |&k| (i, k)))
            .filter(|&(i, k)| !self.contains(k, i))
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        self.missing_reverse_edges().is_empty()
    }

    /// Copy of this topology with every missing reverse entry appended to its row.
    /// Returns the new topology and the number of entries added.
    pub fn symmetrized(&self) -> (Self, usize) {
        let mut rows: Vec<Vec<usize>> = (0..self.len()).map(|i| self.neighbors(i).to_vec()).collect();
        let missing = self.missing_reverse_edges();
        for &(i, k) in &missing {
            rows[k].push(i);
        }
        (Self::from_rows(&rows), missing.len())
    }
}
