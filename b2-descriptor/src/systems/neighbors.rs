/// Mask used by LAMMPS to remove the special bonds bits stored in the two
/// highest bits of neighbor indices.
pub const NEIGHMASK: usize = 0x1FFF_FFFF;

/// Per-center lists of neighbor indices, stored contiguously.
///
/// Neighbor indices can carry auxiliary information in their high bits (as
/// LAMMPS does for special bonds); these bits are removed with `mask` when
/// reading the neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborList {
    mask: usize,
    centers: Vec<usize>,
    /// `neighbors[offsets[i]..offsets[i + 1]]` are the neighbors of
    /// `centers[i]`
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
}

impl Default for NeighborList {
    fn default() -> NeighborList {
        NeighborList::with_mask(NEIGHMASK)
    }
}

impl NeighborList {
    /// Create an empty neighbor list using [`NEIGHMASK`]
    pub fn new() -> NeighborList {
        NeighborList::default()
    }

    /// Create an empty neighbor list, using the given `mask` to get the
    /// actual atom index from the stored neighbor indices
    pub fn with_mask(mask: usize) -> NeighborList {
        NeighborList {
            mask: mask,
            centers: Vec::new(),
            offsets: vec![0],
            neighbors: Vec::new(),
        }
    }

    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Add a center and its (unmasked) neighbors to this list
    pub fn add_center(&mut self, center: usize, neighbors: &[usize]) {
        self.centers.push(center);
        self.neighbors.extend_from_slice(neighbors);
        self.offsets.push(self.neighbors.len());
    }

    /// Number of centers in this list
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Indexes of all centers, in the order they were added
    pub fn centers(&self) -> &[usize] {
        &self.centers
    }

    /// Neighbors of the `i`-th center, as stored (including auxiliary bits)
    pub fn raw_neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Neighbors of the `i`-th center, with auxiliary bits removed
    pub fn neighbors(&self, i: usize) -> impl ExactSizeIterator<Item = usize> + '_ {
        let mask = self.mask;
        self.raw_neighbors(i).iter().map(move |&j| j & mask)
    }
}
