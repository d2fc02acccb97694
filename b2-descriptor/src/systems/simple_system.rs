use crate::{Error, Vector3D};

/// A simple set of atoms, with atomic types and positions.
///
/// The positions should include any ghost atom (periodic image) referenced by
/// the neighbor lists.
#[derive(Clone, Debug, Default)]
pub struct SimpleSystem {
    types: Vec<i32>,
    positions: Vec<Vector3D>,
}

impl SimpleSystem {
    /// Create a new empty system
    pub fn new() -> SimpleSystem {
        SimpleSystem::default()
    }

    /// Create a system from existing types and positions, which must have the
    /// same length
    pub fn from_parts(types: Vec<i32>, positions: Vec<Vector3D>) -> Result<SimpleSystem, Error> {
        if types.len() != positions.len() {
            return Err(Error::InvalidParameter(format!(
                "got {} atomic types but {} positions", types.len(), positions.len()
            )));
        }
        return Ok(SimpleSystem { types, positions });
    }

    /// Add an atom with the given atomic type and position to this system
    pub fn add_atom(&mut self, atomic_type: i32, position: Vector3D) {
        self.types.push(atomic_type);
        self.positions.push(position);
    }

    /// Get the number of atoms in this system
    pub fn size(&self) -> usize {
        self.types.len()
    }

    /// Get the atomic types for all atoms in this system
    pub fn types(&self) -> &[i32] {
        &self.types
    }

    /// Get the positions for all atoms in this system
    pub fn positions(&self) -> &[Vector3D] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vector3D] {
        &mut self.positions
    }
}
