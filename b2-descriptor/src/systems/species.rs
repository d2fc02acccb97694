use indexmap::IndexSet;

use crate::Error;

/// Mapping from atomic types (as used by the simulation engine) to the
/// species labels `0..n_species` used to select blocks of the single bond
/// vector. Labels follow the order in which the types were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesMapping {
    types: IndexSet<i32>,
}

impl SpeciesMapping {
    pub fn new(types: &[i32]) -> Result<SpeciesMapping, Error> {
        if types.is_empty() {
            return Err(Error::InvalidParameter("expected at least one species".into()));
        }

        let mut set = IndexSet::new();
        for &atomic_type in types {
            if !set.insert(atomic_type) {
                return Err(Error::InvalidParameter(format!(
                    "atomic type {} is present multiple times in species", atomic_type
                )));
            }
        }

        return Ok(SpeciesMapping { types: set });
    }

    /// LAMMPS-style mapping, where types `1..=n_types` map to species
    /// `0..n_types`
    pub fn lammps(n_types: usize) -> Result<SpeciesMapping, Error> {
        let types = (1..=n_types as i32).collect::<Vec<_>>();
        return SpeciesMapping::new(&types);
    }

    /// Number of species
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get the species label for the given atomic type
    pub fn species(&self, atomic_type: i32) -> Result<usize, Error> {
        self.types.get_index_of(&atomic_type).ok_or_else(|| Error::InvalidParameter(format!(
            "atomic type {} is not part of the species", atomic_type
        )))
    }

    /// Get the atomic type corresponding to a species label
    pub fn atomic_type(&self, species: usize) -> Option<i32> {
        self.types.get_index(species).copied()
    }

    /// All atomic types, in species order
    pub fn types(&self) -> impl ExactSizeIterator<Item = i32> + '_ {
        self.types.iter().copied()
    }
}
