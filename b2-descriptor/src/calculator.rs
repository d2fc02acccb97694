use std::cell::RefCell;

use log::{debug, warn};
use ndarray::{Array1, Array3};
use rayon::prelude::*;
use thread_local::ThreadLocal;

use crate::basis::{BasisTables, RadialBasis, RadialBasisCache, SphericalHarmonicsCache};
use crate::math::CutoffFunction;
use crate::systems::{NeighborList, SimpleSystem, SpeciesMapping};
use crate::{DescriptorShape, Error, SingleBond, Vector3D, B2};

/// Parameters for the B2 descriptor calculator.
///
/// The B2 descriptor of an atom is built from the expansion of its neighbors
/// density on a radial basis `g_n(r) = R_n(r) f_c(r)` (one set of radial
/// channels per species) and real spherical harmonics `Y_lm`:
///
/// `c(n, l, m) = \sum_j g_n(r_j) Y_lm(r_j)`
///
/// `B2(n1, n2, l) = \sum_m c(n1, l, m) c(n2, l, m)`
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct B2Parameters {
    /// Spherical cutoff to use for atomic environments
    pub cutoff: f64,
    /// Number of radial basis function to use for each species
    pub max_radial: usize,
    /// Maximal angular degree of the spherical harmonics
    pub max_angular: usize,
    /// Atomic types of the neighbors, in the order defining the species
    /// channels
    pub species: Vec<i32>,
    /// radial basis to use for the radial table
    #[serde(default)]
    pub radial_basis: RadialBasis,
    /// cutoff function used to smooth the behavior around the cutoff radius
    #[serde(default)]
    pub cutoff_function: CutoffFunction,
}

impl B2Parameters {
    /// Check that all parameters have valid values
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "cutoff must be a positive number, got {}", self.cutoff
            )));
        }

        if self.max_radial == 0 {
            return Err(Error::InvalidParameter("max_radial must be at least 1".into()));
        }

        SpeciesMapping::new(&self.species)?;
        self.radial_basis.validate(self.cutoff)?;
        self.cutoff_function.validate(self.cutoff)?;

        return Ok(());
    }

    /// Get the sizes of the descriptor for these parameters
    pub fn shape(&self) -> DescriptorShape {
        DescriptorShape::new(self.species.len(), self.max_radial, self.max_angular)
    }
}

/// B2 descriptor and gradients for one center
#[derive(Debug, Clone)]
pub struct AtomDescriptor {
    /// Index of the center in the system
    pub center: usize,
    /// Indexes of the neighbors in the system, with auxiliary bits removed.
    /// These are in the same order as the first axis of `gradients`.
    pub neighbors: Vec<usize>,
    /// B2 descriptor values, of size `n_descriptors`
    pub values: Array1<f64>,
    /// Gradients with respect to the displacement of each neighbor, as a
    /// `(n_neighbors, 3, n_descriptors)` array
    pub gradients: Array3<f64>,
}

/// Calculator for the B2 descriptor of atoms in a system
pub struct B2Calculator {
    parameters: B2Parameters,
    species: SpeciesMapping,
    shape: DescriptorShape,
    radial: ThreadLocal<RefCell<RadialBasisCache>>,
    angular: ThreadLocal<RefCell<SphericalHarmonicsCache>>,
}

impl std::fmt::Debug for B2Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.parameters)
    }
}

impl B2Calculator {
    /// Create a new `B2Calculator` with the given parameters
    pub fn new(parameters: B2Parameters) -> Result<B2Calculator, Error> {
        parameters.validate()?;

        let species = SpeciesMapping::new(&parameters.species)?;
        let shape = parameters.shape();
        debug!(
            "created B2 calculator with {} species, {} radial and {} angular channels ({} descriptors)",
            shape.n_species, shape.n_radial(), shape.n_harmonics(), shape.n_descriptors()
        );

        return Ok(B2Calculator {
            parameters,
            species,
            shape,
            radial: ThreadLocal::new(),
            angular: ThreadLocal::new(),
        });
    }

    /// Create a new `B2Calculator` with parameters given as JSON
    pub fn from_json(parameters: &str) -> Result<B2Calculator, Error> {
        let parameters = serde_json::from_str::<B2Parameters>(parameters)?;
        return B2Calculator::new(parameters);
    }

    /// Get the parameters used to create this calculator, formatted as JSON
    pub fn parameters(&self) -> String {
        serde_json::to_string(&self.parameters).expect("failed to serialize to JSON")
    }

    pub fn shape(&self) -> DescriptorShape {
        self.shape
    }

    pub fn species(&self) -> &SpeciesMapping {
        &self.species
    }

    /// Compute the radial and angular basis tables for the given neighbor
    /// displacements (from the center to each neighbor)
    pub fn compute_tables(&self, displacements: &[Vector3D]) -> Result<BasisTables, Error> {
        let mut radial = self.radial.get_or(|| {
            RefCell::new(RadialBasisCache::new(
                self.parameters.radial_basis,
                self.parameters.cutoff_function,
                self.parameters.cutoff,
                self.parameters.max_radial,
            ))
        }).borrow_mut();

        let mut angular = self.angular.get_or(|| {
            RefCell::new(SphericalHarmonicsCache::new(self.parameters.max_angular))
        }).borrow_mut();

        let mut tables = BasisTables::new(self.shape.max_radial, self.shape.n_harmonics());
        tables.compute(&mut radial, &mut angular, displacements)?;
        return Ok(tables);
    }

    /// Compute the B2 descriptor for a single center, given the displacement
    /// to each neighbor and their species labels.
    pub fn compute_atom(&self, displacements: &[Vector3D], species: &[usize]) -> Result<B2, Error> {
        if displacements.len() != species.len() {
            return Err(Error::InvalidParameter(format!(
                "got {} displacements but {} species", displacements.len(), species.len()
            )));
        }

        if let Some(&s) = species.iter().find(|&&s| s >= self.shape.n_species) {
            return Err(Error::InvalidParameter(format!(
                "species {} is out of range, expected a value below {}", s, self.shape.n_species
            )));
        }

        // the thread local caches are released here, before the kernels start
        // running in parallel
        let tables = self.compute_tables(displacements)?;

        let mut bond = SingleBond::new(self.shape);
        bond.compute(species, tables.radial.view(), tables.angular.view());

        let mut b2 = B2::new(self.shape);
        b2.compute(&bond);

        return Ok(b2);
    }

    /// Compute the B2 descriptor for all the centers in `neighbors`, using
    /// atomic types and positions from `system`.
    ///
    /// The output contains one [`AtomDescriptor`] per center, in the same
    /// order as `neighbors.centers()`.
    #[time_graph::instrument(name = "B2Calculator::compute")]
    pub fn compute(&self, system: &SimpleSystem, neighbors: &NeighborList) -> Result<Vec<AtomDescriptor>, Error> {
        debug!(
            "computing B2 descriptor for {} centers in a system with {} atoms",
            neighbors.len(), system.size()
        );

        return (0..neighbors.len()).into_par_iter()
            .map(|i| self.compute_center(system, neighbors, i))
            .collect();
    }

    fn compute_center(&self, system: &SimpleSystem, neighbors: &NeighborList, i: usize) -> Result<AtomDescriptor, Error> {
        let positions = system.positions();
        let types = system.types();

        let center = neighbors.centers()[i];
        if center >= system.size() {
            return Err(Error::InvalidParameter(format!(
                "center {} is outside of the system ({} atoms)", center, system.size()
            )));
        }

        let n_neighbors = neighbors.neighbors(i).len();
        let mut indexes = Vec::with_capacity(n_neighbors);
        let mut displacements = Vec::with_capacity(n_neighbors);
        let mut species = Vec::with_capacity(n_neighbors);
        for j in neighbors.neighbors(i) {
            if j >= system.size() {
                return Err(Error::InvalidParameter(format!(
                    "neighbor {} of center {} is outside of the system ({} atoms)",
                    j, center, system.size()
                )));
            }

            indexes.push(j);
            displacements.push(positions[j] - positions[center]);
            species.push(self.species.species(types[j])?);
        }

        if let Some(message) = empty_environment(center, &displacements, self.parameters.cutoff) {
            warn!("{}", message);
        }

        let b2 = self.compute_atom(&displacements, &species)?;
        return Ok(AtomDescriptor {
            center: center,
            neighbors: indexes,
            values: b2.values,
            gradients: b2.gradients,
        });
    }
}

/// Message to log for a center without any neighbor contributing to its
/// descriptor, or `None` if at least one neighbor is inside the cutoff
fn empty_environment(center: usize, displacements: &[Vector3D], cutoff: f64) -> Option<String> {
    if displacements.is_empty() {
        return Some(format!("center {} has no neighbors", center));
    }

    if displacements.iter().all(|d| d.norm() >= cutoff) {
        return Some(format!(
            "center {} has {} neighbors, but none of them are inside the cutoff",
            center, displacements.len()
        ));
    }

    return None;
}
