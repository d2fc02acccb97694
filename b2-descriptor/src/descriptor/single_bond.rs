use ndarray::{Array1, Array3, ArrayView3, Axis};
use ndarray::parallel::prelude::*;

use super::DescriptorShape;

/// Density expansion coefficients of a single atomic environment (the
/// "single bond" vector) and their gradients with respect to the displacement
/// of each neighbor.
///
/// Coefficients are stored in a flat array of size `n_species * max_radial *
/// n_harmonics`, see [`DescriptorShape::bond_index`] for the layout.
#[derive(Debug, Clone)]
pub struct SingleBond {
    shape: DescriptorShape,
    /// Values of the coefficients, `g_n(r_j) * Y_lm(r_j)` summed over all
    /// neighbors `j` of the corresponding species
    pub values: Array1<f64>,
    /// Gradients of the coefficients, as a `(n_bond, n_neighbors, 3)` array.
    /// `gradients[[idx, jj, :]]` is only non-zero if neighbor `jj` has the
    /// species of the `idx` coefficient.
    pub gradients: Array3<f64>,
}

impl SingleBond {
    /// Create zero-initialized storage for the given shape, with no neighbors
    pub fn new(shape: DescriptorShape) -> SingleBond {
        SingleBond {
            shape: shape,
            values: Array1::zeros(shape.n_bond()),
            gradients: Array3::zeros((shape.n_bond(), 0, 3)),
        }
    }

    pub fn shape(&self) -> DescriptorShape {
        self.shape
    }

    /// Number of neighbors used in the last call to `compute`
    pub fn n_neighbors(&self) -> usize {
        self.gradients.shape()[1]
    }

    /// Build the single bond vector and gradients from the radial and angular
    /// basis tables of all neighbors.
    ///
    /// `species` contains the species label of each neighbor, `radial` is a
    /// `(n_neighbors, max_radial, 4)` array and `angular` a `(n_neighbors,
    /// n_harmonics, 4)` array, where the last axis contains the value of the
    /// basis function and its gradient with respect to the neighbor
    /// displacement.
    ///
    /// The work is split over the `(n, lm)` channels, each one looping over
    /// all neighbors in order. Every output element is then written by a
    /// single rayon task, and the result does not depend on the number of
    /// threads.
    #[time_graph::instrument(name = "SingleBond::compute")]
    pub fn compute(&mut self, species: &[usize], radial: ArrayView3<'_, f64>, angular: ArrayView3<'_, f64>) {
        let n_neighbors = species.len();
        let max_radial = self.shape.max_radial;
        let n_harmonics = self.shape.n_harmonics();

        assert_eq!(
            radial.shape(), [n_neighbors, max_radial, 4],
            "wrong shape for the radial basis table, expected ({}, {}, 4)",
            n_neighbors, max_radial
        );
        assert_eq!(
            angular.shape(), [n_neighbors, n_harmonics, 4],
            "wrong shape for the angular basis table, expected ({}, {}, 4)",
            n_neighbors, n_harmonics
        );
        for &s in species {
            assert!(
                s < self.shape.n_species,
                "neighbor species {} is out of range, expected a value below {}",
                s, self.shape.n_species
            );
        }

        // all the zeroing happens here, before any accumulation
        self.values.fill(0.0);
        if n_neighbors == self.n_neighbors() {
            self.gradients.fill(0.0);
        } else {
            self.gradients = Array3::zeros((self.shape.n_bond(), n_neighbors, 3));
        }

        if n_neighbors == 0 {
            return;
        }

        let n_species = self.shape.n_species;
        let n_nlm = max_radial * n_harmonics;

        let mut values = self.values.view_mut()
            .into_shape_with_order((n_species, n_nlm))
            .expect("single bond values should be contiguous");
        let mut gradients = self.gradients.view_mut()
            .into_shape_with_order((n_species, n_nlm, n_neighbors, 3))
            .expect("single bond gradients should be contiguous");

        values.axis_iter_mut(Axis(1)).into_par_iter()
            .zip(gradients.axis_iter_mut(Axis(1)).into_par_iter())
            .enumerate()
            .for_each(|(nlm, (mut values, mut gradients))| {
                let n = nlm / n_harmonics;
                let lm = nlm % n_harmonics;

                for (jj, &s) in species.iter().enumerate() {
                    let g = radial[[jj, n, 0]];
                    let h = angular[[jj, lm, 0]];

                    values[s] += g * h;

                    // each neighbor owns its gradient slot, no accumulation
                    for d in 0..3 {
                        let dg = radial[[jj, n, d + 1]];
                        let dh = angular[[jj, lm, d + 1]];
                        gradients[[s, jj, d]] = dg * h + g * dh;
                    }
                }
            });
    }
}
