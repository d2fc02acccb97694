use ndarray::{Array1, Array3, Axis, Zip};
use ndarray::parallel::prelude::*;

use super::{DescriptorShape, RadialPairs, SingleBond};

/// Two-body rotational invariants of an atomic environment, and their
/// gradients with respect to the displacement of each neighbor.
///
/// For each pair of radial channels `n1 <= n2` and angular degree `l`, the
/// descriptor is `B2(n1, n2, l) = sum_m c(n1, l, m) c(n2, l, m)`, where `c`
/// are the single bond coefficients. Use [`RadialPairs`] to map between flat
/// indexes and `(n1, n2, l)`.
#[derive(Debug, Clone)]
pub struct B2 {
    shape: DescriptorShape,
    /// Values of the descriptor, of size `n_descriptors`
    pub values: Array1<f64>,
    /// Gradients of the descriptor as a `(n_neighbors, 3, n_descriptors)`
    /// array
    pub gradients: Array3<f64>,
}

impl B2 {
    pub fn new(shape: DescriptorShape) -> B2 {
        B2 {
            shape: shape,
            values: Array1::zeros(shape.n_descriptors()),
            gradients: Array3::zeros((0, 3, shape.n_descriptors())),
        }
    }

    pub fn shape(&self) -> DescriptorShape {
        self.shape
    }

    pub fn n_neighbors(&self) -> usize {
        self.gradients.shape()[0]
    }

    /// Contract the single bond coefficients over `m` to build the B2
    /// descriptor and its gradients. Each descriptor is computed by a single
    /// rayon task, which writes both the value and the full gradient column.
    #[time_graph::instrument(name = "B2::compute")]
    pub fn compute(&mut self, bond: &SingleBond) {
        assert_eq!(
            bond.shape(), self.shape,
            "the single bond and B2 shapes must match"
        );

        let n_neighbors = bond.n_neighbors();
        if n_neighbors != self.n_neighbors() {
            self.gradients = Array3::zeros((n_neighbors, 3, self.shape.n_descriptors()));
        }

        let n_harmonics = self.shape.n_harmonics();
        let pairs = RadialPairs::new(&self.shape);

        let values = self.values.as_slice_mut().expect("B2 values should be contiguous");
        values.par_iter_mut()
            .zip(self.gradients.axis_iter_mut(Axis(2)).into_par_iter())
            .enumerate()
            .for_each(|(nnl, (value, mut gradient))| {
                let [n1, n2, l] = pairs.feature(nnl);

                let mut sum = 0.0;
                gradient.fill(0.0);
                for m in 0..(2 * l + 1) {
                    let n1_l = n1 * n_harmonics + l * l + m;
                    let n2_l = n2 * n_harmonics + l * l + m;

                    let single_1 = bond.values[n1_l];
                    let single_2 = bond.values[n2_l];
                    sum += single_1 * single_2;

                    Zip::from(&mut gradient)
                        .and(bond.gradients.index_axis(Axis(0), n1_l))
                        .and(bond.gradients.index_axis(Axis(0), n2_l))
                        .for_each(|gradient, &d_single_1, &d_single_2| {
                            *gradient += single_1 * d_single_2 + d_single_1 * single_2;
                        });
                }
                *value = sum;
            });
    }
}
