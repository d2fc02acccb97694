//! Reference providers for the radial and angular basis tables consumed by
//! [`SingleBond::compute`](crate::SingleBond::compute).

use ndarray::{Array3, Axis};

use crate::{Error, Vector3D};

mod radial;
pub use self::radial::{RadialBasis, RadialBasisCache};

mod angular;
pub use self::angular::SphericalHarmonicsCache;

/// Radial and angular basis tables for all neighbors of one center.
///
/// `radial` is a `(n_neighbors, max_radial, 4)` array and `angular` a
/// `(n_neighbors, n_harmonics, 4)` array. The last axis contains the value of
/// the basis function followed by its gradient with respect to the neighbor
/// displacement.
#[derive(Debug, Clone)]
pub struct BasisTables {
    pub radial: Array3<f64>,
    pub angular: Array3<f64>,
}

impl BasisTables {
    /// Create empty tables for the given number of channels
    pub fn new(max_radial: usize, n_harmonics: usize) -> BasisTables {
        BasisTables {
            radial: Array3::zeros((0, max_radial, 4)),
            angular: Array3::zeros((0, n_harmonics, 4)),
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.radial.shape()[0]
    }

    /// Fill the tables with one row per displacement, re-allocating them if
    /// the number of neighbors changed.
    ///
    /// Neighbors outside of the cutoff get zero radial rows. A neighbor at
    /// zero distance from the center is an error.
    pub fn compute(
        &mut self,
        radial: &mut RadialBasisCache,
        angular: &mut SphericalHarmonicsCache,
        displacements: &[Vector3D],
    ) -> Result<(), Error> {
        let n_neighbors = displacements.len();
        if n_neighbors != self.n_neighbors() {
            self.radial = Array3::zeros((n_neighbors, radial.max_radial(), 4));
            self.angular = Array3::zeros((n_neighbors, angular.count(), 4));
        }

        let rows = self.radial.axis_iter_mut(Axis(0)).zip(self.angular.axis_iter_mut(Axis(0)));
        for (jj, (&displacement, (radial_row, angular_row))) in displacements.iter().zip(rows).enumerate() {
            if displacement.norm2() == 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "neighbor {} is at zero distance from the center", jj
                )));
            }

            radial.compute(displacement, radial_row);
            angular.compute(displacement, angular_row);
        }

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use ndarray::s;

    use super::*;
    use crate::math::CutoffFunction;

    #[test]
    fn tables() {
        let mut radial = RadialBasisCache::new(RadialBasis::Gto {}, CutoffFunction::Quadratic {}, 3.0, 3);
        let mut angular = SphericalHarmonicsCache::new(2);
        let mut tables = BasisTables::new(3, 9);
        assert_eq!(tables.n_neighbors(), 0);

        let displacements = [
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, -1.5, 0.5),
            Vector3D::new(0.0, 4.0, 0.0),
        ];
        tables.compute(&mut radial, &mut angular, &displacements).unwrap();
        assert_eq!(tables.radial.shape(), [3, 3, 4]);
        assert_eq!(tables.angular.shape(), [3, 9, 4]);

        // same rows as calling the caches directly
        let mut expected = ndarray::Array2::zeros((3, 4));
        radial.compute(displacements[1], expected.view_mut());
        assert_eq!(tables.radial.slice(s![1, .., ..]), expected);

        // outside of the cutoff
        assert!(tables.radial.slice(s![2, .., ..]).iter().all(|&v| v == 0.0));
        assert!(tables.angular.slice(s![2, .., 0]).iter().any(|&v| v != 0.0));

        tables.compute(&mut radial, &mut angular, &displacements[..1]).unwrap();
        assert_eq!(tables.n_neighbors(), 1);
    }

    #[test]
    fn zero_distance() {
        let mut radial = RadialBasisCache::new(RadialBasis::Gto {}, CutoffFunction::Quadratic {}, 3.0, 3);
        let mut angular = SphericalHarmonicsCache::new(2);
        let mut tables = BasisTables::new(3, 9);

        let displacements = [Vector3D::new(1.0, 0.0, 0.0), Vector3D::zero()];
        let error = tables.compute(&mut radial, &mut angular, &displacements).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: neighbor 1 is at zero distance from the center");
    }
}
