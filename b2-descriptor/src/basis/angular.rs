use ndarray::ArrayViewMut2;

use crate::math::SphericalHarmonics;
use crate::Vector3D;

/// Evaluate one row of the angular table: the real spherical harmonics
/// `Y_lm(r / |r|)` and their gradients with respect to the neighbor
/// displacement `r`.
#[derive(Debug, Clone)]
pub struct SphericalHarmonicsCache {
    spherical_harmonics: SphericalHarmonics,
}

impl SphericalHarmonicsCache {
    pub fn new(max_angular: usize) -> SphericalHarmonicsCache {
        SphericalHarmonicsCache {
            spherical_harmonics: SphericalHarmonics::new(max_angular),
        }
    }

    /// Number of angular channels, `(max_angular + 1)^2`
    pub fn count(&self) -> usize {
        self.spherical_harmonics.count()
    }

    /// Compute the angular table row for the given `displacement` into
    /// `output`, a `(n_harmonics, 4)` array.
    pub fn compute(&mut self, displacement: Vector3D, mut output: ArrayViewMut2<'_, f64>) {
        let r = displacement.norm();
        debug_assert!(r > 0.0);

        self.spherical_harmonics.compute(displacement / r, output.view_mut(), true);

        // gradients are computed with respect to the unit direction
        let inverse_r = 1.0 / r;
        for mut row in output.rows_mut() {
            row[1] *= inverse_r;
            row[2] *= inverse_r;
            row[3] *= inverse_r;
        }
    }
}
