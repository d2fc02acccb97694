#![allow(clippy::range_plus_one)]

use std::f64;
use std::f64::consts::SQRT_2;

use ndarray::ArrayViewMut2;

use crate::Vector3D;

/// `\sqrt{\frac{1}{2 \pi}}`
const SQRT_1_OVER_2PI: f64 = 0.3989422804014327;
/// `\sqrt{3}`
const SQRT_3: f64 = 1.7320508075688772;
/// `\sqrt{3 / 2}`
const SQRT_3_OVER_2: f64 = 1.224744871391589;

/// Position of the real spherical harmonic `Y_l^m` in a flat array containing
/// all harmonics up to some `l_max`, ordered by `l` and then by `m` from `-l`
/// to `l`. This is `l^2 + (m + l)`, i.e. the offset of the `l` block plus the
/// order offset in `[0, 2l]`.
#[inline]
pub fn harmonic_index(l: usize, m: isize) -> usize {
    debug_assert!(-(l as isize) <= m && m <= l as isize);
    return (l * l) + (m + l as isize) as usize;
}

/// Array storing data for `0 <= l <= l_max`, `0 <= m <= l`, indexed with
/// `[l, m]`.
#[derive(Clone)]
struct LegendreArray {
    max_angular: usize,
    data: Vec<f64>,
}

impl LegendreArray {
    /// Create a new `LegendreArray` with the given maximal angular degree, and
    /// all elements set to zero.
    fn new(max_angular: usize) -> LegendreArray {
        let size = (max_angular + 1) * (max_angular + 2) / 2;
        LegendreArray {
            max_angular: max_angular,
            data: vec![0.0; size],
        }
    }

    #[inline]
    fn linear_index(&self, index: [usize; 2]) -> usize {
        let [l, m] = index;
        debug_assert!(l <= self.max_angular && m <= l);
        return m + l * (l + 1) / 2;
    }
}

impl std::ops::Index<[usize; 2]> for LegendreArray {
    type Output = f64;
    fn index(&self, index: [usize; 2]) -> &f64 {
        &self.data[self.linear_index(index)]
    }
}

impl std::ops::IndexMut<[usize; 2]> for LegendreArray {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut f64 {
        let i = self.linear_index(index);
        &mut self.data[i]
    }
}

/// Compute a full set of real spherical harmonics for a given direction.
///
/// Follows the algorithm described in <https://arxiv.org/abs/1410.1748>.
///
/// The output is written to a `(n_harmonics, 4)` array, where `n_harmonics =
/// (l_max + 1)^2`, the rows are ordered as in [`harmonic_index`] and the
/// columns contain the value and the gradient with respect to the `x`, `y` and
/// `z` components of the (unit) direction vector.
#[derive(Debug, Clone)]
pub struct SphericalHarmonics {
    max_angular: usize,
    /// array of associated Legendre polynomials
    legendre_polynomials: LegendreArray,
    /// 'A' coefficient from the arxiv paper to compute Legendre polynomials
    coefficient_a: LegendreArray,
    /// 'B' coefficient from the arxiv paper to compute Legendre polynomials
    coefficient_b: LegendreArray,
    /// `sqrt((l + m) * (l - m + 1)) * P_l^{m - 1} - sqrt((l - m) * (l + m + 1)) * P_l^{m + 1}`
    delta_legendre_polynomials: LegendreArray,
    /// either `m / sin(θ) P_l^m` or `- 1 / (2 cos(θ)) * ∆P_l^m` depending on
    /// the value of theta, which moves the `1 / sin(θ)` singularity from the
    /// poles to the equator.
    legendre_over_theta: LegendreArray,
}

impl std::fmt::Debug for LegendreArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegendreArray")
            .field("max_angular", &self.max_angular)
            .finish_non_exhaustive()
    }
}

impl SphericalHarmonics {
    /// Build a new `SphericalHarmonics` calculator with the given `l_max`, and
    /// pre-compute all required quantities
    pub fn new(max_angular: usize) -> SphericalHarmonics {
        let mut coefficient_a = LegendreArray::new(max_angular);
        let mut coefficient_b = LegendreArray::new(max_angular);
        for l in 2..(max_angular + 1) {
            let ls = (l * l) as f64;
            let lm1s = ((l - 1) * (l - 1)) as f64;
            for m in 0..(l - 1) {
                let ms = (m * m) as f64;
                coefficient_a[[l, m]] = f64::sqrt((4.0 * ls - 1.0) / (ls - ms));
                coefficient_b[[l, m]] = -f64::sqrt((lm1s - ms) / (4.0 * lm1s - 1.0));
            }
        }

        SphericalHarmonics {
            max_angular: max_angular,
            legendre_polynomials: LegendreArray::new(max_angular),
            delta_legendre_polynomials: LegendreArray::new(max_angular),
            legendre_over_theta: LegendreArray::new(max_angular),
            coefficient_a: coefficient_a,
            coefficient_b: coefficient_b,
        }
    }

    /// Get the maximal angular degree of this `SphericalHarmonics`
    pub fn max_angular(&self) -> usize {
        self.max_angular
    }

    /// Number of harmonics computed, `(l_max + 1)^2`
    pub fn count(&self) -> usize {
        (self.max_angular + 1) * (self.max_angular + 1)
    }

    /// Evaluate the Legendre polynomials at `cos(θ)`
    fn compute_legendre_polynomials(&mut self, cos_theta: f64, sin_theta: f64) {
        let mut value = SQRT_1_OVER_2PI;
        self.legendre_polynomials[[0, 0]] = value;

        if self.max_angular > 0 {
            self.legendre_polynomials[[1, 0]] = cos_theta * SQRT_3 * value;
            value *= -SQRT_3_OVER_2 * sin_theta;
            self.legendre_polynomials[[1, 1]] = value;

            let a = &self.coefficient_a;
            let b = &self.coefficient_b;
            let p = &mut self.legendre_polynomials;

            for l in 2..(self.max_angular + 1) {
                for m in 0..(l - 1) {
                    p[[l, m]] = a[[l, m]] * (cos_theta * p[[l - 1, m]] + b[[l, m]] * p[[l - 2, m]]);
                }

                p[[l, l - 1]] = cos_theta * f64::sqrt(2.0 * l as f64 + 1.0) * value;
                value *= -f64::sqrt(1.0 + 0.5 / l as f64) * sin_theta;
                p[[l, l]] = value;
            }
        }
    }

    /// Compute the factors entering the derivatives of the spherical
    /// harmonics, from the already computed Legendre polynomials.
    fn compute_derivative_factors(&mut self, cos_theta: f64, sin_theta: f64) {
        let compute_delta_legendre = |l: usize, m: usize, p_m_l_minus_1: f64, p_m_l_plus_1: f64| {
            f64::sqrt(((l + m) * (l - m + 1)) as f64) * p_m_l_minus_1
            - f64::sqrt(((l - m) * (l + m + 1)) as f64) * p_m_l_plus_1
        };

        let p = &self.legendre_polynomials;
        let delta = &mut self.delta_legendre_polynomials;

        delta[[0, 0]] = 0.0;
        for l in 1..(self.max_angular + 1) {
            // from P_l^{−m} = (−1)^m (l − m)!/(l + m)! P_l^m
            let p_minus_1 = -1.0 / ((l * l + l) as f64) * p[[l, 1]];
            delta[[l, 0]] = compute_delta_legendre(l, 0, p_minus_1, p[[l, 1]]);

            for m in 1..l {
                delta[[l, m]] = compute_delta_legendre(l, m, p[[l, m - 1]], p[[l, m + 1]]);
            }

            delta[[l, l]] = compute_delta_legendre(l, l, p[[l, l - 1]], 0.0);
        }

        for l in 0..(self.max_angular + 1) {
            for m in 0..=l {
                self.legendre_over_theta[[l, m]] = if sin_theta > 0.1 {
                    m as f64 / sin_theta * p[[l, m]]
                } else {
                    -0.5 / cos_theta * delta[[l, m]]
                };
            }
        }
    }

    /// Evaluate all spherical harmonics for the given unit `direction`, and
    /// store the results in the `(n_harmonics, 4)` array `output`. If
    /// `gradients` is false, only the first column of `output` is written.
    #[time_graph::instrument(name = "SphericalHarmonics::compute")]
    pub fn compute(&mut self, direction: Vector3D, mut output: ArrayViewMut2<'_, f64>, gradients: bool) {
        assert!(
            (direction.norm2() - 1.0).abs() < 1e-9,
            "expected the direction vector to be normalized in spherical harmonics"
        );
        assert_eq!(
            output.shape(), [self.count(), 4],
            "wrong size for the spherical harmonics output, expected ({}, 4) for max_angular={}",
            self.count(), self.max_angular,
        );

        let sqrt_xy = f64::hypot(direction[0], direction[1]);
        let cos_theta = direction[2];
        let sin_theta = sqrt_xy;

        let (cos_phi, sin_phi) = if sqrt_xy > f64::EPSILON {
            (direction[0] / sqrt_xy, direction[1] / sqrt_xy)
        } else {
            (1.0, 0.0)
        };

        self.compute_legendre_polynomials(cos_theta, sin_theta);
        if gradients {
            self.compute_derivative_factors(cos_theta, sin_theta);
        }

        for l in 0..(self.max_angular + 1) {
            output[[harmonic_index(l, 0), 0]] = self.legendre_polynomials[[l, 0]] / SQRT_2;
        }

        if gradients {
            output[[0, 1]] = 0.0;
            output[[0, 2]] = 0.0;
            output[[0, 3]] = 0.0;

            for l in 1..(self.max_angular + 1) {
                let lm = harmonic_index(l, 0);
                let legendre_factor = f64::sqrt(0.5 * (l * (l + 1)) as f64) * self.legendre_polynomials[[l, 1]];

                // d/dx: cos(ϕ) cos(θ) sqrt(l * (l + 1) / 2) * P_l^1(cos(θ))
                output[[lm, 1]] = cos_phi * cos_theta * legendre_factor;
                // d/dy: sin(ϕ) cos(θ) sqrt(l * (l + 1) / 2) * P_l^1(cos(θ))
                output[[lm, 2]] = sin_phi * cos_theta * legendre_factor;
                // d/dz: -sin(θ) sqrt(l * (l + 1) / 2) * P_l^1(cos(θ))
                output[[lm, 3]] = -sin_theta * legendre_factor;
            }
        }

        // recurrence for sin(m ϕ) and cos(m ϕ), with the sign convention of
        // the real spherical harmonics (no Condon-Shortley phase)
        let mut cos_1 = 1.0;
        let mut sin_1 = 0.0;
        let mut cos_2 = -cos_phi;
        let mut sin_2 = sin_phi;

        let minus_two_cos = -2.0 * cos_phi;
        for m in 1..(self.max_angular + 1) {
            let sin_m_phi = minus_two_cos * sin_1 - sin_2;
            let cos_m_phi = minus_two_cos * cos_1 - cos_2;
            sin_2 = sin_1;
            sin_1 = sin_m_phi;
            cos_2 = cos_1;
            cos_1 = cos_m_phi;

            let m_signed = m as isize;
            for l in m..(self.max_angular + 1) {
                let p_lm = self.legendre_polynomials[[l, m]];
                output[[harmonic_index(l, m_signed), 0]] = p_lm * cos_m_phi;
                output[[harmonic_index(l, -m_signed), 0]] = p_lm * sin_m_phi;
            }

            if !gradients {
                continue;
            }

            for l in m..(self.max_angular + 1) {
                let positive = harmonic_index(l, m_signed);
                let negative = harmonic_index(l, -m_signed);

                let delta_p_lm = self.delta_legendre_polynomials[[l, m]];
                let sin_m_phi_delta_p_lm = sin_m_phi * delta_p_lm;
                let cos_m_phi_delta_p_lm = cos_m_phi * delta_p_lm;

                // m / sin(θ) * P_l^m
                let p_lm_over_theta = self.legendre_over_theta[[l, m]];

                output[[positive, 1]] = sin_phi * p_lm_over_theta * sin_m_phi - 0.5 * cos_theta * cos_phi * cos_m_phi_delta_p_lm;
                output[[negative, 1]] = -sin_phi * p_lm_over_theta * cos_m_phi - 0.5 * cos_theta * cos_phi * sin_m_phi_delta_p_lm;

                output[[positive, 2]] = -cos_phi * p_lm_over_theta * sin_m_phi - 0.5 * cos_theta * sin_phi * cos_m_phi_delta_p_lm;
                output[[negative, 2]] = cos_phi * p_lm_over_theta * cos_m_phi - 0.5 * cos_theta * sin_phi * sin_m_phi_delta_p_lm;

                output[[positive, 3]] = 0.5 * sin_theta * cos_m_phi_delta_p_lm;
                output[[negative, 3]] = 0.5 * sin_theta * sin_m_phi_delta_p_lm;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_relative_eq;
    use ndarray::Array2;

    use super::*;

    #[test]
    fn harmonic_indexes() {
        // each (l, m) pair gets a separate index, and the indexes are dense
        let max_angular = 20;

        let mut set = HashSet::new();
        for l in 0..(max_angular + 1) {
            for m in -(l as isize)..=(l as isize) {
                set.insert(harmonic_index(l, m));
            }
        }

        assert_eq!(set.len(), (max_angular + 1) * (max_angular + 1));
        assert_eq!(set.iter().max(), Some(&(set.len() - 1)));

        // the first element of each block is at l^2
        for l in 0..(max_angular + 1) {
            assert_eq!(harmonic_index(l, -(l as isize)), l * l);
        }
    }

    #[test]
    fn l0_and_l1() {
        let mut spherical_harmonics = SphericalHarmonics::new(1);
        let mut output = Array2::zeros((4, 4));

        let direction = Vector3D::new(1.0, 2.0, -2.0) / 3.0;
        spherical_harmonics.compute(direction, output.view_mut(), false);

        let y00 = 0.5 / f64::sqrt(std::f64::consts::PI);
        let c1 = f64::sqrt(3.0 / (4.0 * std::f64::consts::PI));
        assert_relative_eq!(output[[0, 0]], y00, max_relative=1e-12);
        // real harmonics for l=1 are proportional to y, z, x
        assert_relative_eq!(output[[1, 0]], c1 * direction[1], max_relative=1e-12);
        assert_relative_eq!(output[[2, 0]], c1 * direction[2], max_relative=1e-12);
        assert_relative_eq!(output[[3, 0]], c1 * direction[0], max_relative=1e-12);
    }

    #[test]
    fn finite_differences() {
        let directions = [
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, 1.0, 0.0),
            Vector3D::new(0.0, 0.0, 1.0),
            Vector3D::new(1.0, 1.0, 1.0),
            Vector3D::new(1.0, -3.0, 9.0),
            Vector3D::new(1.0, 8.0, 12.0),
            Vector3D::new(-452.0, 825.0, 22.0),
        ];

        let max_angular = 25;
        let n_harmonics = (max_angular + 1) * (max_angular + 1);
        let mut spherical_harmonics = SphericalHarmonics::new(max_angular);
        let mut reference = Array2::zeros((n_harmonics, 4));
        let mut moved = Array2::zeros((n_harmonics, 4));

        let delta = 1e-9;
        for direction in &directions {
            let direction = direction.normalized();
            spherical_harmonics.compute(direction, reference.view_mut(), true);

            for spatial in 0..3 {
                let mut displaced = direction;
                displaced[spatial] += delta;
                spherical_harmonics.compute(displaced.normalized(), moved.view_mut(), false);

                for lm in 0..n_harmonics {
                    let finite_difference = (moved[[lm, 0]] - reference[[lm, 0]]) / delta;
                    assert_relative_eq!(
                        finite_difference, reference[[lm, spatial + 1]],
                        epsilon=1e-5, max_relative=1e-5
                    );
                }
            }
        }
    }

    mod bad {
        use ndarray::Array2;
        use super::super::SphericalHarmonics;
        use crate::Vector3D;

        #[test]
        #[should_panic = "wrong size for the spherical harmonics output, expected (16, 4) for max_angular=3"]
        fn output_size() {
            let mut spherical_harmonics = SphericalHarmonics::new(3);
            let mut output = Array2::zeros((36, 4));
            spherical_harmonics.compute(Vector3D::new(1.0, 0.0, 0.0), output.view_mut(), true);
        }

        #[test]
        #[should_panic = "expected the direction vector to be normalized"]
        fn non_normalized_direction() {
            let mut spherical_harmonics = SphericalHarmonics::new(3);
            let mut output = Array2::zeros((16, 4));
            spherical_harmonics.compute(Vector3D::new(1.0, 1.0, 1.0), output.view_mut(), false);
        }
    }
}
