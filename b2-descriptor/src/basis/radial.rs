use ndarray::ArrayViewMut2;

use crate::math::CutoffFunction;
use crate::{Error, Vector3D};

/// Radial basis functions `R_n(r)` used to build the radial table
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum RadialBasis {
    /// Chebyshev polynomials of the first kind `T_n(x)`, evaluated on the
    /// scaled distance `x = (r - min_distance) / (cutoff - min_distance)`
    Chebyshev {
        min_distance: f64,
    },
    /// Use a radial basis similar to Gaussian-Type Orbitals.
    ///
    /// The basis is defined as `R_n(r) = r^n e^{- r^2 / (2 σ_n^2)}`, where
    /// `σ_n = cutoff * max(√n, 1) / n_max`
    Gto {},
}

impl Default for RadialBasis {
    fn default() -> RadialBasis {
        RadialBasis::Chebyshev { min_distance: 0.0 }
    }
}

impl RadialBasis {
    pub fn validate(&self, cutoff: f64) -> Result<(), Error> {
        match self {
            RadialBasis::Chebyshev { min_distance } => {
                if !(*min_distance >= 0.0 && *min_distance < cutoff) {
                    return Err(Error::InvalidParameter(format!(
                        "expected min_distance between 0 and the cutoff ({}) for Chebyshev radial basis, got {}",
                        cutoff, min_distance
                    )));
                }
            }
            RadialBasis::Gto {} => {}
        }
        return Ok(());
    }
}

/// Evaluate one row of the radial table: the values of `g_n(r) = R_n(r)
/// f_c(r)` for all `n`, and their gradients with respect to the neighbor
/// displacement `∇g_n = (R_n' f_c + R_n f_c') r / |r|`.
///
/// This keeps scratch memory around, and one instance should be used per
/// thread.
#[derive(Debug, Clone)]
pub struct RadialBasisCache {
    basis: RadialBasis,
    cutoff_function: CutoffFunction,
    cutoff: f64,
    /// `R_n(r)` for the last computed distance
    values: Vec<f64>,
    /// `dR_n/dr` for the last computed distance
    derivatives: Vec<f64>,
    /// Gaussian widths `σ_n` for the GTO basis
    gto_widths: Vec<f64>,
}

impl RadialBasisCache {
    pub fn new(basis: RadialBasis, cutoff_function: CutoffFunction, cutoff: f64, max_radial: usize) -> RadialBasisCache {
        let gto_widths = (0..max_radial).map(|n| {
            cutoff * f64::max(f64::sqrt(n as f64), 1.0) / max_radial as f64
        }).collect();

        RadialBasisCache {
            basis,
            cutoff_function,
            cutoff,
            values: vec![0.0; max_radial],
            derivatives: vec![0.0; max_radial],
            gto_widths,
        }
    }

    pub fn max_radial(&self) -> usize {
        self.values.len()
    }

    /// Compute `R_n(r)` and `dR_n/dr` for all `n`
    fn compute_radial(&mut self, r: f64) {
        match self.basis {
            RadialBasis::Chebyshev { min_distance } => {
                let scale = 1.0 / (self.cutoff - min_distance);
                let x = (r - min_distance) * scale;

                // T_{n+1} = 2x T_n - T_{n-1}
                // T'_{n+1} = 2 T_n + 2x T'_n - T'_{n-1}
                let (mut t_prev, mut t) = (0.0, 1.0);
                let (mut dt_prev, mut dt) = (0.0, 0.0);
                for n in 0..self.max_radial() {
                    self.values[n] = t;
                    self.derivatives[n] = dt * scale;

                    let (t_next, dt_next) = if n == 0 {
                        (x, 1.0)
                    } else {
                        (2.0 * x * t - t_prev, 2.0 * t + 2.0 * x * dt - dt_prev)
                    };
                    t_prev = t;
                    dt_prev = dt;
                    t = t_next;
                    dt = dt_next;
                }
            }
            RadialBasis::Gto {} => {
                for (n, &sigma) in self.gto_widths.iter().enumerate() {
                    let gaussian = f64::exp(-0.5 * r * r / (sigma * sigma));
                    let value = r.powi(n as i32) * gaussian;
                    self.values[n] = value;
                    self.derivatives[n] = (n as f64 / r - r / (sigma * sigma)) * value;
                }
            }
        }
    }

    /// Compute the radial table row for the given `displacement` (from the
    /// center to the neighbor) into `output`, a `(max_radial, 4)` array.
    pub fn compute(&mut self, displacement: Vector3D, mut output: ArrayViewMut2<'_, f64>) {
        assert_eq!(
            output.shape(), [self.max_radial(), 4],
            "wrong size for the radial basis output, expected ({}, 4)",
            self.max_radial()
        );

        let r = displacement.norm();
        debug_assert!(r > 0.0);
        if r >= self.cutoff {
            output.fill(0.0);
            return;
        }

        self.compute_radial(r);
        let f_cut = self.cutoff_function.compute(r, self.cutoff);
        let df_cut = self.cutoff_function.derivative(r, self.cutoff);
        let direction = displacement / r;

        for n in 0..self.max_radial() {
            let value = self.values[n];
            let derivative = self.derivatives[n] * f_cut + value * df_cut;
            output[[n, 0]] = value * f_cut;
            output[[n, 1]] = derivative * direction[0];
            output[[n, 2]] = derivative * direction[1];
            output[[n, 3]] = derivative * direction[2];
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array2;

    use super::*;

    fn finite_differences(mut cache: RadialBasisCache) {
        let max_radial = cache.max_radial();
        let mut reference = Array2::zeros((max_radial, 4));
        let mut positive = Array2::zeros((max_radial, 4));
        let mut negative = Array2::zeros((max_radial, 4));

        let displacements = [
            Vector3D::new(0.3, 1.2, -0.9),
            Vector3D::new(-2.1, 0.4, 1.7),
            Vector3D::new(0.0, 0.0, 3.5),
        ];

        let delta = 1e-6;
        for &displacement in &displacements {
            cache.compute(displacement, reference.view_mut());
            for spatial in 0..3 {
                let mut displaced = displacement;
                displaced[spatial] += delta;
                cache.compute(displaced, positive.view_mut());

                displaced[spatial] -= 2.0 * delta;
                cache.compute(displaced, negative.view_mut());

                for n in 0..max_radial {
                    let finite_difference = (positive[[n, 0]] - negative[[n, 0]]) / (2.0 * delta);
                    assert_relative_eq!(
                        finite_difference, reference[[n, spatial + 1]],
                        epsilon = 1e-5, max_relative = 1e-4
                    );
                }
            }
        }
    }

    #[test]
    fn chebyshev_finite_differences() {
        for cutoff_function in [CutoffFunction::Quadratic {}, CutoffFunction::ShiftedCosine { width: 1.5 }] {
            let basis = RadialBasis::Chebyshev { min_distance: 0.5 };
            finite_differences(RadialBasisCache::new(basis, cutoff_function, 4.5, 6));
        }
    }

    #[test]
    fn gto_finite_differences() {
        let cache = RadialBasisCache::new(RadialBasis::Gto {}, CutoffFunction::Quadratic {}, 4.5, 6);
        finite_differences(cache);
    }

    #[test]
    fn chebyshev_values() {
        let basis = RadialBasis::Chebyshev { min_distance: 1.0 };
        let mut cache = RadialBasisCache::new(basis, CutoffFunction::Step {}, 3.0, 4);
        let mut output = Array2::zeros((4, 4));

        // x = 0.5
        cache.compute(Vector3D::new(0.0, 2.0, 0.0), output.view_mut());
        assert_relative_eq!(output[[0, 0]], 1.0);
        assert_relative_eq!(output[[1, 0]], 0.5);
        assert_relative_eq!(output[[2, 0]], -0.5);
        assert_relative_eq!(output[[3, 0]], -1.0);

        // dT_1/dr = 1 / (cutoff - min_distance), along y
        assert_relative_eq!(output[[1, 1]], 0.0);
        assert_relative_eq!(output[[1, 2]], 0.5);
        assert_relative_eq!(output[[1, 3]], 0.0);
        // dT_2/dx = 4x
        assert_relative_eq!(output[[2, 2]], 1.0);
    }

    #[test]
    fn outside_cutoff() {
        let mut cache = RadialBasisCache::new(RadialBasis::Gto {}, CutoffFunction::Step {}, 3.0, 4);
        let mut output = Array2::from_elem((4, 4), 12.0);

        cache.compute(Vector3D::new(0.0, 3.0, 0.0), output.view_mut());
        assert!(output.iter().all(|&v| v == 0.0));

        cache.compute(Vector3D::new(3.0, 3.0, 0.0), output.view_mut());
        assert!(output.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn validate() {
        assert!(RadialBasis::Gto {}.validate(3.0).is_ok());
        assert!(RadialBasis::Chebyshev { min_distance: 0.0 }.validate(3.0).is_ok());

        let error = RadialBasis::Chebyshev { min_distance: 3.0 }.validate(3.0).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid parameter: expected min_distance between 0 and the cutoff (3) for Chebyshev radial basis, got 3"
        );
        assert!(RadialBasis::Chebyshev { min_distance: -1.0 }.validate(3.0).is_err());
        assert!(RadialBasis::Chebyshev { min_distance: f64::NAN }.validate(3.0).is_err());
    }

    #[test]
    #[should_panic = "wrong size for the radial basis output, expected (4, 4)"]
    fn bad_output_size() {
        let mut cache = RadialBasisCache::new(RadialBasis::Gto {}, CutoffFunction::Step {}, 3.0, 4);
        let mut output = Array2::zeros((3, 4));
        cache.compute(Vector3D::new(0.0, 1.0, 0.0), output.view_mut());
    }
}
