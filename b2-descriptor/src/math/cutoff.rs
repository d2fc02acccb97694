use crate::Error;

/// Smoothing function applied to the radial basis, going to zero at the
/// cutoff radius. All variants are exactly zero for `r >= cutoff`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum CutoffFunction {
    /// Step function, 1 if `r < cutoff` and 0 if `r >= cutoff`
    Step{},
    /// Quadratic cutoff `f(r) = (cutoff - r)^2`
    Quadratic{},
    /// Shifted cosine switching function
    /// `f(r) = 1/2 * (1 + cos(π (r - cutoff + width) / width ))`
    ShiftedCosine {
        width: f64,
    },
}

impl Default for CutoffFunction {
    fn default() -> CutoffFunction {
        CutoffFunction::Quadratic {}
    }
}

impl CutoffFunction {
    pub fn validate(&self, cutoff: f64) -> Result<(), Error> {
        match self {
            CutoffFunction::Step {} | CutoffFunction::Quadratic {} => {},
            CutoffFunction::ShiftedCosine { width } => {
                if *width <= 0.0 || *width > cutoff {
                    return Err(Error::InvalidParameter(format!(
                        "expected width between 0 and the cutoff ({}) for shifted cosine cutoff function, got {}",
                        cutoff, width
                    )));
                }
            }
        }
        return Ok(());
    }

    /// Evaluate the cutoff function at the distance `r` for the given `cutoff`
    pub fn compute(&self, r: f64, cutoff: f64) -> f64 {
        if r >= cutoff {
            return 0.0;
        }

        match self {
            CutoffFunction::Step{} => 1.0,
            CutoffFunction::Quadratic{} => (cutoff - r) * (cutoff - r),
            CutoffFunction::ShiftedCosine { width } => {
                if r <= (cutoff - width) {
                    1.0
                } else {
                    let s = std::f64::consts::PI * (r - cutoff + width) / width;
                    0.5 * (1. + f64::cos(s))
                }
            }
        }
    }

    /// Evaluate the derivative of the cutoff function at the distance `r` for the
    /// given `cutoff`
    pub fn derivative(&self, r: f64, cutoff: f64) -> f64 {
        if r >= cutoff {
            return 0.0;
        }

        match self {
            CutoffFunction::Step{} => 0.0,
            CutoffFunction::Quadratic{} => -2.0 * (cutoff - r),
            CutoffFunction::ShiftedCosine { width } => {
                if r <= (cutoff - width) {
                    0.0
                } else {
                    let s = std::f64::consts::PI * (r - cutoff + width) / width;
                    -0.5 * std::f64::consts::PI * f64::sin(s) / width
                }
            }
        }
    }
}
