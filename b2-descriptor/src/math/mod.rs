mod spherical_harmonics;
pub use self::spherical_harmonics::{SphericalHarmonics, harmonic_index};

mod cutoff;
pub use self::cutoff::CutoffFunction;
