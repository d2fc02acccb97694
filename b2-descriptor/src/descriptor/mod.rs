//! Per-atom descriptor kernels: the single bond basis (density expansion
//! coefficients of one atomic environment) and the B2 two-body invariants
//! built on top of it.

mod shape;
pub use self::shape::DescriptorShape;

mod pairs;
pub use self::pairs::{RadialPairs, unravel_radial_pair, radial_pair_index};

mod single_bond;
pub use self::single_bond::SingleBond;

mod b2;
pub use self::b2::B2;
