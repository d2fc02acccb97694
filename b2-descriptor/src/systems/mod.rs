//! Atomic systems and the per-center neighbor lists used by the calculator.
//!
//! Building neighbor lists (including periodic images and ghost atoms) is left
//! to the caller, typically the simulation engine. The [`NeighborList`] here is
//! only a container for already computed lists.

mod simple_system;
pub use self::simple_system::SimpleSystem;

mod neighbors;
pub use self::neighbors::{NeighborList, NEIGHMASK};

mod species;
pub use self::species::SpeciesMapping;

#[cfg(test)]
pub(crate) mod test_utils;
