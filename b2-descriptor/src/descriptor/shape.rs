/// Sizes shared by the single bond and B2 kernels.
///
/// Radial channels are the tensor product of species and radial basis
/// functions (`n_radial = n_species * max_radial`), angular channels are the
/// real spherical harmonics up to `max_angular` (`n_harmonics = (max_angular +
/// 1)^2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorShape {
    /// Number of species, i.e. number of separate density channels
    pub n_species: usize,
    /// Number of radial basis functions (`n_max`)
    pub max_radial: usize,
    /// Maximal angular degree (`l_max`)
    pub max_angular: usize,
}

impl DescriptorShape {
    pub fn new(n_species: usize, max_radial: usize, max_angular: usize) -> DescriptorShape {
        DescriptorShape { n_species, max_radial, max_angular }
    }

    /// Number of species-weighted radial channels
    #[inline]
    pub fn n_radial(&self) -> usize {
        self.n_species * self.max_radial
    }

    /// Number of angular channels, `(l_max + 1)^2`
    #[inline]
    pub fn n_harmonics(&self) -> usize {
        (self.max_angular + 1) * (self.max_angular + 1)
    }

    /// Size of the single bond vector
    #[inline]
    pub fn n_bond(&self) -> usize {
        self.n_radial() * self.n_harmonics()
    }

    /// Number of unordered pairs `n1 <= n2` of radial channels
    #[inline]
    pub fn n_radial_pairs(&self) -> usize {
        self.n_radial() * (self.n_radial() + 1) / 2
    }

    /// Size of the B2 descriptor vector
    #[inline]
    pub fn n_descriptors(&self) -> usize {
        self.n_radial_pairs() * (self.max_angular + 1)
    }

    /// Position in the single bond vector of the coefficient for the given
    /// `species`, radial basis function `n` and angular channel `lm`
    #[inline]
    pub fn bond_index(&self, species: usize, n: usize, lm: usize) -> usize {
        debug_assert!(species < self.n_species && n < self.max_radial && lm < self.n_harmonics());
        (species * self.max_radial + n) * self.n_harmonics() + lm
    }
}
