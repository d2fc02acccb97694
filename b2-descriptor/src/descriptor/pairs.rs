use super::DescriptorShape;

/// Get the flat index of the unordered pair of radial channels `(n1, n2)`,
/// with `n1 <= n2 < n_radial`.
///
/// Pairs are enumerated row by row in the upper triangle (diagonal included):
/// `(0, 0), (0, 1), ..., (0, n_radial - 1), (1, 1), (1, 2), ...`.
#[inline]
pub fn radial_pair_index(n1: usize, n2: usize, n_radial: usize) -> usize {
    debug_assert!(n1 <= n2 && n2 < n_radial);
    // number of pairs in all the rows before n1
    let row_start = n1 * n_radial - n1 * n1.saturating_sub(1) / 2;
    return row_start + (n2 - n1);
}

/// Closed-form inverse of [`radial_pair_index`]: get back `(n1, n2)` from the
/// flat index `x` of a pair of radial channels.
///
/// `n1` is the largest row whose start is at or before `x`, found by solving
/// the quadratic equation for the row start:
///
/// ```text
/// np12 = n_radial + 1/2
/// n1 = floor(np12 - sqrt(np12^2 - 2 x))
/// n2 = x - n1 * (np12 - 1 - n1 / 2)
/// ```
///
/// The square root is exact at the start of each row (its argument is the
/// square of a half-integer), and the distance to the next row start is at
/// least `1 / (2 n_radial)`, so rounding can not move `n1` to another row.
#[inline]
pub fn unravel_radial_pair(x: usize, n_radial: usize) -> (usize, usize) {
    let np12 = n_radial as f64 + 0.5;
    let x_f = x as f64;

    let n1 = f64::floor(np12 - f64::sqrt(np12 * np12 - 2.0 * x_f)) as usize;
    let n2 = (x_f - n1 as f64 * (np12 - 1.0 - 0.5 * n1 as f64)) as usize;

    debug_assert!(n1 <= n2 && n2 < n_radial, "invalid radial pair ({}, {}) for x={}", n1, n2, x);
    return (n1, n2);
}

/// Mapping between the flat index of the B2 descriptor and the `(n1, n2, l)`
/// features it corresponds to. The B2 index is `nnl = x * (l_max + 1) + l`,
/// where `x` is the flat index of the `(n1, n2)` radial pair.
#[derive(Debug, Clone, Copy)]
pub struct RadialPairs {
    n_radial: usize,
    max_angular: usize,
}

impl RadialPairs {
    pub fn new(shape: &DescriptorShape) -> RadialPairs {
        RadialPairs {
            n_radial: shape.n_radial(),
            max_angular: shape.max_angular,
        }
    }

    /// Number of features in the B2 descriptor
    pub fn count(&self) -> usize {
        self.n_radial * (self.n_radial + 1) / 2 * (self.max_angular + 1)
    }

    /// Get the `[n1, n2, l]` feature for the B2 index `nnl`
    #[inline]
    pub fn feature(&self, nnl: usize) -> [usize; 3] {
        let x = nnl / (self.max_angular + 1);
        let l = nnl - x * (self.max_angular + 1);
        let (n1, n2) = unravel_radial_pair(x, self.n_radial);
        return [n1, n2, l];
    }

    /// Get the B2 index for the `(n1, n2, l)` feature. The radial channels can
    /// be given in any order.
    pub fn position(&self, n1: usize, n2: usize, l: usize) -> usize {
        assert!(
            n1 < self.n_radial && n2 < self.n_radial && l <= self.max_angular,
            "invalid B2 feature ({}, {}, {}), expected n1/n2 below {} and l below {}",
            n1, n2, l, self.n_radial, self.max_angular + 1
        );
        let (n1, n2) = if n1 <= n2 { (n1, n2) } else { (n2, n1) };
        return radial_pair_index(n1, n2, self.n_radial) * (self.max_angular + 1) + l;
    }

    /// Iterate over all `[n1, n2, l]` features, in B2 index order
    pub fn iter(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.count()).map(move |nnl| self.feature(nnl))
    }
}
