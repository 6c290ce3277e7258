// Constant-time comparison of secret polynomials and vectors
// Equality on Poly and PolyVec is routed through subtle so that comparing two
// secret vectors (for instance a transformed key against a reference) takes the
// same time whether they differ in the first coefficient or not at all.

use subtle::{Choice, ConstantTimeEq};

use crate::poly::Poly;
use crate::polyvec::PolyVec;

impl ConstantTimeEq for Poly {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.coeffs()[..].ct_eq(&other.coeffs()[..])
    }
}

impl PartialEq for Poly {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Poly {}

impl<const K: usize> ConstantTimeEq for PolyVec<K> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.iter()
            .zip(other.iter())
            .fold(Choice::from(1), |acc, (a, b)| acc & a.ct_eq(b))
    }
}

impl<const K: usize> PartialEq for PolyVec<K> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const K: usize> Eq for PolyVec<K> {}

/// Constant-time equality of two coefficient slices of possibly different lengths
///
/// Length is treated as public: slices of different length compare unequal
/// immediately, equal-length slices are compared without early exit.
pub fn ct_coeffs_eq(a: &[i16], b: &[i16]) -> bool {
    a.ct_eq(b).into()
}

/// Index schedule of the forward transform: (zeta index, low index, high index)
/// for every butterfly, in execution order
///
/// The schedule is a function of the loop counters alone. It is exposed so the
/// memory-access pattern of the transform can be audited independently of any
/// coefficient values.
pub fn butterfly_schedule() -> Vec<(usize, usize, usize)> {
    use crate::ntt::{first_zeta_index, BUTTERFLIES_PER_NTT};
    use crate::params::N;

    let mut schedule = Vec::with_capacity(BUTTERFLIES_PER_NTT);
    let mut len = N / 2;
    while len >= 2 {
        let first = first_zeta_index(len);
        for group in 0..N / (2 * len) {
            let start = 2 * len * group;
            for j in start..start + len {
                schedule.push((first + group, j, j + len));
            }
        }
        len >>= 1;
    }
    schedule
}
