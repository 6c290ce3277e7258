//! Forward number-theoretic transform over Z_q[x]/(x^256 + 1)
//!
//! Cooley-Tukey decimation with seven merge rounds. Because q = 3329 only has
//! primitive 256-th (not 512-th) roots of unity, the transform stops at
//! degree-2 blocks: the output pair `(r[2i], r[2i+1])` holds the input reduced
//! modulo x^2 - 17^{2·bitrev7(i)+1}. Output order is therefore bit-reversed
//! relative to the input.
//!
//! Performance Characteristics:
//! - 7 rounds × 128 butterflies, each one [`fqmul`] plus a wrapping add and sub
//! - In place, no allocation
//! - Identical control flow and memory access pattern for every input

use crate::params::{N, ZETA_COUNT};
use crate::reduce::fqmul;
use crate::zetas::ZETAS;

/// Number of merge rounds: half-lengths 128, 64, …, 2
pub const NTT_ROUNDS: usize = 7;

/// Butterflies executed by one transform, independent of the input
pub const BUTTERFLIES_PER_NTT: usize = NTT_ROUNDS * N / 2;

/// Index of the first twiddle factor used by the round with half-length `len`
///
/// The round with half-length `len` has `128 / len` groups, and the rounds
/// before it consumed `128 / len - 1` entries after the unused entry 0.
#[inline]
pub const fn first_zeta_index(len: usize) -> usize {
    ZETA_COUNT / len
}

/// In-place forward NTT
///
/// # Arguments
/// * `r` - Coefficients in standard order; overwritten with the transform in
///   bit-reversed order
///
/// # Output Range
/// No reduction happens between rounds. Each round adds at most q in absolute
/// value, so inputs with |c| < q leave the transform with |c| < 8q, which
/// Barrett reduction collapses in one pass. The additions wrap on 16 bits.
///
/// # Security
/// Twiddle factors are indexed by loop counters only, and the butterfly has no
/// branches, so execution time does not depend on coefficient values.
pub fn ntt(r: &mut [i16; N]) {
    let mut len = N / 2;
    while len >= 2 {
        let first = first_zeta_index(len);
        for (group, block) in r.chunks_exact_mut(2 * len).enumerate() {
            let zeta = ZETAS[first + group];
            let (lo, hi) = block.split_at_mut(len);
            butterfly(lo, hi, zeta);
        }
        len >>= 1;
    }
}

/// Radix-2 Cooley-Tukey butterfly over two halves of a block:
/// (x, y) -> (x + ζy, x - ζy) with ζy computed by Montgomery multiplication
#[inline]
fn butterfly(lo: &mut [i16], hi: &mut [i16], zeta: i16) {
    for (x, y) in lo.iter_mut().zip(hi.iter_mut()) {
        let t = fqmul(zeta, *y);
        *y = x.wrapping_sub(t);
        *x = x.wrapping_add(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Q;
    use crate::reduce::canonicalize;

    #[test]
    fn test_first_zeta_index_per_round() {
        let indices: Vec<usize> = (1..=NTT_ROUNDS).map(|round| first_zeta_index(N >> round)).collect();
        assert_eq!(indices, vec![1, 2, 4, 8, 16, 32, 64]);

        // Last round consumes entries 64..128, so the whole table after entry 0 is used
        assert_eq!(first_zeta_index(2) + N / 4, ZETA_COUNT);
        assert_eq!(BUTTERFLIES_PER_NTT, 896);
    }

    #[test]
    fn test_zero_is_fixed_point() {
        let mut r = [0i16; N];
        ntt(&mut r);
        assert_eq!(r, [0i16; N]);
    }

    #[test]
    fn test_constant_term_spreads_to_even_slots() {
        // 1 reduced modulo any x^2 - γ is just 1
        let mut r = [0i16; N];
        r[0] = 1;
        ntt(&mut r);
        for (i, &c) in r.iter().enumerate() {
            assert_eq!(c, if i % 2 == 0 { 1 } else { 0 }, "index {}", i);
        }
    }

    #[test]
    fn test_linear_term_spreads_to_odd_slots() {
        let mut r = [0i16; N];
        r[1] = 1;
        ntt(&mut r);
        for (i, &c) in r.iter().enumerate() {
            assert_eq!(c, if i % 2 == 1 { 1 } else { 0 }, "index {}", i);
        }
    }

    #[test]
    fn test_x128_maps_to_square_root_of_minus_one() {
        // x^128 ≡ ±17^64 = ±1729 in every degree-2 block: + in the first half, - in the second
        let mut r = [0i16; N];
        r[128] = 1;
        ntt(&mut r);
        for i in 0..N {
            let expected = match (i % 2, i < N / 2) {
                (1, _) => 0,
                (_, true) => 1729,
                (_, false) => Q - 1729,
            };
            assert_eq!(canonicalize(r[i]), expected, "index {}", i);
        }
    }

    #[test]
    fn test_output_magnitude_bound() {
        let patterns: [fn(usize) -> i16; 3] = [
            |_| Q - 1,
            |i| if i % 2 == 0 { Q - 1 } else { -(Q - 1) },
            |i| if (i / 3) % 2 == 0 { -(Q - 1) } else { Q - 1 },
        ];
        for pattern in patterns {
            let mut r = [0i16; N];
            for (i, c) in r.iter_mut().enumerate() {
                *c = pattern(i);
            }
            ntt(&mut r);
            assert!(r.iter().all(|&c| (c as i32).abs() < 8 * Q as i32));
        }
    }
}
