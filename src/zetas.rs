//! Precomputed roots of unity for the forward transform
//!
//! Entry `k` of [`ZETAS`] is 17^{bitrev7(k)}·2^16 mod q: a power of the
//! primitive 256-th root of unity, lifted into the Montgomery domain and laid
//! out in the order the butterfly groups consume it. The literal table is the
//! interoperability artifact, so it is spelled out rather than computed;
//! [`generate_zetas`] rebuilds it from first principles for verification.

use crate::params::{MONT, Q, ROOT_OF_UNITY, ZETA_COUNT};

/// Montgomery-domain twiddle factors in bit-reversed traversal order.
/// Entry 0 (R mod q) is never read by the forward transform.
pub static ZETAS: [i16; ZETA_COUNT] = [
    2285, 2571, 2970, 1812, 1493, 1422, 287, 202, 3158, 622, 1577, 182, 962, 2127, 1855, 1468,
    573, 2004, 264, 383, 2500, 1458, 1727, 3199, 2648, 1017, 732, 608, 1787, 411, 3124, 1758,
    1223, 652, 2777, 1015, 2036, 1491, 3047, 1785, 516, 3321, 3009, 2663, 1711, 2167, 126, 1469,
    2476, 3239, 3058, 830, 107, 1908, 3082, 2378, 2931, 961, 1821, 2604, 448, 2264, 677, 2054,
    2226, 430, 555, 843, 2078, 871, 1550, 105, 422, 587, 177, 3094, 3038, 2869, 1574, 1653,
    3083, 778, 1159, 3182, 2552, 1483, 2727, 1119, 1739, 644, 2457, 349, 418, 329, 3173, 3254,
    817, 1097, 603, 610, 1322, 2044, 1864, 384, 2114, 3193, 1218, 1994, 2455, 220, 2142, 1670,
    2144, 1799, 2051, 794, 1819, 2475, 2459, 478, 3221, 3021, 996, 991, 958, 1869, 1522, 1628,
];

/// Reverses the low 7 bits of `x`
pub const fn bit_reverse_7(x: usize) -> usize {
    let mut result = 0;
    let mut input = x;
    let mut i = 0;
    while i < 7 {
        result = (result << 1) | (input & 1);
        input >>= 1;
        i += 1;
    }
    result
}

/// Rebuilds the twiddle table: entry k = 17^{bitrev7(k)}·2^16 mod q, in `0..q`
pub fn generate_zetas() -> [i16; ZETA_COUNT] {
    let q = Q as i64;
    let mut powers = [0i64; ZETA_COUNT];
    let mut power = 1i64;
    for p in powers.iter_mut() {
        *p = power;
        power = power * ROOT_OF_UNITY as i64 % q;
    }

    let mut zetas = [0i16; ZETA_COUNT];
    for (k, zeta) in zetas.iter_mut().enumerate() {
        *zeta = (powers[bit_reverse_7(k)] * MONT as i64 % q) as i16;
    }
    zetas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_reverse_7() {
        assert_eq!(bit_reverse_7(0), 0);
        assert_eq!(bit_reverse_7(1), 64);
        assert_eq!(bit_reverse_7(64), 1);
        assert_eq!(bit_reverse_7(0b0000011), 0b1100000);
        assert_eq!(bit_reverse_7(127), 127);
        for x in 0..128 {
            assert_eq!(bit_reverse_7(bit_reverse_7(x)), x);
        }
    }

    #[test]
    fn test_table_matches_generator() {
        assert_eq!(ZETAS, generate_zetas());
    }

    #[test]
    fn test_table_entries() {
        // R mod q, then 17^64·R = sqrt(-1)·R
        assert_eq!(ZETAS[0], MONT);
        assert_eq!(ZETAS[1], 2571);
        assert_eq!(ZETAS[127], 1628);
        assert!(ZETAS.iter().all(|&z| (0..Q).contains(&z)));
    }
}
