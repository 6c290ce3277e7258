//! Modular reduction unit for coefficients of Z_q, q = 3329
//!
//! This module provides the two reductions the forward transform is built on:
//! Montgomery reduction for products formed inside the butterflies, and
//! Barrett reduction for the normalization pass that follows the transform.
//!
//! Key Features:
//! - Montgomery reduction with radix R = 2^16 over signed 32-bit products
//! - Barrett reduction of any 16-bit coefficient into `0..=q`
//! - A fused multiply-and-reduce primitive ([`fqmul`]), the only multiplication
//!   the transform performs
//!
//! Security Considerations:
//! Every function here runs the same instruction sequence for every input. There
//! are no branches or table lookups on coefficient values, since the transform
//! is applied to secret key material.

use crate::params::{BARRETT_SHIFT, BARRETT_V, MONT_SHIFT, MONT_SQ, Q, QINV};

/// Montgomery reduction: computes a·R^{-1} mod q for R = 2^16
///
/// # Arguments
/// * `a` - Signed product with |a| < q·2^15
///
/// # Returns
/// * `i16` - Value t with t ≡ a·2^{-16} (mod q) and |t| < q
///
/// # Mathematical Algorithm
/// 1. u = a·q^{-1} mod 2^16, read as a signed 16-bit value
/// 2. a - u·q is divisible by 2^16 by construction of u
/// 3. t = (a - u·q) >> 16 (exact arithmetic shift)
#[inline]
pub fn montgomery_reduce(a: i32) -> i16 {
    // Only the low 16 bits of a·QINV matter, so the wrapping product is exact
    let u = a.wrapping_mul(QINV) as i16;
    let t = a - (u as i32) * (Q as i32);
    (t >> MONT_SHIFT) as i16
}

/// Barrett reduction: maps a 16-bit coefficient onto its residue in `0..=q`
///
/// # Arguments
/// * `a` - Any signed 16-bit coefficient
///
/// # Returns
/// * `i16` - Value congruent to a mod q, lying in `0..=q`
///
/// # Mathematical Algorithm
/// With v = ⌊2^26/q⌋ + 1 the quotient estimate ⌊v·a / 2^26⌋ is either ⌊a/q⌋
/// or, only for negative multiples of q, one less. Subtracting the estimate
/// times q therefore lands in `0..q`, or exactly on q in that corner case.
#[inline]
pub fn barrett_reduce(a: i16) -> i16 {
    let t = (BARRETT_V * a as i32) >> BARRETT_SHIFT;
    let t = t * Q as i32;
    (a as i32 - t) as i16
}

/// Field multiplication followed by Montgomery reduction
///
/// Returns a value congruent to a·b·R^{-1} mod q. Kept as a single primitive so
/// an unreduced product never escapes to a call site.
#[inline]
pub fn fqmul(a: i16, b: i16) -> i16 {
    montgomery_reduce(a as i32 * b as i32)
}

/// Maps a coefficient into the Montgomery domain, returning a value congruent to a·R mod q
#[inline]
pub fn to_montgomery(a: i16) -> i16 {
    fqmul(a, MONT_SQ)
}

/// Fully reduces a coefficient into `0..q`
///
/// Barrett reduction followed by a masked subtraction of q, so the result is the
/// unique canonical residue. Branch-free like the rest of this module.
#[inline]
pub fn canonicalize(a: i16) -> i16 {
    let r = barrett_reduce(a) - Q;
    r + ((r >> 15) & Q)
}
