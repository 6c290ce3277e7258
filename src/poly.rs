//! Polynomials of Z_q[x]/(x^256 + 1)

use std::ops::{Add, Sub};

use derive_more::{Deref, DerefMut};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ntt::ntt;
use crate::params::N;
use crate::reduce::barrett_reduce;

/// A polynomial with 256 signed 16-bit coefficients
///
/// The coefficients are usually secret (the harness feeds key material through
/// the transform), so the buffer is wiped on drop and equality is decided in
/// constant time (see `security::constant_time`).
#[derive(Clone, Debug, Deref, DerefMut, Zeroize, ZeroizeOnDrop)]
pub struct Poly {
    coeffs: [i16; N],
}

impl Poly {
    /// The zero polynomial
    pub fn zero() -> Self {
        Self { coeffs: [0; N] }
    }

    /// Wraps coefficients given in standard order, lowest degree first
    pub fn from_coeffs(coeffs: [i16; N]) -> Self {
        Self { coeffs }
    }

    /// Builds a polynomial whose every coefficient equals `value`
    pub fn constant_fill(value: i16) -> Self {
        Self { coeffs: [value; N] }
    }

    /// Coefficient buffer, in bit-reversed order after [`Poly::ntt`]
    pub fn coeffs(&self) -> &[i16; N] {
        &self.coeffs
    }

    pub fn coeffs_mut(&mut self) -> &mut [i16; N] {
        &mut self.coeffs
    }

    /// Negacyclic forward NTT followed by Barrett reduction, in place
    ///
    /// Input is taken in standard order; on return the coefficients are in
    /// bit-reversed order and each lies in `0..=q`.
    pub fn ntt(&mut self) {
        ntt(&mut self.coeffs);
        self.reduce();
    }

    /// Applies Barrett reduction to every coefficient
    pub fn reduce(&mut self) {
        for c in self.coeffs.iter_mut() {
            *c = barrett_reduce(*c);
        }
    }
}

impl Default for Poly {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[i16; N]> for Poly {
    fn from(coeffs: [i16; N]) -> Self {
        Self::from_coeffs(coeffs)
    }
}

/// Coefficient-wise addition without reduction
impl<'a> Add<&'a Poly> for &'a Poly {
    type Output = Poly;

    fn add(self, other: &'a Poly) -> Poly {
        let mut out = self.clone();
        for (c, &o) in out.coeffs.iter_mut().zip(other.coeffs.iter()) {
            *c = c.wrapping_add(o);
        }
        out
    }
}

/// Coefficient-wise subtraction without reduction
impl<'a> Sub<&'a Poly> for &'a Poly {
    type Output = Poly;

    fn sub(self, other: &'a Poly) -> Poly {
        let mut out = self.clone();
        for (c, &o) in out.coeffs.iter_mut().zip(other.coeffs.iter()) {
            *c = c.wrapping_sub(o);
        }
        out
    }
}
