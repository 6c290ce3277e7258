//! Vectors of K polynomials, the shape of a Kyber secret key
//!
//! The vector adapter applies the polynomial transform to each element. The
//! elements never interact, so [`PolyVec::par_ntt`] may spread them across
//! rayon workers and still produce exactly the output of [`PolyVec::ntt`].

use std::ops::{Deref, DerefMut};

use rayon::prelude::*;
use zeroize::Zeroize;

use crate::poly::Poly;

/// A fixed-size vector of `K` polynomials
#[derive(Clone, Debug)]
pub struct PolyVec<const K: usize> {
    polys: [Poly; K],
}

/// Secret vector shape for Kyber512
pub type PolyVec512 = PolyVec<2>;
/// Secret vector shape for Kyber768
pub type PolyVec768 = PolyVec<3>;
/// Secret vector shape for Kyber1024
pub type PolyVec1024 = PolyVec<4>;

impl<const K: usize> PolyVec<K> {
    /// Vector of K zero polynomials
    pub fn zero() -> Self {
        Self {
            polys: std::array::from_fn(|_| Poly::zero()),
        }
    }

    pub fn from_polys(polys: [Poly; K]) -> Self {
        Self { polys }
    }

    /// Vector whose every coefficient of every polynomial equals `value`
    pub fn constant_fill(value: i16) -> Self {
        Self {
            polys: std::array::from_fn(|_| Poly::constant_fill(value)),
        }
    }

    /// Module rank of the vector
    pub const fn rank(&self) -> usize {
        K
    }

    /// Applies the forward transform and Barrett reduction to every polynomial
    pub fn ntt(&mut self) {
        for poly in self.polys.iter_mut() {
            poly.ntt();
        }
    }

    /// Same result as [`PolyVec::ntt`], with the polynomials transformed on the rayon pool
    pub fn par_ntt(&mut self) {
        self.polys.as_mut_slice().par_iter_mut().for_each(Poly::ntt);
    }

    /// Barrett-reduces every coefficient of every polynomial
    pub fn reduce(&mut self) {
        for poly in self.polys.iter_mut() {
            poly.reduce();
        }
    }

    /// All `K·N` coefficients, polynomial by polynomial
    pub fn coefficients(&self) -> impl Iterator<Item = i16> + '_ {
        self.polys.iter().flat_map(|poly| poly.iter().copied())
    }

    /// Mutable access to all `K·N` coefficients, polynomial by polynomial
    pub fn coefficients_mut(&mut self) -> impl Iterator<Item = &mut i16> + '_ {
        self.polys.iter_mut().flat_map(|poly| poly.iter_mut())
    }
}

impl<const K: usize> Default for PolyVec<K> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const K: usize> Deref for PolyVec<K> {
    type Target = [Poly; K];

    fn deref(&self) -> &Self::Target {
        &self.polys
    }
}

impl<const K: usize> DerefMut for PolyVec<K> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.polys
    }
}

impl<const K: usize> Zeroize for PolyVec<K> {
    fn zeroize(&mut self) {
        for poly in self.polys.iter_mut() {
            poly.zeroize();
        }
    }
}
