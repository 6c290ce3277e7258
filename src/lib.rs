//! Constant-time forward NTT for the Kyber ring Z_3329[x]/(x^256 + 1)
//!
//! The crate implements the transform a Kyber implementation applies to its
//! secret vector, bit-exact with the reference: Montgomery-reduced butterflies
//! over a fixed 128-entry twiddle table, followed by a Barrett normalization
//! pass, applied polynomial by polynomial across a vector of rank K.
//!
//! Around the transform sit the pieces a side-channel measurement campaign
//! needs: a [`MeasurementHarness`] seam that brackets each transform, challenge
//! generation and the challenge/printed-data file formats, and a statistical
//! timing assessment.
//!
//! ```
//! use kyber_ntt::{PolyVec512, Q};
//!
//! let mut s = PolyVec512::constant_fill(1);
//! s.ntt();
//! assert!(s.coefficients().all(|c| (0..=Q).contains(&c)));
//! ```

pub mod challenge;
pub mod error;
pub mod harness;
pub mod ntt;
pub mod params;
pub mod poly;
pub mod polyvec;
pub mod reduce;
pub mod security;
pub mod zetas;

#[cfg(test)]
mod tests;

pub use challenge::{
    decode_input, decode_printed, encode_input, encode_printed, generate_challenges, load_input,
    output_digest, save_input, random_challenges, seeded_random_challenges, test_challenges,
};
pub use error::{NttError, Result};
pub use harness::{ChallengeRunner, MeasurementHarness, NoopHarness, RunnerStats, TimingHarness};
pub use ntt::ntt;
pub use params::{HarnessConfig, KyberLevel, N, Q};
pub use poly::Poly;
pub use polyvec::{PolyVec, PolyVec1024, PolyVec512, PolyVec768};
pub use reduce::{barrett_reduce, fqmul, montgomery_reduce};
pub use security::{assess_polyvec_ntt, TimingConfig, TimingReport, TimingVerdict};
pub use zetas::ZETAS;
