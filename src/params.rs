//! Ring parameters and harness configuration for the Kyber NTT
//!
//! All arithmetic constants are fixed at compile time: the modulus, the
//! Montgomery radix and its derived inverses, and the Barrett multiplier. The
//! only runtime choice is the module rank K (2, 3 or 4), captured by
//! [`KyberLevel`] and validated when a [`HarnessConfig`] is built.

use crate::error::{NttError, Result};

/// Prime modulus q of the coefficient ring Z_q
pub const Q: i16 = 3329;

/// Ring dimension: polynomials live in Z_q[x]/(x^N + 1)
pub const N: usize = 256;

/// Number of precomputed roots of unity consumed by the forward transform
pub const ZETA_COUNT: usize = 128;

/// q^{-1} mod 2^16, used to cancel the low half of a product in Montgomery reduction
pub const QINV: i32 = 62209;

/// Montgomery radix R = 2^16 expressed as a shift
pub const MONT_SHIFT: u32 = 16;

/// R mod q = 2^16 mod 3329
pub const MONT: i16 = 2285;

/// R^2 mod q, multiplying by it under Montgomery reduction maps a into a·R
pub const MONT_SQ: i16 = 1353;

/// Barrett multiplier ⌊2^26 / q⌋ + 1
pub const BARRETT_V: i32 = 20159;

/// Barrett shift matching [`BARRETT_V`]
pub const BARRETT_SHIFT: u32 = 26;

/// Primitive 256-th root of unity modulo q
pub const ROOT_OF_UNITY: i16 = 17;

/// Bytes per serialized coefficient in the harness file formats
pub const COEFF_BYTES: usize = 2;

/// Kyber parameter set, which fixes the number of polynomials per vector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum KyberLevel {
    /// K = 2
    #[default]
    Kyber512,
    /// K = 3
    Kyber768,
    /// K = 4
    Kyber1024,
}

impl KyberLevel {
    /// Maps a module rank back to its parameter set
    ///
    /// # Error Conditions
    /// - Ranks other than 2, 3 and 4 have no Kyber parameter set
    pub fn from_rank(rank: usize) -> Result<Self> {
        match rank {
            2 => Ok(Self::Kyber512),
            3 => Ok(Self::Kyber768),
            4 => Ok(Self::Kyber1024),
            other => Err(NttError::InvalidRank(other)),
        }
    }

    /// Number of polynomials in a vector at this level
    pub const fn rank(self) -> usize {
        match self {
            Self::Kyber512 => 2,
            Self::Kyber768 => 3,
            Self::Kyber1024 => 4,
        }
    }

    /// Number of coefficients carried by one challenge at this level
    pub const fn coefficients_per_challenge(self) -> usize {
        self.rank() * N
    }
}

/// Configuration for generating and running a batch of measurement challenges
///
/// Mirrors the parameters the measurement project needs: which Kyber level
/// is being exercised, how many random challenges to produce, and an optional
/// seed so a campaign can be reproduced exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    level: KyberLevel,
    challenge_count: u16,
    seed: Option<[u8; 32]>,
}

impl HarnessConfig {
    /// Creates a harness configuration
    ///
    /// # Arguments
    /// * `level` - Kyber parameter set under measurement
    /// * `challenge_count` - Number of random challenges per run
    /// * `seed` - Seed for reproducible challenge generation (`None` draws from the OS)
    ///
    /// # Error Conditions
    /// - A zero challenge count produces an empty campaign and is rejected
    pub fn new(level: KyberLevel, challenge_count: u16, seed: Option<[u8; 32]>) -> Result<Self> {
        if challenge_count == 0 {
            return Err(NttError::InvalidParameters(
                "challenge count must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            level,
            challenge_count,
            seed,
        })
    }

    pub fn level(&self) -> KyberLevel {
        self.level
    }

    pub fn challenge_count(&self) -> u16 {
        self.challenge_count
    }

    pub fn seed(&self) -> Option<[u8; 32]> {
        self.seed
    }

    /// Checks that the configured level matches the vector rank `K` of the caller
    pub fn ensure_rank<const K: usize>(&self) -> Result<()> {
        if self.level.rank() != K {
            return Err(NttError::InvalidDimension {
                expected: self.level.rank(),
                got: K,
            });
        }
        Ok(())
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            level: KyberLevel::Kyber512,
            challenge_count: 5,
            seed: None,
        }
    }
}
