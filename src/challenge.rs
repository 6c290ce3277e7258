//! Challenge generation and the harness file formats
//!
//! A measurement campaign feeds secret vectors ("challenges") to the target and
//! collects the transformed vectors it prints back. Both directions use the same
//! line format: one byte per line written as two lower-case hex digits, every
//! 16-bit value high byte first, negative coefficients in two's complement.
//!
//! - Input file: challenge count (16 bits), then `K·N` coefficients per challenge
//! - Printed data: `K·N` coefficients per challenge, no header
//!
//! Random challenges follow the centered binomial distribution with η = 2, the
//! distribution of Kyber secret coefficients.

use std::fs;
use std::path::Path;

use rand::RngCore;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use sha3::{Digest, Sha3_256};

use crate::error::{NttError, Result};
use crate::params::{HarnessConfig, KyberLevel, COEFF_BYTES, N};
use crate::poly::Poly;
use crate::polyvec::PolyVec;

/// Coefficient values of the fixed test challenges: all zero, all one, all minus two
pub const TEST_CHALLENGE_VALUES: [i16; 3] = [0, 1, -2];

/// The three fixed challenges used to sanity-check a target before a random campaign
pub fn test_challenges<const K: usize>() -> Vec<PolyVec<K>> {
    TEST_CHALLENGE_VALUES
        .iter()
        .map(|&value| PolyVec::constant_fill(value))
        .collect()
}

/// Fills a polynomial with CBD(η = 2) samples
///
/// Each coefficient is (b0 + b1) - (b2 + b3) for four fresh random bits, giving
/// -2..=2 with probabilities 1/16, 4/16, 6/16, 4/16, 1/16. One 32-bit draw feeds
/// eight coefficients, and no sample indexes a table.
pub fn sample_cbd2<R: RngCore + ?Sized>(poly: &mut Poly, rng: &mut R) {
    for chunk in poly.chunks_exact_mut(8) {
        let mut bits = rng.next_u32();
        for c in chunk.iter_mut() {
            let a = (bits & 1) + ((bits >> 1) & 1);
            let b = ((bits >> 2) & 1) + ((bits >> 3) & 1);
            *c = a as i16 - b as i16;
            bits >>= 4;
        }
    }
}

/// Draws `count` random challenges from `rng`
pub fn random_challenges<const K: usize, R: RngCore + ?Sized>(
    rng: &mut R,
    count: usize,
) -> Vec<PolyVec<K>> {
    (0..count)
        .map(|_| {
            let mut challenge = PolyVec::<K>::zero();
            for poly in challenge.iter_mut() {
                sample_cbd2(poly, rng);
            }
            challenge
        })
        .collect()
}

/// Reproducible random challenges from a 32-byte seed
pub fn seeded_random_challenges<const K: usize>(seed: [u8; 32], count: usize) -> Vec<PolyVec<K>> {
    let mut rng = ChaCha20Rng::from_seed(seed);
    random_challenges(&mut rng, count)
}

/// Generates the random challenges described by `config`
///
/// # Error Conditions
/// - The configured Kyber level does not have rank `K`
pub fn generate_challenges<const K: usize>(config: &HarnessConfig) -> Result<Vec<PolyVec<K>>> {
    config.ensure_rank::<K>()?;

    let count = config.challenge_count() as usize;
    let challenges = match config.seed() {
        Some(seed) => seeded_random_challenges(seed, count),
        None => random_challenges(&mut ChaCha20Rng::from_entropy(), count),
    };
    Ok(challenges)
}

/// Serializes challenges into an input file
///
/// # Error Conditions
/// - More than `u16::MAX` challenges cannot be announced in the 16-bit header
pub fn encode_input<const K: usize>(challenges: &[PolyVec<K>]) -> Result<String> {
    let count = u16::try_from(challenges.len()).map_err(|_| {
        NttError::InvalidParameters(format!(
            "{} challenges exceed the 16-bit challenge count",
            challenges.len()
        ))
    })?;

    let mut out = String::with_capacity((1 + challenges.len() * K * N) * COEFF_BYTES * 3);
    push_word(&mut out, count);
    for challenge in challenges {
        for c in challenge.coefficients() {
            push_word(&mut out, c as u16);
        }
    }
    Ok(out)
}

/// Parses an input file back into challenges
///
/// # Error Conditions
/// - `K` is not a Kyber module rank (2, 3 or 4)
/// - A line that is not exactly two hex digits
/// - Fewer bytes than the header announces, or bytes left over after the last challenge
pub fn decode_input<const K: usize>(text: &str) -> Result<Vec<PolyVec<K>>> {
    KyberLevel::from_rank(K)?;
    let bytes = parse_hex_lines(text)?;
    if bytes.len() < COEFF_BYTES {
        return Err(NttError::TruncatedInput {
            expected: COEFF_BYTES,
            got: bytes.len(),
        });
    }

    let count = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    let body = &bytes[COEFF_BYTES..];
    let challenge_bytes = K * N * COEFF_BYTES;
    let expected = count * challenge_bytes;

    if body.len() < expected {
        return Err(NttError::TruncatedInput {
            expected: expected + COEFF_BYTES,
            got: bytes.len(),
        });
    }
    if body.len() > expected {
        return Err(NttError::TrailingInput(body.len() - expected));
    }

    Ok(body.chunks_exact(challenge_bytes).map(read_polyvec).collect())
}

/// Serializes transformed vectors the way the target prints them
pub fn encode_printed<const K: usize>(outputs: &[PolyVec<K>]) -> String {
    let mut out = String::with_capacity(outputs.len() * K * N * COEFF_BYTES * 3);
    for output in outputs {
        for c in output.coefficients() {
            push_word(&mut out, c as u16);
        }
    }
    out
}

/// Parses printed data into one vector per challenge
///
/// # Error Conditions
/// - `K` is not a Kyber module rank (2, 3 or 4)
/// - A line that is not exactly two hex digits
/// - A byte count that is not a whole number of vectors
pub fn decode_printed<const K: usize>(text: &str) -> Result<Vec<PolyVec<K>>> {
    KyberLevel::from_rank(K)?;
    let bytes = parse_hex_lines(text)?;
    let challenge_bytes = K * N * COEFF_BYTES;
    let remainder = bytes.len() % challenge_bytes;
    if remainder != 0 {
        return Err(NttError::TruncatedInput {
            expected: bytes.len() - remainder + challenge_bytes,
            got: bytes.len(),
        });
    }

    Ok(bytes.chunks_exact(challenge_bytes).map(read_polyvec).collect())
}

/// Reads and decodes an input file from disk
///
/// # Error Conditions
/// - The file cannot be read
/// - Any decoding error of [`decode_input`]
pub fn load_input<const K: usize, P: AsRef<Path>>(path: P) -> Result<Vec<PolyVec<K>>> {
    let text = fs::read_to_string(path)?;
    decode_input(&text)
}

/// Encodes challenges and writes them to disk as an input file
pub fn save_input<const K: usize, P: AsRef<Path>>(path: P, challenges: &[PolyVec<K>]) -> Result<()> {
    let text = encode_input(challenges)?;
    fs::write(path, text)?;
    Ok(())
}

/// SHA3-256 over every coefficient of every vector, high byte first
///
/// A compact fingerprint for comparing a campaign's printed data against a
/// reference run.
pub fn output_digest<const K: usize>(outputs: &[PolyVec<K>]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for output in outputs {
        for c in output.coefficients() {
            hasher.update(c.to_be_bytes());
        }
    }
    hasher.finalize().into()
}

fn push_word(out: &mut String, word: u16) {
    for byte in word.to_be_bytes() {
        out.push_str(&format!("{:02x}\n", byte));
    }
}

fn parse_hex_lines(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.len() != 2 || !line.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(NttError::MalformedInput {
                line: index + 1,
                reason: format!("expected two hex digits, found {:?}", line),
            });
        }
        let byte = u8::from_str_radix(line, 16).map_err(|e| NttError::MalformedInput {
            line: index + 1,
            reason: e.to_string(),
        })?;
        bytes.push(byte);
    }
    Ok(bytes)
}

fn read_polyvec<const K: usize>(bytes: &[u8]) -> PolyVec<K> {
    let mut vector = PolyVec::<K>::zero();
    for (c, pair) in vector.coefficients_mut().zip(bytes.chunks_exact(COEFF_BYTES)) {
        *c = i16::from_be_bytes([pair[0], pair[1]]);
    }
    vector
}
