//! Measurement boundary around the vector transform
//!
//! A side-channel campaign loads a secret vector, opens a measurement window,
//! runs the transform, closes the window and reads the result back. The
//! transform knows nothing about the window: [`MeasurementHarness`] is the seam
//! a leakage simulator, a trigger pin or a wall-clock timer plugs into, and
//! [`ChallengeRunner`] drives it.

use std::time::{Duration, Instant};

use crate::challenge::{decode_input, encode_printed};
use crate::error::Result;
use crate::params::N;
use crate::polyvec::PolyVec;

/// Begin/end signal pair bracketing every measured transform
pub trait MeasurementHarness {
    /// Called immediately before the transform starts
    fn begin_measurement(&mut self);

    /// Called immediately after the transform returns
    fn end_measurement(&mut self);
}

impl<H: MeasurementHarness + ?Sized> MeasurementHarness for &mut H {
    fn begin_measurement(&mut self) {
        (**self).begin_measurement();
    }

    fn end_measurement(&mut self) {
        (**self).end_measurement();
    }
}

/// Harness that ignores both signals
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHarness;

impl MeasurementHarness for NoopHarness {
    fn begin_measurement(&mut self) {}

    fn end_measurement(&mut self) {}
}

/// Harness that records the wall-clock duration of every measurement window
#[derive(Clone, Debug, Default)]
pub struct TimingHarness {
    started: Option<Instant>,
    durations: Vec<Duration>,
}

impl TimingHarness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    /// Duration of the most recently closed window
    pub fn last(&self) -> Option<Duration> {
        self.durations.last().copied()
    }

    pub fn clear(&mut self) {
        self.started = None;
        self.durations.clear();
    }
}

impl MeasurementHarness for TimingHarness {
    fn begin_measurement(&mut self) {
        self.started = Some(Instant::now());
    }

    fn end_measurement(&mut self) {
        // An end without a matching begin records nothing
        if let Some(start) = self.started.take() {
            self.durations.push(start.elapsed());
        }
    }
}

/// Counters kept by a [`ChallengeRunner`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerStats {
    /// Challenges transformed
    pub challenges: u64,

    /// Input files processed through [`ChallengeRunner::run_input`]
    pub input_files: u64,

    /// Coefficients transformed across all challenges
    pub coefficients: u64,
}

/// Drives challenges through the vector transform inside measurement windows
#[derive(Debug)]
pub struct ChallengeRunner<H: MeasurementHarness> {
    harness: H,
    parallel: bool,
    stats: RunnerStats,
}

impl<H: MeasurementHarness> ChallengeRunner<H> {
    pub fn new(harness: H) -> Self {
        Self {
            harness,
            parallel: false,
            stats: RunnerStats::default(),
        }
    }

    /// Transforms the polynomials of each challenge on the rayon pool instead of in sequence
    ///
    /// Outputs are identical; only the timing profile of a window changes, so a
    /// leakage campaign should keep the default sequential mode.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Transforms one challenge in place inside a single measurement window
    pub fn run_one<const K: usize>(&mut self, challenge: &mut PolyVec<K>) {
        self.harness.begin_measurement();
        if self.parallel {
            challenge.par_ntt();
        } else {
            challenge.ntt();
        }
        self.harness.end_measurement();

        self.stats.challenges += 1;
        self.stats.coefficients += (K * N) as u64;
    }

    /// Transforms copies of every challenge, one window per challenge, in order
    pub fn run<const K: usize>(&mut self, challenges: &[PolyVec<K>]) -> Vec<PolyVec<K>> {
        challenges
            .iter()
            .map(|challenge| {
                let mut output = challenge.clone();
                self.run_one(&mut output);
                output
            })
            .collect()
    }

    /// Runs a complete input file and returns the printed data it produces
    ///
    /// # Arguments
    /// * `input` - Challenge count followed by the challenges, in the hex line format
    ///
    /// # Error Conditions
    /// - Any decoding error of the input file; nothing is transformed in that case
    pub fn run_input<const K: usize>(&mut self, input: &str) -> Result<String> {
        let challenges = decode_input::<K>(input)?;
        let outputs = self.run(&challenges);
        self.stats.input_files += 1;
        Ok(encode_printed(&outputs))
    }

    pub fn harness(&self) -> &H {
        &self.harness
    }

    pub fn harness_mut(&mut self) -> &mut H {
        &mut self.harness
    }

    pub fn into_harness(self) -> H {
        self.harness
    }

    pub fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RunnerStats::default();
    }
}
