// Timing leakage assessment for the vector transform
// A fixed-versus-random two-class experiment (the dudect methodology): the
// transform is timed on a fixed input and on fresh random inputs, interleaved in
// random order, and Welch's t-test decides whether the two timing
// distributions differ. A constant-time transform keeps |t| below the threshold
// no matter how many samples are collected.

use std::fmt;
use std::time::Duration;

use rand::RngCore;

use crate::challenge::random_challenges;
use crate::error::{NttError, Result};
use crate::harness::{ChallengeRunner, TimingHarness};
use crate::polyvec::PolyVec;

/// Configuration of a timing assessment
#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    /// Measured transforms, split between the two classes
    pub samples: usize,

    /// Untimed transforms run first to settle caches and frequency scaling
    pub warmup: usize,

    /// |t| at or above this value is reported as a suspected leak
    pub threshold: f64,

    /// Measurements above this percentile of all samples are discarded as
    /// interrupts or preemption
    pub crop_percentile: f64,
}

impl TimingConfig {
    /// Creates a timing configuration
    ///
    /// # Error Conditions
    /// - Fewer than 4 samples cannot give two samples per class
    /// - Threshold must be positive and finite
    /// - Crop percentile must lie in (0, 1]
    pub fn new(samples: usize, warmup: usize, threshold: f64, crop_percentile: f64) -> Result<Self> {
        if samples < 4 {
            return Err(NttError::InvalidParameters(format!(
                "timing assessment needs at least 4 samples, got {}",
                samples
            )));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(NttError::InvalidParameters(format!(
                "t-test threshold must be positive, got {}",
                threshold
            )));
        }
        if !(crop_percentile > 0.0 && crop_percentile <= 1.0) {
            return Err(NttError::InvalidParameters(format!(
                "crop percentile must lie in (0, 1], got {}",
                crop_percentile
            )));
        }

        Ok(Self {
            samples,
            warmup,
            threshold,
            crop_percentile,
        })
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            samples: 10_000,
            warmup: 100,
            threshold: 4.5,
            crop_percentile: 0.95,
        }
    }
}

/// Input class of one measurement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputClass {
    /// The same input on every measurement
    Fixed,
    /// A fresh random input on every measurement
    Random,
}

/// Running mean and variance of one class (Welford's algorithm)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimingStatistics {
    /// Number of samples
    pub count: u64,

    /// Mean duration in nanoseconds
    pub mean_ns: f64,

    /// Sum of squared deviations from the mean
    m2: f64,
}

impl TimingStatistics {
    pub fn push(&mut self, duration_ns: f64) {
        self.count += 1;
        let delta = duration_ns - self.mean_ns;
        self.mean_ns += delta / self.count as f64;
        self.m2 += delta * (duration_ns - self.mean_ns);
    }

    /// Unbiased sample variance, `None` with fewer than two samples
    pub fn variance(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some(self.m2 / (self.count - 1) as f64)
    }
}

/// Welch's two-sample t-test over the fixed and random classes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WelchTTest {
    fixed: TimingStatistics,
    random: TimingStatistics,
}

impl WelchTTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, class: InputClass, duration_ns: f64) {
        match class {
            InputClass::Fixed => self.fixed.push(duration_ns),
            InputClass::Random => self.random.push(duration_ns),
        }
    }

    pub fn fixed(&self) -> &TimingStatistics {
        &self.fixed
    }

    pub fn random(&self) -> &TimingStatistics {
        &self.random
    }

    /// t = (μ_f - μ_r) / sqrt(σ²_f/n_f + σ²_r/n_r)
    ///
    /// `None` when either class has fewer than two samples or both classes have
    /// zero variance.
    pub fn t_statistic(&self) -> Option<f64> {
        let var_f = self.fixed.variance()?;
        let var_r = self.random.variance()?;
        let se = (var_f / self.fixed.count as f64 + var_r / self.random.count as f64).sqrt();
        if se == 0.0 {
            return None;
        }
        Some((self.fixed.mean_ns - self.random.mean_ns) / se)
    }
}

/// Outcome of a timing assessment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingVerdict {
    /// |t| stayed below the threshold
    NoLeakDetected,
    /// |t| reached the threshold
    LeakSuspected,
    /// Not enough variation or samples to compute a statistic
    Inconclusive,
}

/// Summary of a timing assessment
#[derive(Clone, Debug, PartialEq)]
pub struct TimingReport {
    pub fixed: TimingStatistics,
    pub random: TimingStatistics,
    pub t_statistic: Option<f64>,
    pub threshold: f64,
    pub discarded: usize,
    pub verdict: TimingVerdict,
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timing assessment: {:?}", self.verdict)?;
        writeln!(
            f,
            "  fixed:  n = {:>6}, mean = {:>10.1} ns",
            self.fixed.count, self.fixed.mean_ns
        )?;
        writeln!(
            f,
            "  random: n = {:>6}, mean = {:>10.1} ns",
            self.random.count, self.random.mean_ns
        )?;
        match self.t_statistic {
            Some(t) => writeln!(f, "  |t| = {:.3} (threshold {:.1})", t.abs(), self.threshold)?,
            None => writeln!(f, "  |t| = n/a (threshold {:.1})", self.threshold)?,
        }
        write!(f, "  discarded outliers: {}", self.discarded)
    }
}

/// Collects classified durations and turns them into a [`TimingReport`]
#[derive(Clone, Debug)]
pub struct TimingAnalyzer {
    config: TimingConfig,
    measurements: Vec<(InputClass, Duration)>,
}

impl TimingAnalyzer {
    pub fn new(config: TimingConfig) -> Self {
        Self {
            measurements: Vec::with_capacity(config.samples),
            config,
        }
    }

    pub fn record(&mut self, class: InputClass, duration: Duration) {
        self.measurements.push((class, duration));
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }

    /// Crops outliers above the configured percentile and runs the t-test
    pub fn report(&self) -> TimingReport {
        let cutoff = self.cutoff();
        let mut test = WelchTTest::new();
        let mut discarded = 0;
        for &(class, duration) in &self.measurements {
            if duration > cutoff {
                discarded += 1;
                continue;
            }
            test.push(class, duration.as_nanos() as f64);
        }

        let t_statistic = test.t_statistic();
        let verdict = match t_statistic {
            Some(t) if t.abs() >= self.config.threshold => TimingVerdict::LeakSuspected,
            Some(_) => TimingVerdict::NoLeakDetected,
            None => TimingVerdict::Inconclusive,
        };

        TimingReport {
            fixed: test.fixed().clone(),
            random: test.random().clone(),
            t_statistic,
            threshold: self.config.threshold,
            discarded,
            verdict,
        }
    }

    fn cutoff(&self) -> Duration {
        if self.measurements.is_empty() {
            return Duration::MAX;
        }
        let mut sorted: Vec<Duration> = self.measurements.iter().map(|&(_, d)| d).collect();
        sorted.sort_unstable();
        let index = ((sorted.len() as f64 * self.config.crop_percentile).ceil() as usize)
            .clamp(1, sorted.len());
        sorted[index - 1]
    }
}

/// Runs a fixed-versus-random timing experiment on [`PolyVec::ntt`]
///
/// The fixed class always transforms the all-zero vector; the random class
/// transforms fresh CBD(η = 2) vectors. Inputs are prepared outside the
/// measurement window, and the class of each sample is drawn from `rng` so
/// that drift affects both classes alike.
pub fn assess_polyvec_ntt<const K: usize, R: RngCore + ?Sized>(
    config: &TimingConfig,
    rng: &mut R,
) -> Result<TimingReport> {
    let config = TimingConfig::new(
        config.samples,
        config.warmup,
        config.threshold,
        config.crop_percentile,
    )?;
    let fixed = PolyVec::<K>::zero();
    let mut runner = ChallengeRunner::new(TimingHarness::new());

    for challenge in random_challenges::<K, R>(rng, config.warmup) {
        let mut input = challenge;
        runner.run_one(&mut input);
    }
    runner.harness_mut().clear();

    let mut analyzer = TimingAnalyzer::new(config.clone());
    while analyzer.measurement_count() < config.samples {
        let class = if rng.next_u32() & 1 == 0 {
            InputClass::Fixed
        } else {
            InputClass::Random
        };
        let mut input = match class {
            InputClass::Fixed => fixed.clone(),
            InputClass::Random => random_challenges::<K, R>(rng, 1)
                .pop()
                .unwrap_or_else(PolyVec::zero),
        };

        runner.run_one(&mut input);
        if let Some(duration) = runner.harness().last() {
            analyzer.record(class, duration);
        }
    }

    Ok(analyzer.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_timing_config_validation() {
        assert!(TimingConfig::new(3, 0, 4.5, 0.95).is_err());
        assert!(TimingConfig::new(100, 0, 0.0, 0.95).is_err());
        assert!(TimingConfig::new(100, 0, f64::NAN, 0.95).is_err());
        assert!(TimingConfig::new(100, 0, 4.5, 0.0).is_err());
        assert!(TimingConfig::new(100, 0, 4.5, 1.5).is_err());
        assert!(TimingConfig::new(100, 10, 4.5, 1.0).is_ok());
        assert_eq!(TimingConfig::default().threshold, 4.5);
    }

    #[test]
    fn test_statistics_calculation() {
        let mut stats = TimingStatistics::default();
        assert_eq!(stats.variance(), None);
        for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.push(x);
        }
        assert_eq!(stats.count, 8);
        assert!((stats.mean_ns - 5.0).abs() < 1e-12);
        assert!((stats.variance().unwrap() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_welch_t_statistic() {
        let mut test = WelchTTest::new();
        assert_eq!(test.t_statistic(), None);

        // Fixed: mean 10, var 2.5 (n = 5); Random: mean 12, var 2.5 (n = 5)
        for x in [8.0, 9.0, 10.0, 11.0, 12.0] {
            test.push(InputClass::Fixed, x);
            test.push(InputClass::Random, x + 2.0);
        }
        let t = test.t_statistic().unwrap();
        assert!((t - (-2.0)).abs() < 1e-12, "t = {}", t);
    }

    #[test]
    fn test_zero_variance_is_inconclusive() {
        let mut analyzer = TimingAnalyzer::new(TimingConfig::new(4, 0, 4.5, 1.0).unwrap());
        for _ in 0..2 {
            analyzer.record(InputClass::Fixed, Duration::from_nanos(100));
            analyzer.record(InputClass::Random, Duration::from_nanos(100));
        }
        let report = analyzer.report();
        assert_eq!(report.verdict, TimingVerdict::Inconclusive);
        assert_eq!(report.discarded, 0);
    }

    #[test]
    fn test_separated_classes_flag_leak() {
        let mut analyzer = TimingAnalyzer::new(TimingConfig::new(200, 0, 4.5, 1.0).unwrap());
        for i in 0..100u64 {
            analyzer.record(InputClass::Fixed, Duration::from_nanos(1_000 + i % 7));
            analyzer.record(InputClass::Random, Duration::from_nanos(2_000 + i % 5));
        }
        let report = analyzer.report();
        assert_eq!(report.verdict, TimingVerdict::LeakSuspected);
        assert!(report.to_string().contains("LeakSuspected"));
    }

    #[test]
    fn test_overlapping_classes_pass() {
        let mut analyzer = TimingAnalyzer::new(TimingConfig::new(200, 0, 4.5, 1.0).unwrap());
        for i in 0..100u64 {
            let d = Duration::from_nanos(1_000 + (i * 37) % 11);
            analyzer.record(InputClass::Fixed, d);
            analyzer.record(InputClass::Random, d);
        }
        assert_eq!(analyzer.report().verdict, TimingVerdict::NoLeakDetected);
    }

    #[test]
    fn test_outliers_are_cropped() {
        let mut analyzer = TimingAnalyzer::new(TimingConfig::new(20, 0, 4.5, 0.9).unwrap());
        for i in 0..9u64 {
            analyzer.record(InputClass::Fixed, Duration::from_nanos(100 + i));
            analyzer.record(InputClass::Random, Duration::from_nanos(100 + i));
        }
        analyzer.record(InputClass::Fixed, Duration::from_millis(5));
        analyzer.record(InputClass::Random, Duration::from_millis(7));

        let report = analyzer.report();
        assert_eq!(report.discarded, 2);
        assert_eq!(report.fixed.count + report.random.count, 18);
    }

    #[test]
    fn test_assessment_collects_requested_samples() {
        let config = TimingConfig::new(64, 4, 4.5, 1.0).unwrap();
        let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
        let report = assess_polyvec_ntt::<2, _>(&config, &mut rng).unwrap();
        assert_eq!(report.fixed.count + report.random.count, 64);
        assert_eq!(report.discarded, 0);
    }

    #[test]
    fn test_assessment_rejects_bad_config() {
        let config = TimingConfig {
            samples: 1,
            ..TimingConfig::default()
        };
        let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
        assert!(assess_polyvec_ntt::<2, _>(&config, &mut rng).is_err());
    }

    /// Wall-clock measurement is sensitive to machine noise; run on a quiet host
    /// with `cargo test --release -- --ignored`.
    #[test]
    #[ignore]
    fn test_transform_timing_is_input_independent() {
        let mut rng = ChaCha20Rng::from_seed([42u8; 32]);
        let report = assess_polyvec_ntt::<2, _>(&TimingConfig::default(), &mut rng).unwrap();
        assert_ne!(report.verdict, TimingVerdict::LeakSuspected, "{}", report);
    }
}
