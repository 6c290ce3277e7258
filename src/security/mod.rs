// Security module for the Kyber NTT
// This module provides constant-time comparison of secret polynomials, an
// auditable access schedule of the transform, and a statistical timing
// assessment that checks the transform's execution time against its inputs.

pub mod constant_time;
pub mod timing_analysis;

pub use constant_time::{butterfly_schedule, ct_coeffs_eq};

pub use timing_analysis::{
    assess_polyvec_ntt, InputClass, TimingAnalyzer, TimingConfig, TimingReport,
    TimingStatistics, TimingVerdict, WelchTTest,
};
