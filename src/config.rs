//! Run configuration
//!
//! Parameters are validated when the config is built, so a config value that
//! exists is always usable.

use crate::error::{Error, Result};

/// Minimum expected bucket weight for the chi-square approximation
pub const DEFAULT_MIN_FREQ: u64 = 5;

/// Directory profiles are written to when none is given
pub const DEFAULT_PROFILE_DIR: &str = "json";

/// Directory comparison reports are written to when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Number of blocks between two progress reports
pub const PROGRESS_INTERVAL: u64 = 1 << 16;

/// Parameters of a profiling run
///
/// # Example
///
/// ```
/// use blockfreq::config::ProfileConfig;
///
/// let config = ProfileConfig::new(64, 0.01).unwrap();
/// assert_eq!(config.block_bytes(), 8);
///
/// assert!(ProfileConfig::new(12, 0.01).is_err()); // not whole bytes
/// assert!(ProfileConfig::new(64, 1.0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileConfig {
    blocksize_bits: u32,
    fpr: f64,
}

impl ProfileConfig {
    /// Validate and build a profiling config
    ///
    /// `blocksize_bits` must be a positive multiple of 8 and `fpr` must lie in
    /// the open interval (0, 1).
    pub fn new(blocksize_bits: u32, fpr: f64) -> Result<Self> {
        if blocksize_bits == 0 || blocksize_bits % 8 != 0 {
            return Err(Error::InvalidBlockSize {
                bits: blocksize_bits,
            });
        }
        validate_fpr(fpr)?;

        Ok(Self {
            blocksize_bits,
            fpr,
        })
    }

    /// Block size in bits
    pub fn blocksize_bits(&self) -> u32 {
        self.blocksize_bits
    }

    /// Block size in bytes
    pub fn block_bytes(&self) -> usize {
        (self.blocksize_bits / 8) as usize
    }

    /// Target false-positive rate of the membership filter
    pub fn fpr(&self) -> f64 {
        self.fpr
    }
}

/// Parameters of a profile comparison
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompareConfig {
    /// Validity floor every expected bucket weight should reach
    pub min_freq: u64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            min_freq: DEFAULT_MIN_FREQ,
        }
    }
}

impl CompareConfig {
    pub fn with_min_freq(min_freq: u64) -> Self {
        Self { min_freq }
    }
}

pub(crate) fn validate_fpr(fpr: f64) -> Result<()> {
    // NaN fails both comparisons
    if fpr > 0.0 && fpr < 1.0 {
        Ok(())
    } else {
        Err(Error::FalsePositiveRateOutOfBounds { fpr })
    }
}
