//! Error types for profiling and comparison
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Variants fall
//! into two families: configuration errors, raised before any work starts, and
//! data-integrity errors, raised when a profile contradicts itself. I/O and
//! JSON failures carry the path they happened on.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while profiling streams or comparing profiles
#[derive(Debug, Error)]
pub enum Error {
    /// Membership capacity must be positive
    #[error("invalid capacity {capacity}: must be greater than zero")]
    InvalidCapacity { capacity: usize },

    /// False-positive rate outside the open interval (0, 1)
    #[error("false positive rate {fpr} out of bounds: must be in (0, 1)")]
    FalsePositiveRateOutOfBounds { fpr: f64 },

    /// Block size that is zero or not a whole number of bytes
    #[error("invalid block size {bits} bits: must be a positive multiple of 8")]
    InvalidBlockSize { bits: u32 },

    /// Explicit filter dimensions that cannot describe a filter
    #[error("invalid filter parameters: num_bits={num_bits}, num_hashes={num_hashes}")]
    InvalidFilterParams { num_bits: usize, num_hashes: usize },

    /// Input stream produced no blocks
    #[error("input contains no blocks")]
    EmptyInput,

    /// Too few buckets left after merging to run a goodness-of-fit test
    #[error("at least 2 buckets are required for a goodness-of-fit test, found {found}")]
    InsufficientBuckets { found: usize },

    /// Compared profiles were built from streams of different lengths
    #[error(
        "profiles disagree on block count: expected profile has {expected}, \
         observed profile has {observed}"
    )]
    ProfileMismatch { expected: u64, observed: u64 },

    /// Recorded occurrences exceed the profile's block count
    #[error(
        "profile records {recorded} repeated-block occurrences but only \
         {num_blocks} blocks in total"
    )]
    NegativeSingletons { num_blocks: u64, recorded: u64 },

    /// A count entry that no profiler could have produced
    #[error("block {block} has invalid occurrence count {count}")]
    InvalidCount { block: String, count: u64 },

    /// Observed and expected weight sequences of different lengths
    #[error("bucket series length mismatch: {observed} observed vs {expected} expected")]
    SeriesLengthMismatch { observed: usize, expected: usize },

    /// Read or write failure on a stream with no path attached
    #[error("I/O error on stream: {0}")]
    Stream(#[from] std::io::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed profile {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Whether the error rejects the run's parameters or inputs before any
    /// computation
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidCapacity { .. }
                | Self::FalsePositiveRateOutOfBounds { .. }
                | Self::InvalidBlockSize { .. }
                | Self::InvalidFilterParams { .. }
                | Self::EmptyInput
                | Self::InsufficientBuckets { .. }
                | Self::ProfileMismatch { .. }
        )
    }

    /// Whether the error reports a profile inconsistent with its own counts
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::NegativeSingletons { .. } | Self::InvalidCount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Error::InvalidCapacity { capacity: 0 }.is_config());
        assert!(Error::InsufficientBuckets { found: 1 }.is_config());
        assert!(!Error::EmptyInput.is_data_integrity());

        let err = Error::NegativeSingletons {
            num_blocks: 3,
            recorded: 5,
        };
        assert!(err.is_data_integrity());
        assert!(!err.is_config());
    }

    #[test]
    fn test_messages_carry_totals() {
        let err = Error::NegativeSingletons {
            num_blocks: 3,
            recorded: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains('3') && msg.contains('5'), "{}", msg);

        let err = Error::io(
            "data/missing.bin",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.to_string().contains("data/missing.bin"));
    }
}
