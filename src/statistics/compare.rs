//! Comparison of an observed profile against an expected one

use crate::config::CompareConfig;
use crate::error::{Error, Result};
use crate::frequency::FrequencyProfile;

use super::{BucketSeries, ChiSquareTest, FrequencyDistribution};

/// Outcome of comparing two profiles
///
/// Only [`Comparison::test`] is meant for reporting; the bucket series are kept
/// for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub before_merge: BucketSeries,
    pub after_merge: BucketSeries,
    pub test: ChiSquareTest,
}

/// Compare `observed` against `expected` with a chi-square test
///
/// Both profiles are reconstructed against the expected profile's block
/// count, bucketed, merged down to `config.min_freq`, and tested.
///
/// # Errors
///
/// - [`Error::ProfileMismatch`] if the profiles cover different block counts
/// - a data-integrity error if either profile records too many occurrences
/// - [`Error::InsufficientBuckets`] if fewer than 2 buckets survive merging
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use blockfreq::block::BlockId;
/// use blockfreq::config::CompareConfig;
/// use blockfreq::frequency::FrequencyProfile;
/// use blockfreq::statistics::compare_profiles;
///
/// let random = FrequencyProfile::new(100, 64, 0.01, BTreeMap::from([(BlockId::from(3u64), 10)]));
/// let sample = FrequencyProfile::new(100, 64, 0.01, BTreeMap::from([(BlockId::from(5u64), 20)]));
///
/// let comparison = compare_profiles(&random, &sample, &CompareConfig::default()).unwrap();
/// assert_eq!(comparison.test.degrees_of_freedom, 1);
/// assert!(comparison.test.statistic > 0.0);
/// ```
pub fn compare_profiles(
    expected: &FrequencyProfile,
    observed: &FrequencyProfile,
    config: &CompareConfig,
) -> Result<Comparison> {
    if expected.num_blocks() != observed.num_blocks() {
        return Err(Error::ProfileMismatch {
            expected: expected.num_blocks(),
            observed: observed.num_blocks(),
        });
    }
    if expected.blocksize_bits() != observed.blocksize_bits() {
        tracing::warn!(
            expected_bits = expected.blocksize_bits(),
            observed_bits = observed.blocksize_bits(),
            "comparing profiles built with different block sizes"
        );
    }

    let num_blocks = expected.num_blocks();
    let expected_dist = FrequencyDistribution::reconstruct(expected, num_blocks)?;
    let observed_dist = FrequencyDistribution::reconstruct(observed, num_blocks)?;

    let before_merge = BucketSeries::from_distributions(&observed_dist, &expected_dist);
    let after_merge = before_merge.merge(config.min_freq);

    tracing::debug!(
        observed = ?before_merge.observed(),
        expected = ?before_merge.expected(),
        "buckets before merge"
    );
    tracing::debug!(
        observed = ?after_merge.observed(),
        expected = ?after_merge.expected(),
        "buckets after merge"
    );

    let under_floor = after_merge.under_floor(config.min_freq);
    if under_floor > 0 {
        tracing::warn!(
            under_floor,
            min_freq = config.min_freq,
            "merged buckets still below validity floor; chi-square approximation is unreliable"
        );
    }

    let test = ChiSquareTest::compute(&after_merge)?;

    tracing::info!(
        statistic = test.statistic,
        degrees_of_freedom = test.degrees_of_freedom,
        p_value = test.p_value,
        "comparison finished"
    );

    Ok(Comparison {
        before_merge,
        after_merge,
        test,
    })
}
