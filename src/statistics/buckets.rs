//! Bucket series and low-weight bucket merging
//!
//! The chi-square approximation needs every expected bucket weight to reach a
//! validity floor. Rare occurrence counts (the long tail of large `k`) fall
//! short of it, so they get merged before the statistic is computed.

use crate::error::{Error, Result};

use super::FrequencyDistribution;

/// One comparison bucket
///
/// Covers the occurrence counts `min_count..=max_count`. Weights are block
/// occurrences: a bin of `n` blocks seen `k` times weighs `k * n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    pub min_count: u64,
    pub max_count: u64,
    pub observed: u64,
    pub expected: u64,
}

impl Bucket {
    /// Bucket for a single occurrence count
    pub fn new(count: u64, observed: u64, expected: u64) -> Self {
        Self {
            min_count: count,
            max_count: count,
            observed,
            expected,
        }
    }

    /// Fold `other` into this bucket
    fn absorb(&mut self, other: &Bucket) {
        self.min_count = self.min_count.min(other.min_count);
        self.max_count = self.max_count.max(other.max_count);
        self.observed += other.observed;
        self.expected += other.expected;
    }
}

/// Ordered buckets with paired observed and expected weights
///
/// # Example
///
/// ```
/// use blockfreq::statistics::BucketSeries;
///
/// let series = BucketSeries::from_weights(&[9, 4, 2], &[10, 3, 2]).unwrap();
/// let merged = series.merge(5);
///
/// assert_eq!(merged.observed(), [9, 6]);
/// assert_eq!(merged.expected(), [10, 5]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BucketSeries {
    buckets: Vec<Bucket>,
}

impl BucketSeries {
    /// Pair two distributions bucket by bucket
    ///
    /// Buckets run over every occurrence count present in either distribution,
    /// ascending. A count missing from one side weighs 0 there.
    pub fn from_distributions(
        observed: &FrequencyDistribution,
        expected: &FrequencyDistribution,
    ) -> Self {
        let mut counts: Vec<u64> = observed.counts().chain(expected.counts()).collect();
        counts.sort_unstable();
        counts.dedup();

        counts
            .into_iter()
            .map(|k| {
                Bucket::new(
                    k,
                    k * observed.blocks_with(k),
                    k * expected.blocks_with(k),
                )
            })
            .collect()
    }

    /// Series from raw weight sequences, labelled with counts `1..=len`
    pub fn from_weights(observed: &[u64], expected: &[u64]) -> Result<Self> {
        if observed.len() != expected.len() {
            return Err(Error::SeriesLengthMismatch {
                observed: observed.len(),
                expected: expected.len(),
            });
        }

        Ok(observed
            .iter()
            .zip(expected)
            .zip(1u64..)
            .map(|((&o, &e), k)| Bucket::new(k, o, e))
            .collect())
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Observed weights in bucket order
    pub fn observed(&self) -> Vec<u64> {
        self.buckets.iter().map(|b| b.observed).collect()
    }

    /// Expected weights in bucket order
    pub fn expected(&self) -> Vec<u64> {
        self.buckets.iter().map(|b| b.expected).collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_observed(&self) -> u64 {
        self.buckets.iter().map(|b| b.observed).sum()
    }

    pub fn total_expected(&self) -> u64 {
        self.buckets.iter().map(|b| b.expected).sum()
    }

    /// Number of buckets whose expected weight is below `min_freq`
    pub fn under_floor(&self, min_freq: u64) -> usize {
        self.buckets.iter().filter(|b| b.expected < min_freq).count()
    }

    /// Merge low-weight buckets so expected weights reach `min_freq`
    ///
    /// Buckets are kept as they are up to the first one whose expected weight
    /// is under the floor. From there on:
    ///
    /// - if that bucket is the last one, it is folded into the bucket before it;
    /// - otherwise it and everything after it are summed into one trailing
    ///   bucket, which is folded into the bucket before it if still under the
    ///   floor.
    ///
    /// Mass is preserved on both sides. When the very first bucket is already
    /// under the floor there is nothing to fold into, and the whole series
    /// collapses into a single bucket.
    pub fn merge(&self, min_freq: u64) -> BucketSeries {
        let Some(split) = self.buckets.iter().position(|b| b.expected < min_freq) else {
            return self.clone();
        };

        let mut merged = self.buckets[..split].to_vec();
        let tail = &self.buckets[split..];

        if tail.len() == 1 {
            // Nothing follows the final bucket, fold it backwards
            match merged.last_mut() {
                Some(last) => last.absorb(&tail[0]),
                None => merged.push(tail[0].clone()),
            }
        } else {
            let mut trailing = tail[0].clone();
            for bucket in &tail[1..] {
                trailing.absorb(bucket);
            }

            if trailing.expected >= min_freq {
                merged.push(trailing);
            } else {
                // Merged tail is still too light, fold it into the previous bucket
                match merged.last_mut() {
                    Some(prev) => prev.absorb(&trailing),
                    None => merged.push(trailing),
                }
            }
        }

        BucketSeries { buckets: merged }
    }
}

impl FromIterator<Bucket> for BucketSeries {
    fn from_iter<I: IntoIterator<Item = Bucket>>(iter: I) -> Self {
        Self {
            buckets: iter.into_iter().collect(),
        }
    }
}
