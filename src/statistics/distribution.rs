//! Frequency-of-frequencies reconstruction
//!
//! A profile only lists repeated blocks. Rebuilding the full "how many blocks
//! occurred exactly k times" histogram means putting back the singletons the
//! profiler never recorded.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::frequency::FrequencyProfile;

/// Number of distinct blocks per occurrence count
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use blockfreq::block::BlockId;
/// use blockfreq::frequency::FrequencyProfile;
/// use blockfreq::statistics::FrequencyDistribution;
///
/// let counts = BTreeMap::from([(BlockId::from(1u64), 3), (BlockId::from(2u64), 2)]);
/// let profile = FrequencyProfile::new(10, 64, 0.01, counts);
///
/// let dist = FrequencyDistribution::from_profile(&profile).unwrap();
/// assert_eq!(dist.blocks_with(1), 5); // 10 - (3 + 2) singletons
/// assert_eq!(dist.blocks_with(2), 1);
/// assert_eq!(dist.blocks_with(3), 1);
/// assert_eq!(dist.total_occurrences(), 10);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyDistribution {
    /// occurrence count -> distinct blocks; never holds a zero entry
    bins: BTreeMap<u64, u64>,
}

impl FrequencyDistribution {
    /// Reconstruct using the profile's own block count
    pub fn from_profile(profile: &FrequencyProfile) -> Result<Self> {
        Self::reconstruct(profile, profile.num_blocks())
    }

    /// Reconstruct the distribution of `profile` padded to `num_blocks` blocks
    ///
    /// # Errors
    ///
    /// Data-integrity error when the recorded occurrences exceed `num_blocks`
    /// or a count entry is zero.
    pub fn reconstruct(profile: &FrequencyProfile, num_blocks: u64) -> Result<Self> {
        let mut bins = BTreeMap::new();
        let mut recorded = 0u64;

        for (block, &count) in profile.counts() {
            if count == 0 {
                return Err(Error::InvalidCount {
                    block: block.to_string(),
                    count,
                });
            }
            recorded = recorded.saturating_add(count);
            *bins.entry(count).or_insert(0) += 1;
        }

        let implicit_singletons =
            num_blocks
                .checked_sub(recorded)
                .ok_or(Error::NegativeSingletons {
                    num_blocks,
                    recorded,
                })?;

        if implicit_singletons > 0 {
            *bins.entry(1).or_insert(0) += implicit_singletons;
        }

        Ok(Self { bins })
    }

    /// Build a distribution from `(occurrence count, distinct blocks)` pairs
    ///
    /// Pairs with zero blocks are dropped.
    pub fn from_bins<I: IntoIterator<Item = (u64, u64)>>(bins: I) -> Self {
        let mut map = BTreeMap::new();
        for (k, n) in bins {
            if n > 0 {
                *map.entry(k).or_insert(0) += n;
            }
        }
        Self { bins: map }
    }

    /// Distinct blocks that occurred exactly `k` times
    pub fn blocks_with(&self, k: u64) -> u64 {
        self.bins.get(&k).copied().unwrap_or(0)
    }

    /// `(k, blocks)` pairs in ascending `k`
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.bins.iter().map(|(&k, &n)| (k, n))
    }

    /// Occurrence counts present, ascending
    pub fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.bins.keys().copied()
    }

    /// Sum of `k * blocks` over all bins
    pub fn total_occurrences(&self) -> u64 {
        self.bins.iter().map(|(&k, &n)| k * n).sum()
    }

    /// Number of distinct blocks
    pub fn distinct_blocks(&self) -> u64 {
        self.bins.values().sum()
    }

    /// Number of non-empty bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
