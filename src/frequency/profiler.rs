//! Approximate repeated-block counter
//!
//! The first sighting of a block only goes into the membership filter. A block
//! gets an explicit count entry once the filter claims to have seen it, which
//! keeps memory proportional to the number of repeated blocks instead of the
//! number of distinct ones.

use std::collections::HashMap;

use crate::block::BlockId;
use crate::config::ProfileConfig;
use crate::error::{Error, Result};
use crate::membership::BloomFilter;
use crate::traits::MembershipSketch;

use super::FrequencyProfile;

/// Outcome of observing one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// Filter had never seen the block; it was inserted
    First,
    /// Filter claimed the block was seen before; its count is now `count`
    Repeat { count: u64 },
}

/// Counts repeated blocks of one stream
///
/// A false positive in the filter makes a genuinely new block look like a
/// repeat, so it is recorded with count 2 and the implicit singleton count
/// drops by one. The expected number of such errors is about `fpr * N`.
///
/// # Example
///
/// ```
/// use blockfreq::block::BlockId;
/// use blockfreq::config::ProfileConfig;
/// use blockfreq::frequency::Profiler;
///
/// let config = ProfileConfig::new(64, 0.01).unwrap();
/// let mut profiler = Profiler::new(3, config).unwrap();
///
/// for id in [7u64, 9, 7] {
///     profiler.observe(&BlockId::from(id));
/// }
///
/// let profile = profiler.finish();
/// assert_eq!(profile.num_blocks(), 3);
/// assert_eq!(profile.count(&BlockId::from(7u64)), Some(2));
/// assert_eq!(profile.count(&BlockId::from(9u64)), None);
/// ```
#[derive(Clone, Debug)]
pub struct Profiler<M = BloomFilter> {
    filter: M,
    counts: HashMap<BlockId, u64>,
    num_blocks: u64,
    /// Number of blocks the filter was sized for, when known
    expected_blocks: Option<u64>,
    config: ProfileConfig,
}

impl Profiler<BloomFilter> {
    /// Profiler backed by a Bloom filter sized for `capacity` blocks
    pub fn new(capacity: usize, config: ProfileConfig) -> Result<Self> {
        let filter = BloomFilter::new(capacity, config.fpr())?;
        let mut profiler = Self::with_filter(filter, config);
        profiler.expected_blocks = Some(capacity as u64);
        Ok(profiler)
    }
}

impl<M: MembershipSketch> Profiler<M> {
    /// Profiler backed by an arbitrary membership structure
    pub fn with_filter(filter: M, config: ProfileConfig) -> Self {
        Self {
            filter,
            counts: HashMap::new(),
            num_blocks: 0,
            expected_blocks: None,
            config,
        }
    }

    /// Account for the next block of the stream
    pub fn observe(&mut self, block: &BlockId) -> Sighting {
        self.num_blocks += 1;

        if let Some(capacity) = self.expected_blocks {
            if self.num_blocks == capacity + 1 {
                tracing::warn!(
                    capacity,
                    fpr = self.config.fpr(),
                    "more blocks than the filter was sized for; false positive rate will exceed target"
                );
            }
        }

        if !self.filter.contains(block.as_bytes()) {
            self.filter.insert(block.as_bytes());
            return Sighting::First;
        }

        // The first sighting never got an entry, so a new entry starts at 1
        let count = self.counts.entry(block.clone()).or_insert(1);
        *count += 1;
        Sighting::Repeat { count: *count }
    }

    /// Blocks observed so far
    pub fn num_blocks(&self) -> u64 {
        self.num_blocks
    }

    /// Distinct blocks recorded as repeated so far
    pub fn repeated_blocks(&self) -> usize {
        self.counts.len()
    }

    pub fn filter(&self) -> &M {
        &self.filter
    }

    /// Freeze the counts into a profile
    pub fn finish(self) -> FrequencyProfile {
        tracing::debug!(
            num_blocks = self.num_blocks,
            repeated_blocks = self.counts.len(),
            filter_fpr = self.filter.false_positive_rate(),
            "profiling finished"
        );

        FrequencyProfile::new(
            self.num_blocks,
            self.config.blocksize_bits(),
            self.config.fpr(),
            self.counts.into_iter().collect(),
        )
    }
}

/// Profile an in-memory block sequence
///
/// The filter is sized for exactly `blocks.len()` blocks. An empty sequence is
/// rejected, since no filter can be sized for it.
pub fn profile_blocks(blocks: &[BlockId], config: ProfileConfig) -> Result<FrequencyProfile> {
    if blocks.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut profiler = Profiler::new(blocks.len(), config)?;
    for block in blocks {
        profiler.observe(block);
    }
    Ok(profiler.finish())
}
