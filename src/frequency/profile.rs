//! Frequency profile of one analyzed stream

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::config::ProfileConfig;
use crate::error::{Error, Result};

/// Summary of a stream's block repetitions
///
/// Only blocks seen at least twice have an entry in the counts map. Blocks seen
/// once are implicit: there are `num_blocks - recorded_occurrences()` of them.
///
/// The serialized form keeps the field names of the profile files:
///
/// ```json
/// {"num_blocks": 2, "blocksize": 64, "fpr": 0.01, "blocks": {"0": 2}}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyProfile {
    num_blocks: u64,
    #[serde(rename = "blocksize")]
    blocksize_bits: u32,
    fpr: f64,
    #[serde(rename = "blocks")]
    counts: BTreeMap<BlockId, u64>,
}

impl FrequencyProfile {
    /// Assemble a profile from its parts
    ///
    /// Nothing is checked here; see [`FrequencyProfile::validate`].
    pub fn new(
        num_blocks: u64,
        blocksize_bits: u32,
        fpr: f64,
        counts: BTreeMap<BlockId, u64>,
    ) -> Self {
        Self {
            num_blocks,
            blocksize_bits,
            fpr,
            counts,
        }
    }

    /// Total number of blocks in the stream
    pub fn num_blocks(&self) -> u64 {
        self.num_blocks
    }

    pub fn blocksize_bits(&self) -> u32 {
        self.blocksize_bits
    }

    /// False-positive rate the stream was profiled with
    pub fn fpr(&self) -> f64 {
        self.fpr
    }

    /// Occurrence counts of blocks seen more than once
    pub fn counts(&self) -> &BTreeMap<BlockId, u64> {
        &self.counts
    }

    /// Recorded occurrence count of `block`, if it was seen more than once
    pub fn count(&self, block: &BlockId) -> Option<u64> {
        self.counts.get(block).copied()
    }

    /// Number of distinct blocks recorded as repeated
    pub fn repeated_blocks(&self) -> usize {
        self.counts.len()
    }

    /// Occurrences accounted for by repeated blocks
    ///
    /// Saturates at `u64::MAX`, so a corrupt profile still compares as
    /// overfull.
    pub fn recorded_occurrences(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    /// Check the profile against its own metadata
    ///
    /// Fails with a configuration error on a bad block size or rate, and with a
    /// data-integrity error when a count is zero or the counts add up to more
    /// than `num_blocks`.
    pub fn validate(&self) -> Result<()> {
        ProfileConfig::new(self.blocksize_bits, self.fpr)?;

        if let Some((block, &count)) = self.counts.iter().find(|(_, &c)| c == 0) {
            return Err(Error::InvalidCount {
                block: block.to_string(),
                count,
            });
        }

        let recorded = self.recorded_occurrences();
        if recorded > self.num_blocks {
            return Err(Error::NegativeSingletons {
                num_blocks: self.num_blocks,
                recorded,
            });
        }

        Ok(())
    }
}
