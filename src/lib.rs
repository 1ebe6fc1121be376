//! # Blockfreq
//!
//! Repeated-block frequency profiling and chi-square comparison of byte
//! streams.
//!
//! Blockfreq splits a stream into fixed-size blocks, counts how often each
//! block repeats using a Bloom filter to skip first sightings, and compares
//! the resulting frequency profile of a sample against that of a reference
//! stream (typically random data). Profiles that differ significantly point
//! to structure in the sample.
//!
//! ## Components
//!
//! - **Membership**: Bloom filter sized from a capacity and false-positive rate
//! - **Frequency**: Profiler that counts only repeated blocks
//! - **Statistics**: Frequency-of-frequencies buckets, low-count merging and
//!   Pearson's chi-square test
//! - **Store**: JSON persistence of profiles and reports
//!
//! ## Quick Start
//!
//! ```rust
//! use blockfreq::prelude::*;
//!
//! let config = ProfileConfig::new(16, 0.001).unwrap();
//! let stream = |distinct: u16| -> Vec<u8> {
//!     (0..2048u16).flat_map(|i| (i % distinct).to_be_bytes()).collect()
//! };
//!
//! // Reference: half the blocks unique, half repeated once
//! let reference = stream(1536);
//! // Sample: every block repeated
//! let sample = stream(1024);
//!
//! let expected = profile_reader(&reference[..], 2048, config, &mut NoProgress).unwrap();
//! let observed = profile_reader(&sample[..], 2048, config, &mut NoProgress).unwrap();
//!
//! let comparison = compare_profiles(&expected, &observed, &CompareConfig::default()).unwrap();
//! assert!(comparison.test.p_value < 0.01);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): the `blockfreq` binary and its logging setup

pub mod block;
pub mod config;
pub mod error;
pub mod frequency;
pub mod math;
pub mod membership;
pub mod pipeline;
pub mod statistics;
pub mod store;
pub mod traits;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::block::BlockId;
    pub use crate::config::{CompareConfig, ProfileConfig};
    pub use crate::error::Error;
    pub use crate::frequency::{FrequencyProfile, NoProgress, Profiler, ProgressObserver};
    pub use crate::membership::BloomFilter;
    pub use crate::pipeline::{compare_files, profile_file, profile_reader};
    pub use crate::statistics::{compare_profiles, BucketSeries, ChiSquareTest, Comparison};
}

pub use error::{Error, Result};
pub use frequency::FrequencyProfile;
pub use membership::BloomFilter;
pub use statistics::ChiSquareTest;
