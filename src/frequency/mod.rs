//! Repeated-block frequency profiling
//!
//! This module turns a sequence of blocks into a [`FrequencyProfile`]: the
//! occurrence counts of every block seen more than once, plus the total
//! number of blocks.
//!
//! # Example
//!
//! ```
//! use blockfreq::block::BlockId;
//! use blockfreq::config::ProfileConfig;
//! use blockfreq::frequency::profile_blocks;
//!
//! let config = ProfileConfig::new(64, 0.01).unwrap();
//! let blocks = [BlockId::zero(), BlockId::zero()];
//!
//! let profile = profile_blocks(&blocks, config).unwrap();
//! assert_eq!(profile.num_blocks(), 2);
//! assert_eq!(profile.count(&BlockId::zero()), Some(2));
//! ```

mod profile;
mod profiler;
mod progress;

pub use profile::FrequencyProfile;
pub use profiler::{profile_blocks, Profiler, Sighting};
pub use progress::{NoProgress, ProgressObserver};
