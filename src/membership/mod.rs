//! Membership testing data structures
//!
//! The profiler needs to know whether a block was seen before without keeping
//! every block around. A Bloom filter answers that in a fixed amount of memory,
//! at the cost of occasional false positives.
//!
//! # Example
//!
//! ```
//! use blockfreq::membership::BloomFilter;
//!
//! let mut bloom = BloomFilter::new(1000, 0.01).unwrap();
//! bloom.insert(b"hello");
//! assert!(bloom.contains(b"hello"));
//! ```

mod bloom;

pub use bloom::{optimal_num_bits, optimal_num_hashes, BloomFilter};
