//! Bloom filter for probabilistic set membership
//!
//! A Bloom filter is a space-efficient probabilistic data structure that tests
//! whether an element is a member of a set. False positives are possible, but
//! false negatives are not.

use crate::config::validate_fpr;
use crate::error::{Error, Result};
use crate::traits::MembershipSketch;
use core::f64::consts::LN_2;
use xxhash_rust::xxh3::xxh3_128;

/// Optimal number of bits for `capacity` items at false positive rate `fpr`
///
/// `m = ceil(-n * ln(p) / ln(2)^2)`
pub fn optimal_num_bits(capacity: usize, fpr: f64) -> usize {
    let bits = -(capacity as f64) * fpr.ln() / (LN_2 * LN_2);
    (bits.ceil() as usize).max(1)
}

/// Optimal number of hash functions for `num_bits` bits and `capacity` items
///
/// `k = round((m / n) * ln(2))`, never less than one.
pub fn optimal_num_hashes(num_bits: usize, capacity: usize) -> usize {
    let k = (num_bits as f64 / capacity as f64) * LN_2;
    (k.round() as usize).max(1)
}

/// Bit positions probed for `item` in a filter of `num_bits` bits
fn probes(item: &[u8], num_bits: usize, num_hashes: usize) -> impl Iterator<Item = usize> {
    let hash = xxh3_128(item);
    let h1 = hash as u64;
    // h2 must be non-zero or every probe hits the same bit
    let h2 = ((hash >> 64) as u64) | 1;
    let m = num_bits as u64;

    (0..num_hashes as u64).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}

/// Bloom filter for set membership testing
///
/// Bit positions come from double hashing: one 128-bit xxh3 hash is split into
/// `h1` and `h2`, and probe `i` lands on `(h1 + i * h2) mod m`.
///
/// # Example
///
/// ```
/// use blockfreq::membership::BloomFilter;
///
/// // Create filter for ~1000 items with 1% false positive rate
/// let mut bloom = BloomFilter::new(1000, 0.01).unwrap();
///
/// bloom.insert(b"apple");
/// bloom.insert(b"banana");
///
/// assert!(bloom.contains(b"apple"));   // true - definitely inserted
/// assert!(bloom.contains(b"banana"));  // true - definitely inserted
/// ```
///
/// # False Positive Rate
///
/// The configured rate holds when about `capacity` items were inserted. Past
/// that the filter keeps working, but the false positive rate climbs above
/// the target.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array
    bits: Vec<u64>,
    /// Number of bits (m)
    num_bits: usize,
    /// Number of hash functions (k)
    num_hashes: usize,
    /// Expected number of distinct items (n)
    capacity: usize,
    /// Number of insert calls
    count: u64,
}

impl BloomFilter {
    /// Create a new Bloom filter with expected capacity and false positive rate
    ///
    /// # Arguments
    ///
    /// * `capacity` - Expected number of distinct items to insert
    /// * `false_positive_rate` - Desired false positive rate (e.g., 0.01 for 1%)
    ///
    /// # Errors
    ///
    /// Fails if `capacity` is 0 or `false_positive_rate` is not in (0, 1)
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity { capacity });
        }
        validate_fpr(false_positive_rate)?;

        let num_bits = optimal_num_bits(capacity, false_positive_rate);
        let num_hashes = optimal_num_hashes(num_bits, capacity);

        let mut filter = Self::with_params(num_bits, num_hashes)?;
        filter.capacity = capacity;
        Ok(filter)
    }

    /// Create a Bloom filter with specific parameters
    ///
    /// The capacity of such a filter is derived back from `num_bits` and
    /// `num_hashes`.
    pub fn with_params(num_bits: usize, num_hashes: usize) -> Result<Self> {
        if num_bits == 0 || num_hashes == 0 {
            return Err(Error::InvalidFilterParams {
                num_bits,
                num_hashes,
            });
        }

        let capacity = ((num_bits as f64 * LN_2) / num_hashes as f64).floor() as usize;

        Ok(Self {
            bits: vec![0u64; num_bits.div_ceil(64)],
            num_bits,
            num_hashes,
            capacity: capacity.max(1),
            count: 0,
        })
    }

    /// Insert an item into the filter
    pub fn insert(&mut self, item: &[u8]) {
        self.count += 1;

        for bit_idx in probes(item, self.num_bits, self.num_hashes) {
            self.bits[bit_idx / 64] |= 1u64 << (bit_idx % 64);
        }
    }

    /// Check if an item might be in the filter
    ///
    /// Returns `true` if the item might be in the set (possibly a false positive),
    /// or `false` if the item is definitely not in the set.
    pub fn contains(&self, item: &[u8]) -> bool {
        probes(item, self.num_bits, self.num_hashes)
            .all(|bit_idx| self.bits[bit_idx / 64] & (1u64 << (bit_idx % 64)) != 0)
    }

    /// Get the number of bits in the filter
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the number of hash functions
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Expected number of distinct items the filter was sized for
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of insert calls made so far
    pub fn insertions(&self) -> u64 {
        self.count
    }

    /// Whether more items were inserted than the filter was sized for
    pub fn is_over_capacity(&self) -> bool {
        self.count > self.capacity as u64
    }

    /// Get the number of bits set to 1
    pub fn bits_set(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Estimate the current false positive rate
    ///
    /// This is based on the actual fill ratio of the filter.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill_ratio = self.bits_set() as f64 / self.num_bits as f64;
        fill_ratio.powi(self.num_hashes as i32)
    }

    /// Estimate the number of distinct items in the filter
    ///
    /// Uses the fill ratio to estimate cardinality.
    pub fn estimated_count(&self) -> f64 {
        let bits_set = self.bits_set() as f64;
        let m = self.num_bits as f64;
        let k = self.num_hashes as f64;

        if bits_set >= m {
            return f64::INFINITY;
        }

        // n ≈ -m/k * ln(1 - X/m) where X is bits set
        -(m / k) * (1.0 - bits_set / m).ln()
    }
}

impl MembershipSketch for BloomFilter {
    fn insert(&mut self, item: &[u8]) {
        self.insert(item)
    }

    fn contains(&self, item: &[u8]) -> bool {
        self.contains(item)
    }

    fn false_positive_rate(&self) -> f64 {
        self.estimated_false_positive_rate()
    }

    fn len(&self) -> usize {
        self.count as usize
    }
}
