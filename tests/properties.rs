//! Property-based tests for blockfreq
//!
//! Randomized checks of the invariants that hold for every input: the filter
//! never forgets, reconstruction accounts for every block, merging preserves
//! mass, and the test statistic stays well-formed.

use std::collections::{BTreeMap, HashMap, HashSet};

use proptest::prelude::*;

use blockfreq::block::BlockId;
use blockfreq::config::ProfileConfig;
use blockfreq::frequency::{FrequencyProfile, Profiler};
use blockfreq::membership::BloomFilter;
use blockfreq::statistics::{BucketSeries, ChiSquareTest, FrequencyDistribution};
use blockfreq::traits::MembershipSketch;

// =============================================================================
// GENERATORS
// =============================================================================

/// Paired observed/expected weight sequences of equal length
fn weights_strategy() -> impl Strategy<Value = (Vec<u64>, Vec<u64>)> {
    (1usize..20).prop_flat_map(|len| {
        (
            prop::collection::vec(0u64..200, len),
            prop::collection::vec(0u64..200, len),
        )
    })
}

/// Consistent profile: explicit counts never exceed the block count
fn profile_strategy() -> impl Strategy<Value = FrequencyProfile> {
    (
        prop::collection::btree_map(any::<u64>(), 2u64..50, 0..40),
        0u64..500,
    )
        .prop_map(|(counts, singletons)| {
            let recorded: u64 = counts.values().sum();
            let counts: BTreeMap<BlockId, u64> = counts
                .into_iter()
                .map(|(id, c)| (BlockId::from(id), c))
                .collect();
            FrequencyProfile::new(recorded + singletons, 64, 0.01, counts)
        })
}

/// Exact membership, so profiler counts can be checked against ground truth
#[derive(Default)]
struct ExactSet(HashSet<Vec<u8>>);

impl MembershipSketch for ExactSet {
    fn insert(&mut self, item: &[u8]) {
        self.0.insert(item.to_vec());
    }

    fn contains(&self, item: &[u8]) -> bool {
        self.0.contains(item)
    }

    fn false_positive_rate(&self) -> f64 {
        0.0
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

proptest! {
    #[test]
    fn prop_bloom_no_false_negatives(
        items in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 1..500)
    ) {
        let mut bloom = BloomFilter::new(items.len(), 0.01).unwrap();
        for item in &items {
            bloom.insert(item);
        }
        for item in &items {
            prop_assert!(bloom.contains(item));
        }
    }

    #[test]
    fn prop_block_id_orders_numerically(a in any::<u128>(), b in any::<u128>()) {
        prop_assert_eq!(BlockId::from(a).cmp(&BlockId::from(b)), a.cmp(&b));
        prop_assert_eq!(BlockId::from(a).to_string(), a.to_string());
    }
}

// =============================================================================
// PROFILING AND RECONSTRUCTION
// =============================================================================

proptest! {
    #[test]
    fn prop_exact_profiler_matches_ground_truth(
        ids in prop::collection::vec(0u64..64, 1..400)
    ) {
        let config = ProfileConfig::new(64, 0.01).unwrap();
        let mut profiler = Profiler::with_filter(ExactSet::default(), config);
        let mut truth: HashMap<u64, u64> = HashMap::new();

        for &id in &ids {
            profiler.observe(&BlockId::from(id));
            *truth.entry(id).or_insert(0) += 1;
        }
        let profile = profiler.finish();

        prop_assert_eq!(profile.num_blocks(), ids.len() as u64);
        for (&id, &n) in &truth {
            let recorded = profile.count(&BlockId::from(id));
            if n == 1 {
                prop_assert_eq!(recorded, None);
            } else {
                prop_assert_eq!(recorded, Some(n));
            }
        }

        let dist = FrequencyDistribution::from_profile(&profile).unwrap();
        prop_assert_eq!(dist.distinct_blocks(), truth.len() as u64);
    }

    #[test]
    fn prop_reconstruction_accounts_for_every_block(profile in profile_strategy()) {
        let dist = FrequencyDistribution::from_profile(&profile).unwrap();
        prop_assert_eq!(dist.total_occurrences(), profile.num_blocks());
        prop_assert!(dist.iter().all(|(_, n)| n > 0));
    }

    #[test]
    fn prop_overfull_profile_rejected(profile in profile_strategy(), deficit in 1u64..10) {
        prop_assume!(profile.recorded_occurrences() >= deficit);
        let num_blocks = profile.recorded_occurrences() - deficit;

        let err = FrequencyDistribution::reconstruct(&profile, num_blocks).unwrap_err();
        prop_assert!(err.is_data_integrity());
    }
}

// =============================================================================
// MERGING AND TESTING
// =============================================================================

proptest! {
    #[test]
    fn prop_merge_preserves_mass((observed, expected) in weights_strategy(), min_freq in 1u64..20) {
        let series = BucketSeries::from_weights(&observed, &expected).unwrap();
        let merged = series.merge(min_freq);

        prop_assert_eq!(merged.total_observed(), series.total_observed());
        prop_assert_eq!(merged.total_expected(), series.total_expected());
        prop_assert!(merged.len() <= series.len());
        prop_assert!(!merged.is_empty());
    }

    #[test]
    fn prop_merge_reaches_floor((observed, mut expected) in weights_strategy(), min_freq in 1u64..20) {
        // A leading bucket at the floor leaves every merged bucket at the floor
        expected[0] = expected[0].max(min_freq);
        let series = BucketSeries::from_weights(&observed, &expected).unwrap();
        let merged = series.merge(min_freq);

        prop_assert_eq!(merged.under_floor(min_freq), 0);
        prop_assert_eq!(merged.merge(min_freq), merged);
    }

    #[test]
    fn prop_chi_square_well_formed((observed, expected) in weights_strategy()) {
        let expected: Vec<u64> = expected.into_iter().map(|e| e + 1).collect();
        let series = BucketSeries::from_weights(&observed, &expected).unwrap();
        prop_assume!(series.len() >= 2);

        let test = ChiSquareTest::compute(&series).unwrap();
        prop_assert!(test.statistic >= 0.0);
        prop_assert!(test.statistic.is_finite());
        prop_assert!((0.0..=1.0).contains(&test.p_value), "p = {}", test.p_value);
        prop_assert_eq!(test.degrees_of_freedom, series.len() - 1);
    }
}
