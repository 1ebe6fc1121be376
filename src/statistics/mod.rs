//! Statistical comparison of frequency profiles
//!
//! Two profiles are turned into frequency-of-frequencies distributions,
//! paired into buckets weighted by block occurrences, merged until every
//! expected weight reaches the validity floor, and scored with Pearson's
//! chi-square test.
//!
//! # Example
//!
//! ```
//! use blockfreq::statistics::{BucketSeries, ChiSquareTest};
//!
//! let series = BucketSeries::from_weights(&[9, 4, 2], &[10, 3, 2]).unwrap();
//! let merged = series.merge(5);
//! let test = ChiSquareTest::compute(&merged).unwrap();
//!
//! println!("chi2 = {}, df = {}, p = {}", test.statistic, test.degrees_of_freedom, test.p_value);
//! ```

mod buckets;
mod chi_square;
mod compare;
mod distribution;

pub use buckets::{Bucket, BucketSeries};
pub use chi_square::ChiSquareTest;
pub use compare::{compare_profiles, Comparison};
pub use distribution::FrequencyDistribution;
