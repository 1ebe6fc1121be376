//! Pearson chi-square goodness-of-fit test

use serde::Serialize;

use crate::error::{Error, Result};
use crate::math::chi_square_sf;

use super::BucketSeries;

/// Result of a chi-square goodness-of-fit test
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChiSquareTest {
    /// `sum((observed - expected)^2 / expected)`
    pub statistic: f64,
    /// Number of buckets minus one
    pub degrees_of_freedom: usize,
    /// Probability of a statistic at least this large under the expected
    /// distribution
    pub p_value: f64,
}

impl ChiSquareTest {
    /// Run the test over a (merged) bucket series
    ///
    /// A bucket with zero expected weight contributes nothing if its observed
    /// weight is zero too, and makes the statistic infinite otherwise.
    ///
    /// # Errors
    ///
    /// Configuration error when the series has fewer than 2 buckets.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfreq::statistics::{BucketSeries, ChiSquareTest};
    ///
    /// let series = BucketSeries::from_weights(&[9, 6], &[10, 5]).unwrap();
    /// let test = ChiSquareTest::compute(&series).unwrap();
    ///
    /// assert!((test.statistic - 0.3).abs() < 1e-12);
    /// assert_eq!(test.degrees_of_freedom, 1);
    /// ```
    pub fn compute(series: &BucketSeries) -> Result<Self> {
        if series.len() < 2 {
            return Err(Error::InsufficientBuckets {
                found: series.len(),
            });
        }

        let statistic: f64 = series
            .buckets()
            .iter()
            .map(|b| {
                let observed = b.observed as f64;
                let expected = b.expected as f64;
                if b.expected == 0 {
                    if b.observed == 0 {
                        0.0
                    } else {
                        f64::INFINITY
                    }
                } else {
                    (observed - expected).powi(2) / expected
                }
            })
            .sum();

        let degrees_of_freedom = series.len() - 1;

        Ok(Self {
            statistic,
            degrees_of_freedom,
            p_value: chi_square_sf(statistic, degrees_of_freedom),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_of(observed: &[u64], expected: &[u64]) -> Result<ChiSquareTest> {
        ChiSquareTest::compute(&BucketSeries::from_weights(observed, expected).unwrap())
    }

    #[test]
    fn test_worked_example() {
        let series = BucketSeries::from_weights(&[9, 4, 2], &[10, 3, 2])
            .unwrap()
            .merge(5);
        let test = ChiSquareTest::compute(&series).unwrap();

        assert!((test.statistic - 0.3).abs() < 1e-12, "{}", test.statistic);
        assert_eq!(test.degrees_of_freedom, 1);
        assert!((test.p_value - 0.583_882_420_770_365).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_fit() {
        let test = test_of(&[40, 30, 30], &[40, 30, 30]).unwrap();
        assert_eq!(test.statistic, 0.0);
        assert_eq!(test.degrees_of_freedom, 2);
        assert_eq!(test.p_value, 1.0);
    }

    #[test]
    fn test_needs_two_buckets() {
        let cases: [(&[u64], &[u64]); 2] = [(&[], &[]), (&[5], &[5])];
        for (obs, exp) in cases {
            let err = test_of(obs, exp).unwrap_err();
            assert!(matches!(err, Error::InsufficientBuckets { .. }));
            assert!(err.is_config());
        }
    }

    #[test]
    fn test_order_invariant() {
        let a = test_of(&[12, 30, 8, 50], &[10, 35, 10, 45]).unwrap();
        let b = test_of(&[50, 8, 12, 30], &[45, 10, 10, 35]).unwrap();

        assert!((a.statistic - b.statistic).abs() < 1e-12);
        assert_eq!(a.degrees_of_freedom, b.degrees_of_freedom);
    }

    #[test]
    fn test_not_symmetric_in_observed_expected() {
        let a = test_of(&[20, 80], &[50, 50]).unwrap();
        let b = test_of(&[50, 50], &[20, 80]).unwrap();

        // 18 + 18 vs 45 + 11.25
        assert!((a.statistic - 36.0).abs() < 1e-12);
        assert!((b.statistic - 56.25).abs() < 1e-12);
        assert!(a.p_value > b.p_value);
    }

    #[test]
    fn test_zero_expected_bucket() {
        let empty = test_of(&[10, 0], &[10, 0]).unwrap();
        assert_eq!(empty.statistic, 0.0);

        let surprise = test_of(&[9, 1], &[10, 0]).unwrap();
        assert!(surprise.statistic.is_infinite());
        assert_eq!(surprise.p_value, 0.0);
    }
}
