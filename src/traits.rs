//! Core traits
//!
//! The frequency profiler is written against [`MembershipSketch`] rather than a
//! concrete filter, so any structure with "no false negatives" semantics can
//! drive the counting policy.

/// Approximate set membership (Bloom filters and friends)
pub trait MembershipSketch {
    /// Add an item to the set
    ///
    /// Inserting the same item twice leaves the structure unchanged, apart
    /// from the insertion counter.
    fn insert(&mut self, item: &[u8]);

    /// Test if item might be in set
    ///
    /// - `true` means item might be present (possible false positive)
    /// - `false` means item is definitely not present
    fn contains(&self, item: &[u8]) -> bool;

    /// Theoretical false positive rate given current state
    fn false_positive_rate(&self) -> f64;

    /// Number of insert calls made
    fn len(&self) -> usize;

    /// Check if nothing was inserted
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Exact set used to check the trait's default methods
    #[derive(Default)]
    struct ExactSet {
        items: HashSet<Vec<u8>>,
        inserts: usize,
    }

    impl MembershipSketch for ExactSet {
        fn insert(&mut self, item: &[u8]) {
            self.inserts += 1;
            self.items.insert(item.to_vec());
        }

        fn contains(&self, item: &[u8]) -> bool {
            self.items.contains(item)
        }

        fn false_positive_rate(&self) -> f64 {
            0.0
        }

        fn len(&self) -> usize {
            self.inserts
        }
    }

    #[test]
    fn test_is_empty() {
        let mut set = ExactSet::default();
        assert!(set.is_empty());

        set.insert(b"block");
        assert!(!set.is_empty());
        assert!(set.contains(b"block"));
    }
}
