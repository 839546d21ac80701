//! Lazy enumeration of unordered index pairs.

use std::iter::FusedIterator;

/// Number of unordered pairs `{i, j}` with `i < j` among `n` items
pub fn pair_count(n: usize) -> usize {
    n.saturating_mul(n.saturating_sub(1)) / 2
}

/// Iterator over every pair `(i, j)` with `i < j < n`, in lexicographic order
///
/// Only the two cursors are stored, so memory stays constant however many
/// pairs there are.
#[derive(Debug, Clone)]
pub struct PairIter {
    n: usize,
    i: usize,
    j: usize,
    remaining: usize,
}

impl PairIter {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            i: 0,
            j: 1,
            remaining: pair_count(n),
        }
    }
}

impl Iterator for PairIter {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let pair = (self.i, self.j);
        self.remaining -= 1;

        self.j += 1;
        if self.j >= self.n {
            self.i += 1;
            self.j = self.i + 1;
        }

        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PairIter {}

impl FusedIterator for PairIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_count() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(5), 10);
    }

    #[test]
    fn test_pairs_in_lexicographic_order() {
        let pairs: Vec<_> = PairIter::new(4).collect();
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(PairIter::new(0).next(), None);
        assert_eq!(PairIter::new(1).next(), None);
    }

    #[test]
    fn test_exact_size() {
        let mut iter = PairIter::new(6);
        assert_eq!(iter.len(), 15);
        iter.next();
        assert_eq!(iter.len(), 14);
        assert_eq!(iter.count(), 14);
    }

    #[test]
    fn test_every_pair_once() {
        let n = 7;
        let pairs: Vec<_> = PairIter::new(n).collect();
        assert_eq!(pairs.len(), pair_count(n));
        for (i, j) in &pairs {
            assert!(i < j && *j < n);
        }
        let unique: std::collections::HashSet<_> = pairs.iter().collect();
        assert_eq!(unique.len(), pairs.len());
    }
}
