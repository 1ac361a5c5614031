//! Shared 2x2 co-occurrence tables.
//!
//! Each table is computed once per comparison by a free function and then
//! handed to a measure-specific scoring formula.

use super::options::MeasureOptions;
use crate::vector::{TermVector, for_each_pair, normalization_weight};

/// Weighted overlap of two vectors.
///
/// For each index the common mass `min(x/wt1, y/wt2)` goes to `both` and the
/// remainders to `v1_only`/`v2_only`; indices present on one side only are
/// entirely unshared.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContingencyTable {
    pub both: f64,
    pub v1_only: f64,
    pub v2_only: f64,
}

impl ContingencyTable {
    pub fn compute(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> Self {
        let wt1 = normalization_weight(v1.values(), opts.normalize);
        let wt2 = normalization_weight(v2.values(), opts.normalize);
        let mut table = Self::default();
        for_each_pair(v1, v2, |_, x, y| {
            let x = x / wt1;
            let y = y / wt2;
            let common = x.min(y).max(0.0);
            table.both += common;
            table.v1_only += x - common;
            table.v2_only += y - common;
        });
        table
    }

    pub fn total1(&self) -> f64 {
        self.both + self.v1_only
    }

    pub fn total2(&self) -> f64 {
        self.both + self.v2_only
    }

    pub fn sum(&self) -> f64 {
        self.both + self.v1_only + self.v2_only
    }
}

/// Presence/absence counts over the union of stored indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryContingencyTable {
    pub both: usize,
    pub v1_only: usize,
    pub v2_only: usize,
    pub neither: usize,
}

impl BinaryContingencyTable {
    pub fn compute(v1: &TermVector, v2: &TermVector) -> Self {
        let mut table = Self::default();
        for_each_pair(v1, v2, |_, x, y| match (x != 0.0, y != 0.0) {
            (true, true) => table.both += 1,
            (true, false) => table.v1_only += 1,
            (false, true) => table.v2_only += 1,
            (false, false) => table.neither += 1,
        });
        table
    }

    pub fn total(&self) -> usize {
        self.both + self.v1_only + self.v2_only + self.neither
    }

    /// The counts as floats, `(a, b, c, d)`.
    pub fn as_f64(&self) -> (f64, f64, f64, f64) {
        (
            self.both as f64,
            self.v1_only as f64,
            self.v2_only as f64,
            self.neither as f64,
        )
    }
}

/// Agreement counts: both present, present on exactly one side, neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryAgreement {
    pub both: usize,
    pub disagree: usize,
    pub neither: usize,
}

impl BinaryAgreement {
    pub fn compute(v1: &TermVector, v2: &TermVector) -> Self {
        let mut stats = [0usize; 3];
        for_each_pair(v1, v2, |_, x, y| {
            stats[usize::from(x != 0.0) + usize::from(y != 0.0)] += 1;
        });
        Self {
            neither: stats[0],
            disagree: stats[1],
            both: stats[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Normalization;

    #[test]
    fn test_weighted_table() {
        let v1 = TermVector::sparse(vec![(0, 2.0), (1, 1.0)]);
        let v2 = TermVector::sparse(vec![(0, 1.0), (2, 3.0)]);
        let t = ContingencyTable::compute(&v1, &v2, &MeasureOptions::default());
        assert_eq!(t.both, 1.0);
        assert_eq!(t.v1_only, 2.0);
        assert_eq!(t.v2_only, 3.0);
        assert_eq!(t.sum(), 6.0);
    }

    #[test]
    fn test_weighted_table_with_normalization() {
        let v1 = TermVector::dense(vec![1.0, 1.0]);
        let v2 = TermVector::dense(vec![2.0, 2.0]);
        let opts = MeasureOptions {
            normalize: Normalization::L1,
            ..MeasureOptions::default()
        };
        let t = ContingencyTable::compute(&v1, &v2, &opts);
        assert!((t.both - 1.0).abs() < 1e-12);
        assert!(t.v1_only.abs() < 1e-12);
        assert!(t.v2_only.abs() < 1e-12);
    }

    #[test]
    fn test_binary_counts() {
        let v1 = TermVector::dense(vec![1.0, 0.0, 3.0, 0.0]);
        let v2 = TermVector::dense(vec![2.0, 5.0, 0.0, 0.0]);
        let t = BinaryContingencyTable::compute(&v1, &v2);
        assert_eq!(
            t,
            BinaryContingencyTable {
                both: 1,
                v1_only: 1,
                v2_only: 1,
                neither: 1
            }
        );
        let a = BinaryAgreement::compute(&v1, &v2);
        assert_eq!(
            a,
            BinaryAgreement {
                both: 1,
                disagree: 2,
                neither: 1
            }
        );
    }
}
