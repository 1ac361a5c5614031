//! Element-wise accumulation used to build centroids.

use super::term::TermVector;
use super::types::ElementIndex;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Sums {
    Dense(Vec<f64>),
    Sparse(BTreeMap<ElementIndex, f64>),
}

/// Running sum of vectors.
///
/// Dense centroids are the element-wise mean of the inputs; sparse centroids
/// are the plain sum, which keeps the direction (all the angle-based measures
/// care about) without rescaling every entry.
#[derive(Debug, Clone)]
pub struct Accumulator {
    sums: Sums,
    count: usize,
}

impl Accumulator {
    pub fn new(sparse: bool) -> Self {
        let sums = if sparse {
            Sums::Sparse(BTreeMap::new())
        } else {
            Sums::Dense(Vec::new())
        };
        Self { sums, count: 0 }
    }

    /// Resume accumulation from a centroid that already stands for `count`
    /// vectors.
    pub fn resume(centroid: &TermVector, count: usize) -> Self {
        let mut acc = Self::new(centroid.is_sparse());
        let weight = match acc.sums {
            Sums::Dense(_) => count as f64,
            Sums::Sparse(_) => 1.0,
        };
        acc.add_weighted(centroid, weight);
        acc.count = count;
        acc
    }

    /// Add one vector (the accumulate-in-place `incr` step).
    pub fn add(&mut self, v: &TermVector) {
        self.add_weighted(v, 1.0);
        self.count += 1;
    }

    fn add_weighted(&mut self, v: &TermVector, weight: f64) {
        match &mut self.sums {
            Sums::Dense(sums) => {
                for (idx, val) in v.iter() {
                    let idx = idx as usize;
                    if idx >= sums.len() {
                        sums.resize(idx + 1, 0.0);
                    }
                    sums[idx] += weight * f64::from(val);
                }
            }
            Sums::Sparse(sums) => {
                for (idx, val) in v.iter() {
                    *sums.entry(idx).or_insert(0.0) += weight * f64::from(val);
                }
            }
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Finish into a new unlabelled vector.
    pub fn finish(self) -> TermVector {
        match self.sums {
            Sums::Dense(sums) => {
                let n = self.count.max(1) as f64;
                TermVector::dense(sums.into_iter().map(|s| (s / n) as f32).collect())
            }
            Sums::Sparse(sums) => {
                TermVector::sparse(sums.into_iter().map(|(idx, s)| (idx, s as f32)))
            }
        }
    }
}

/// Centroid of `members`; `None` when there are none.
pub fn centroid<'a, I>(members: I, sparse: bool) -> Option<TermVector>
where
    I: IntoIterator<Item = &'a TermVector>,
{
    let mut acc = Accumulator::new(sparse);
    for v in members {
        acc.add(v);
    }
    (acc.count() > 0).then(|| acc.finish())
}
