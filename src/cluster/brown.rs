//! Brown and agglomerative clustering.
//!
//! Both start from one singleton per vector and repeatedly merge the most
//! similar pair of clusters. Brown keeps the merge tree and gives every
//! vector a path label through it; agglomerative flattens each final cluster.
//!
//! # Algorithm Details
//! Clusters live in an arena of slots that never move, so cached neighbor
//! indices stay valid across merges. Each active slot caches its best
//! similarity and the slot achieving it. After merging slot `j` into slot
//! `i`:
//! - row `i` is recomputed from scratch, scoring `(i, r)` for every row `r`
//! - a row whose cached neighbor was `i` or `j` is patched when the merged
//!   cluster is at least as similar as the cache, recomputed otherwise
//! - every other row is patched when the merged cluster beats its cache
//!
//! Merging stops when the best similarity falls below `threshold`, when
//! `numclusters` clusters remain, or on cancellation.

use super::base::ClusteringAlgoBase;
use super::info::{ClusterInfo, VectorRef};
use super::names::ClusteringAlgorithm;
use super::session::ClusteringSession;
use super::ClusteringAlgo;
use crate::error::ClusterResult;
use crate::vector::Label;

/// Separator between the components of a Brown path label.
pub const PATH_SEPARATOR: &str = "/";

#[derive(Debug)]
struct Slot {
    cluster: ClusterInfo,
    active: bool,
    best: f64,
    nbr: Option<usize>,
}

/// Arena plus neighbor cache.
#[derive(Debug)]
struct MergeState<'a> {
    base: &'a ClusteringAlgoBase,
    slots: Vec<Slot>,
    active: usize,
}

impl<'a> MergeState<'a> {
    fn new(base: &'a ClusteringAlgoBase, vectors: &[VectorRef]) -> Self {
        let rep = base.options().representative;
        let slots: Vec<Slot> = vectors
            .iter()
            .cloned()
            .map(|v| {
                let mut cluster = ClusterInfo::singleton(v);
                cluster.set_representative(rep, base.measure());
                Slot {
                    cluster,
                    active: true,
                    best: f64::NEG_INFINITY,
                    nbr: None,
                }
            })
            .collect();
        let active = slots.len();
        let mut state = Self {
            base,
            slots,
            active,
        };
        let rows = state
            .base
            .pool()
            .parallelize(state.slots.len(), |i| state.best_neighbor(i));
        for (slot, (best, nbr)) in state.slots.iter_mut().zip(rows) {
            slot.best = best;
            slot.nbr = nbr;
        }
        state
    }

    fn similarity(&self, a: usize, b: usize) -> f64 {
        let opts = self.base.options();
        self.slots[a].cluster.similarity(
            Some(&self.slots[b].cluster),
            opts.representative,
            self.base.measure(),
        )
    }

    /// Full scan of row `i`. Ties go to the lowest slot.
    fn best_neighbor(&self, i: usize) -> (f64, Option<usize>) {
        let mut best = f64::NEG_INFINITY;
        let mut nbr = None;
        for j in 0..self.slots.len() {
            if j == i || !self.slots[j].active {
                continue;
            }
            let sim = self.similarity(i, j);
            if nbr.is_none() || sim > best {
                best = sim;
                nbr = Some(j);
            }
        }
        (best, nbr)
    }

    /// The globally best pair `(i, nbr(i), sim)`, first found on ties.
    fn best_pair(&self) -> Option<(usize, usize, f64)> {
        let mut found: Option<(usize, usize, f64)> = None;
        for (i, slot) in self.slots.iter().enumerate() {
            let (true, Some(j)) = (slot.active, slot.nbr) else {
                continue;
            };
            if found.is_none_or(|(_, _, best)| slot.best > best) {
                found = Some((i, j, slot.best));
            }
        }
        found
    }

    /// Merge slot `j` into slot `i` and repair the cache.
    fn merge(&mut self, i: usize, j: usize, session: &ClusteringSession) {
        let opts = self.base.options();
        let left = std::mem::take(&mut self.slots[i].cluster);
        let right = std::mem::take(&mut self.slots[j].cluster);
        let mut merged = left.merge(right, false, session.labels());
        merged.set_representative(opts.representative, self.base.measure());
        self.slots[i].cluster = merged;
        self.slots[j].active = false;
        self.slots[j].nbr = None;
        self.active -= 1;

        let n = self.slots.len();
        let state = &*self;
        // Measures may be asymmetric: row `r` scores (r, i), row `i` scores (i, r).
        let sims = self.base.pool().parallelize(n, |r| {
            if r != i && state.slots[r].active {
                (state.similarity(r, i), state.similarity(i, r))
            } else {
                (f64::NAN, f64::NAN)
            }
        });

        let mut row_best = f64::NEG_INFINITY;
        let mut row_nbr = None;
        let mut stale = Vec::new();
        for r in 0..n {
            if r == i || !self.slots[r].active {
                continue;
            }
            let (sim, back) = sims[r];
            if row_nbr.is_none() || back > row_best {
                row_best = back;
                row_nbr = Some(r);
            }
            let slot = &mut self.slots[r];
            if slot.nbr == Some(i) || slot.nbr == Some(j) {
                if sim >= slot.best {
                    slot.best = sim;
                    slot.nbr = Some(i);
                } else {
                    stale.push(r);
                }
            } else if sim > slot.best {
                slot.best = sim;
                slot.nbr = Some(i);
            }
        }
        self.slots[i].best = row_best;
        self.slots[i].nbr = row_nbr;

        let state = &*self;
        let rows = self
            .base
            .pool()
            .parallelize(stale.len(), |x| state.best_neighbor(stale[x]));
        for (r, (best, nbr)) in stale.into_iter().zip(rows) {
            self.slots[r].best = best;
            self.slots[r].nbr = nbr;
        }
    }

    fn into_clusters(self) -> Vec<ClusterInfo> {
        self.slots
            .into_iter()
            .filter(|s| s.active)
            .map(|s| s.cluster)
            .collect()
    }
}

/// Brown clustering, or agglomerative clustering when built with
/// [`Brown::agglomerative`].
#[derive(Debug, Clone, Default)]
pub struct Brown {
    base: ClusteringAlgoBase,
    flatten: bool,
}

impl Brown {
    pub fn new(base: ClusteringAlgoBase) -> Self {
        Self {
            base,
            flatten: false,
        }
    }

    pub fn agglomerative(base: ClusteringAlgoBase) -> Self {
        Self {
            base,
            flatten: true,
        }
    }

    fn run_merges(&self, state: &mut MergeState<'_>, session: &ClusteringSession) -> usize {
        let k = self.base.desired_clusters();
        let threshold = self.base.threshold();
        let progress = session.progress("merge", state.active.saturating_sub(k.max(1)));
        let mut merges = 0;
        loop {
            if session.is_cancelled() {
                tracing::warn!(merges, "clustering interrupted, returning current clusters");
                break;
            }
            if k > 0 && state.active <= k {
                break;
            }
            let Some((i, j, best)) = state.best_pair() else {
                break;
            };
            if best < threshold {
                self.base.log(1, format!("best similarity {best:.4} below threshold"));
                break;
            }
            tracing::debug!(first = i, second = j, similarity = best, "merging");
            state.merge(i, j, session);
            merges += 1;
            progress.increment();
        }
        progress.finish();
        merges
    }
}

impl ClusteringAlgo for Brown {
    fn algorithm(&self) -> ClusteringAlgorithm {
        if self.flatten {
            ClusteringAlgorithm::Agglomerative
        } else {
            ClusteringAlgorithm::Brown
        }
    }

    fn base(&self) -> &ClusteringAlgoBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ClusteringAlgoBase {
        &mut self.base
    }

    fn cluster_with(
        &self,
        vectors: &[VectorRef],
        session: &ClusteringSession,
    ) -> ClusterResult<ClusterInfo> {
        if let Some(trivial) = self.base.prepare(vectors)? {
            return Ok(trivial);
        }
        let mut state = MergeState::new(&self.base, vectors);
        let merges = self.run_merges(&mut state, session);
        self.base.log(
            1,
            format!("{}: {merges} merges, {} clusters", self.name(), state.active),
        );

        let mut clusters = state.into_clusters();
        for cluster in &mut clusters {
            let label = match cluster.label() {
                Some(label) => label.clone(),
                None => session.labels().generate(),
            };
            if self.flatten {
                label_members(cluster, &label);
            } else {
                cluster.label_subcluster_paths(label.as_str(), PATH_SEPARATOR);
            }
        }
        let mut root = ClusterInfo::from_subclusters(clusters);
        if self.flatten {
            root.flatten_subclusters();
        }
        Ok(self.base.finish(root))
    }
}

fn label_members(cluster: &mut ClusterInfo, label: &Label) {
    for v in cluster.all_members() {
        v.set_label(Some(label.clone()));
    }
    cluster.set_label(Some(label.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{MeasureKind, MeasureOptions, create_measure};
    use crate::vector::TermVector;
    use std::sync::Arc;

    fn vectors(points: &[[f32; 3]]) -> Vec<VectorRef> {
        points
            .iter()
            .map(|p| Arc::new(TermVector::dense(p.to_vec())))
            .collect()
    }

    fn base(spec: &str) -> ClusteringAlgoBase {
        let mut base = ClusteringAlgoBase::default();
        base.parse_options(spec).unwrap();
        base
    }

    /// The cached best of every active row must match a full recomputation.
    fn assert_cache_consistent(state: &MergeState<'_>) {
        for (i, slot) in state.slots.iter().enumerate() {
            if !slot.active {
                continue;
            }
            let (best, _) = state.best_neighbor(i);
            let Some(nbr) = slot.nbr else {
                assert_eq!(state.active, 1);
                continue;
            };
            assert!(
                (slot.best - best).abs() < 1e-9,
                "row {i}: cached {} but full scan gives {best}",
                slot.best
            );
            assert!(state.slots[nbr].active);
            assert!((state.similarity(i, nbr) - best).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cache_matches_full_recompute_after_every_merge() {
        let vs = vectors(&[
            [1.0, 0.0, 0.0],
            [0.9, 0.2, 0.0],
            [0.0, 1.0, 0.1],
            [0.1, 0.8, 0.3],
            [0.0, 0.1, 1.0],
            [0.3, 0.3, 0.9],
            [0.5, 0.5, 0.0],
            [0.2, 0.0, 0.7],
        ]);
        let tversky: Arc<dyn crate::measure::VectorMeasure> = Arc::from(
            create_measure(
                MeasureKind::Tversky,
                MeasureOptions::parse("alpha=0.9:beta=0.1").unwrap(),
            )
            .unwrap(),
        );
        for asymmetric in [false, true] {
            for rep in ["centroid", "average", "nearest", "furthest"] {
                let mut base = base(&format!("rep={rep}"));
                if asymmetric {
                    base.set_measure(tversky.clone());
                }
                let session = ClusteringSession::new();
                let mut state = MergeState::new(&base, &vs);
                assert_cache_consistent(&state);
                while state.active > 1 {
                    let (i, j, _) = state.best_pair().unwrap();
                    state.merge(i, j, &session);
                    assert_cache_consistent(&state);
                }
            }
        }
    }

    #[test]
    fn test_merged_row_scores_its_own_direction() {
        let vs = vectors(&[
            [1.0, 0.0, 0.0],
            [0.9, 0.2, 0.0],
            [0.0, 1.0, 0.1],
            [0.1, 0.8, 0.3],
            [0.0, 0.1, 1.0],
            [0.3, 0.3, 0.9],
        ]);
        let mut base = base("rep=centroid");
        base.set_measure(Arc::from(
            create_measure(
                MeasureKind::Tversky,
                MeasureOptions::parse("alpha=0.9:beta=0.1").unwrap(),
            )
            .unwrap(),
        ));
        let session = ClusteringSession::new();
        let mut state = MergeState::new(&base, &vs);
        let (i, j, _) = state.best_pair().unwrap();
        state.merge(i, j, &session);

        let (best, nbr) = state.best_neighbor(i);
        assert!((state.slots[i].best - best).abs() < 1e-9);
        assert_eq!(state.slots[i].nbr, nbr);
    }

    #[test]
    fn test_two_identical_pairs() {
        let vs = vectors(&[
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let b = base("thr=0.99:k=0");
        let session = ClusteringSession::new();
        let mut state = MergeState::new(&b, &vs);
        let brown = Brown::new(b.clone());
        assert_eq!(brown.run_merges(&mut state, &session), 2);
        assert_eq!(state.active, 2);
        assert!(state.best_pair().unwrap().2 <= 0.0);
    }

    #[test]
    fn test_brown_path_labels() {
        let vs = vectors(&[
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let root = Brown::new(base("thr=0.99")).cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), 2);
        let first = root.subclusters()[0].label().unwrap().as_str().to_string();
        assert!(Label::new(&first).is_generated());
        assert_eq!(vs[0].label().unwrap().as_str(), format!("{first}/0"));
        assert_eq!(vs[1].label().unwrap().as_str(), format!("{first}/1"));
    }

    #[test]
    fn test_agglomerative_flattens() {
        let vs = vectors(&[
            [1.0, 0.0, 0.0],
            [0.95, 0.05, 0.0],
            [0.9, 0.1, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.95, 0.05],
        ]);
        let root = Brown::agglomerative(base("thr=0.5:k=2")).cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), 2);
        assert!(root.subclusters().iter().all(ClusterInfo::is_flat));
        let sizes: Vec<usize> = root.subclusters().iter().map(ClusterInfo::size).collect();
        assert_eq!(sizes, vec![3, 2]);
        assert_eq!(vs[0].label(), vs[2].label());
        assert_ne!(vs[0].label(), vs[3].label());
    }

    #[test]
    fn test_threshold_stops_early() {
        let vs = vectors(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let root = Brown::new(base("thr=0.5:k=1")).cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), 3);
    }
}
