//! Incremental single-link growth, with an optional multi-pass refinement.
//!
//! Vectors that arrive with a user label seed one cluster per label. Every
//! other vector, in input order, joins its most similar cluster when that
//! similarity reaches `threshold` and starts a new cluster otherwise. With
//! `hardlimit` no more than `numclusters` clusters are created; once the cap
//! is reached a poorly matching vector joins its nearest cluster anyway, or
//! stays unassigned under `ignoreextra`.
//!
//! The multi-pass variant then reassigns the grown vectors against the
//! cluster representatives until no vector moves or `iterations` passes
//! have run.

use std::sync::Arc;

use super::base::{ClusteringAlgoBase, Extraction, is_seed};
use super::info::{ClusterInfo, VectorRef};
use super::names::{ClusterRep, ClusteringAlgorithm};
use super::progress::NoProgress;
use super::session::ClusteringSession;
use super::ClusteringAlgo;
use crate::error::ClusterResult;
use crate::measure::VectorMeasure;
use crate::vector::Label;

#[derive(Debug, Clone, Default)]
pub struct SingleLink {
    base: ClusteringAlgoBase,
    multipass: bool,
}

/// Clusters plus the vectors that were left out.
struct Growth {
    clusters: Vec<ClusterInfo>,
    grown: Vec<VectorRef>,
    seeds: Vec<VectorRef>,
    unassigned: Vec<VectorRef>,
}

impl SingleLink {
    pub fn new(base: ClusteringAlgoBase) -> Self {
        Self {
            base,
            multipass: false,
        }
    }

    pub fn multipass(base: ClusteringAlgoBase) -> Self {
        Self {
            base,
            multipass: true,
        }
    }

    fn grow(&self, vectors: &[VectorRef], session: &ClusteringSession) -> Growth {
        let opts = self.base.options();
        let rep = opts.representative;
        let measure = self.base.measure();

        let (seeds, others): (Vec<VectorRef>, Vec<VectorRef>) =
            vectors.iter().cloned().partition(|v| is_seed(v));
        let Extraction { mut clusters, .. } = self.base.extract_clusters(&seeds);
        for cluster in &mut clusters {
            cluster.set_representative(rep, measure);
        }
        let cap = opts.hard_limit.then_some(opts.desired_clusters.max(1));

        let progress = session.progress("grow", others.len());
        let mut grown = Vec::with_capacity(others.len());
        let mut unassigned = Vec::new();
        for (done, vector) in others.iter().enumerate() {
            if session.is_cancelled() {
                tracing::warn!(done, "clustering interrupted, remaining vectors left unassigned");
                unassigned.extend(others[done..].iter().cloned());
                break;
            }
            progress.increment();
            let nearest = self.base.find_nearest_cluster(&clusters, vector, &NoProgress);
            let target = match nearest {
                Some((idx, sim)) if sim >= opts.threshold => Some(idx),
                nearest if cap.is_some_and(|c| clusters.len() >= c) => {
                    if opts.ignore_extra {
                        None
                    } else {
                        nearest.map(|(idx, _)| idx)
                    }
                }
                _ => {
                    let label = session.labels().generate();
                    let mut cluster = ClusterInfo::from_members(Vec::new());
                    cluster.set_label(Some(label));
                    clusters.push(cluster);
                    Some(clusters.len() - 1)
                }
            };
            match target {
                Some(idx) => {
                    join(&mut clusters[idx], vector, rep, measure);
                    grown.push(Arc::clone(vector));
                }
                None => unassigned.push(Arc::clone(vector)),
            }
        }
        progress.finish();

        Growth {
            clusters,
            grown,
            seeds,
            unassigned,
        }
    }

    /// Reassign the grown vectors against the current representatives.
    fn refine(&self, growth: &mut Growth, session: &ClusteringSession) {
        let rep = self.base.options().representative;
        let measure = self.base.measure();
        for pass in 1..=self.base.max_iterations() {
            if session.is_cancelled() {
                tracing::warn!(pass, "clustering interrupted, keeping current clusters");
                break;
            }
            let centers = centers_of(&growth.clusters, rep, measure);
            let progress = session.progress("reassign", growth.grown.len());
            let changed = self.base.assign_to_nearest(
                &growth.grown,
                &centers,
                progress.as_ref(),
                f64::NEG_INFINITY,
            );
            progress.finish();
            tracing::debug!(pass, changed, "reassignment pass");
            if changed == 0 {
                break;
            }
            let mut members = growth.seeds.clone();
            members.extend(growth.grown.iter().cloned());
            let Extraction { mut clusters, .. } = self.base.extract_clusters(&members);
            for cluster in &mut clusters {
                cluster.set_representative(rep, measure);
            }
            growth.clusters = clusters;
        }
    }
}

impl ClusteringAlgo for SingleLink {
    fn algorithm(&self) -> ClusteringAlgorithm {
        if self.multipass {
            ClusteringAlgorithm::MultipassSingleLink
        } else {
            ClusteringAlgorithm::SingleLink
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
        let mut growth = self.grow(vectors, session);
        self.base.log(
            1,
            format!(
                "{}: {} clusters grown, {} vectors unassigned",
                self.name(),
                growth.clusters.len(),
                growth.unassigned.len()
            ),
        );
        if self.multipass {
            self.refine(&mut growth, session);
        }
        if !growth.unassigned.is_empty() {
            tracing::warn!(count = growth.unassigned.len(), "vectors left unassigned");
        }
        let mut root = ClusterInfo::from_subclusters(growth.clusters);
        root.add_vectors(growth.unassigned);
        Ok(self.base.finish(root))
    }
}

fn join(
    cluster: &mut ClusterInfo,
    vector: &VectorRef,
    rep: ClusterRep,
    measure: &dyn VectorMeasure,
) {
    if !is_seed(vector) {
        vector.set_label(cluster.label().cloned());
    }
    let first = cluster.is_empty();
    cluster.add_vector(Arc::clone(vector));
    if first {
        cluster.set_representative(rep, measure);
    } else {
        cluster.update_representative(vector, rep, measure);
    }
}

/// One labelled center vector per cluster. Linkage policies have no single
/// representative, so their clusters are summarised by the centroid.
fn centers_of(
    clusters: &[ClusterInfo],
    rep: ClusterRep,
    measure: &dyn VectorMeasure,
) -> Vec<VectorRef> {
    let rep = if rep.is_linkage() {
        ClusterRep::Centroid
    } else {
        rep
    };
    clusters
        .iter()
        .filter_map(|cluster| {
            let label: Label = cluster.label()?.clone();
            let mut cluster = cluster.clone();
            cluster.set_representative(rep, measure);
            cluster
                .representative()
                .map(|center| Arc::new(center.relabeled(label)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::TermVector;

    fn vectors(points: &[([f32; 2], Option<&str>)]) -> Vec<VectorRef> {
        points
            .iter()
            .map(|(p, l)| {
                let v = TermVector::dense(p.to_vec());
                Arc::new(match l {
                    Some(l) => v.with_label(*l),
                    None => v,
                })
            })
            .collect()
    }

    fn algo(spec: &str, multipass: bool) -> SingleLink {
        let mut base = ClusteringAlgoBase::default();
        base.parse_options(spec).unwrap();
        if multipass {
            SingleLink::multipass(base)
        } else {
            SingleLink::new(base)
        }
    }

    #[test]
    fn test_grows_new_clusters_below_threshold() {
        let vs = vectors(&[
            ([1.0, 0.0], None),
            ([0.95, 0.1], None),
            ([0.0, 1.0], None),
            ([0.1, 0.95], None),
        ]);
        let root = algo("thr=0.9", false).cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), 2);
        assert_eq!(vs[0].label(), vs[1].label());
        assert_eq!(vs[2].label(), vs[3].label());
        assert_ne!(vs[0].label(), vs[2].label());
        assert!(vs[0].label().unwrap().is_generated());
    }

    #[test]
    fn test_seed_labels_are_preserved() {
        let vs = vectors(&[
            ([1.0, 0.0], Some("east")),
            ([0.0, 1.0], Some("north")),
            ([0.9, 0.1], None),
            ([0.8, 0.0], Some("east")),
        ]);
        let root = algo("thr=0.5", false).cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), 2);
        assert_eq!(vs[2].label().unwrap().as_str(), "east");
        let east = &root.subclusters()[0];
        assert_eq!(east.label().unwrap().as_str(), "east");
        assert_eq!(east.size(), 3);
    }

    #[test]
    fn test_cap_and_ignore_extra() {
        let points = [
            ([1.0, 0.0], None),
            ([0.0, 1.0], None),
            ([0.7, 0.7], None),
        ];
        let vs = vectors(&points);
        let root = algo("thr=0.99:k=2:+hardlimit", false).cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), 2);
        assert!(root.members().is_empty());
        assert_eq!(root.size(), 3);

        let vs = vectors(&points);
        let root = algo("thr=0.99:k=2:+hardlimit:+ignoreextra", false)
            .cluster(&vs)
            .unwrap();
        assert_eq!(root.num_subclusters(), 2);
        assert_eq!(root.members().len(), 1);
        assert!(Arc::ptr_eq(&root.members()[0], &vs[2]));
    }

    #[test]
    fn test_multipass_moves_early_joiners() {
        // the second vector joins the first cluster before the closer
        // cluster exists, and only a reassignment pass moves it
        let points = [
            ([1.0, 0.0], None),
            ([0.6428, 0.7660], None),
            ([0.0, 1.0], None),
            ([0.1736, 0.9848], None),
        ];
        let vs = vectors(&points);
        let single = algo("thr=0.6:rep=prototype", false).cluster(&vs).unwrap();
        assert_eq!(single.num_subclusters(), 2);
        assert_eq!(vs[1].label(), vs[0].label());

        let vs = vectors(&points);
        let multi = algo("thr=0.6:rep=prototype", true).cluster(&vs).unwrap();
        assert_eq!(multi.size(), 4);
        assert_eq!(multi.num_subclusters(), 2);
        assert_eq!(vs[1].label(), vs[2].label());
        assert_ne!(vs[0].label(), vs[1].label());
    }
}
