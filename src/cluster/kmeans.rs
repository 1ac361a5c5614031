//! K-Means and K-Medoids.
//!
//! Both run the same loop and differ only in how a cluster's center is
//! recomputed: the centroid of its members, or the member closest to that
//! centroid.
//!
//! # Algorithm Details
//! - Initialization: random sample (`fastinit`) or greedy maximal separation
//! - Iteration: assign to nearest center, extract clusters, recompute centers
//! - Stops when no vector changes cluster, after `iterations` passes, or on
//!   cancellation
//! - `hardlimit` splits the largest clusters until exactly K exist
//!
//! # Performance Characteristics
//! - O(n * k) similarity evaluations per iteration
//! - Assignment and center updates run on the worker pool

use std::sync::Arc;

use rand::Rng;

use super::base::{ClusteringAlgoBase, Extraction};
use super::info::{ClusterInfo, VectorRef};
use super::names::{ClusterRep, ClusteringAlgorithm};
use super::session::ClusteringSession;
use super::ClusteringAlgo;
use crate::error::ClusterResult;
use crate::vector::LabelGenerator;

/// K-Means, or K-Medoids when built with [`KMeans::medoids`].
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    base: ClusteringAlgoBase,
    medoids: bool,
}

impl KMeans {
    pub fn new(base: ClusteringAlgoBase) -> Self {
        Self {
            base,
            medoids: false,
        }
    }

    pub fn medoids(base: ClusteringAlgoBase) -> Self {
        Self {
            base,
            medoids: true,
        }
    }

    fn center_rep(&self) -> ClusterRep {
        if self.medoids {
            ClusterRep::Medoid
        } else {
            ClusterRep::Centroid
        }
    }

    /// Pick `k` distinct input indices as the initial centers.
    fn select_initial(&self, vectors: &[VectorRef], k: usize) -> Vec<usize> {
        let mut rng = rand::rng();
        if self.base.options().fast_init {
            return rand::seq::index::sample(&mut rng, vectors.len(), k).into_vec();
        }

        // Greedy separation: each round takes the candidate whose highest
        // similarity to any chosen center is lowest, then drops that pick's
        // most similar remaining neighbor while enough candidates are left.
        let measure = self.base.measure();
        let pool = self.base.pool();
        let mut remaining: Vec<usize> = (0..vectors.len()).collect();
        let first = remaining.swap_remove(rng.random_range(0..remaining.len()));
        let mut selected = vec![first];

        while selected.len() < k && !remaining.is_empty() {
            let closeness = pool.parallelize(remaining.len(), |i| {
                let candidate = &vectors[remaining[i]];
                selected
                    .iter()
                    .map(|&s| measure.similarity(candidate, &vectors[s]))
                    .fold(f64::NEG_INFINITY, f64::max)
            });
            let pick = argmin(&closeness);
            let chosen = remaining.swap_remove(pick);
            selected.push(chosen);

            let still_needed = k - selected.len();
            if remaining.len() > still_needed && still_needed > 0 {
                let sims = pool.parallelize(remaining.len(), |i| {
                    measure.similarity(&vectors[remaining[i]], &vectors[chosen])
                });
                remaining.swap_remove(argmax(&sims));
            }
        }
        selected
    }

    /// New center for every cluster, carrying the cluster's label.
    fn recompute_centers(&self, clusters: &[ClusterInfo]) -> Vec<VectorRef> {
        let rep = self.center_rep();
        let measure = self.base.measure();
        self.base
            .pool()
            .parallelize(clusters.len(), |i| {
                let mut cluster = clusters[i].clone();
                cluster.set_representative(rep, measure);
                match (cluster.representative(), cluster.label()) {
                    (Some(center), Some(label)) => Some(Arc::new(center.relabeled(label.clone()))),
                    _ => None,
                }
            })
            .into_iter()
            .flatten()
            .collect()
    }

    /// Split members off the largest clusters until there are `k` of them.
    fn enforce_limit(&self, clusters: &mut Vec<ClusterInfo>, k: usize, labels: &LabelGenerator) {
        let rep = self.center_rep();
        let measure = self.base.measure();
        while clusters.len() < k {
            let Some(largest) = (0..clusters.len())
                .filter(|&i| clusters[i].size() > 1)
                .max_by_key(|&i| clusters[i].size())
            else {
                break;
            };
            let cluster = &mut clusters[largest];
            cluster.set_representative(rep, measure);
            let mut members = cluster.take_members();
            let furthest = match cluster.representative() {
                Some(center) => argmin(
                    &members
                        .iter()
                        .map(|m| measure.similarity(m, center))
                        .collect::<Vec<_>>(),
                ),
                None => members.len() - 1,
            };
            let split = members.remove(furthest);
            cluster.add_vectors(members);
            cluster.set_representative(rep, measure);

            let label = labels.generate();
            split.set_label(Some(label.clone()));
            let mut single = ClusterInfo::from_members(vec![split]);
            single.set_label(Some(label));
            single.set_representative(rep, measure);
            tracing::debug!(from = largest, "hard limit split off one vector");
            clusters.push(single);
        }
    }
}

impl ClusteringAlgo for KMeans {
    fn algorithm(&self) -> ClusteringAlgorithm {
        if self.medoids {
            ClusteringAlgorithm::KMedoids
        } else {
            ClusteringAlgorithm::KMeans
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
        let (active, empty): (Vec<VectorRef>, Vec<VectorRef>) =
            vectors.iter().cloned().partition(|v| !v.is_empty());
        let k = self.base.desired_clusters().max(1);

        if active.len() <= k {
            self.base.log(
                1,
                format!("{} non-empty vectors for {k} clusters, using singletons", active.len()),
            );
            let mut root = ClusterInfo::singleton_clusters(&active);
            root.add_vectors(empty);
            return Ok(self.base.finish(root));
        }

        let mut centers: Vec<VectorRef> = self
            .select_initial(&active, k)
            .into_iter()
            .map(|i| Arc::new(active[i].relabeled(session.labels().generate())))
            .collect();
        self.base.log(
            1,
            format!("{}: {} vectors, {} initial centers", self.name(), active.len(), centers.len()),
        );

        let max_iterations = self.base.max_iterations();
        let mut extraction = Extraction::default();
        for iteration in 1..=max_iterations {
            let progress = session.progress("assign", active.len());
            let changed =
                self.base
                    .assign_to_nearest(&active, &centers, progress.as_ref(), f64::NEG_INFINITY);
            progress.finish();
            extraction = self.base.extract_clusters(&active);
            tracing::debug!(
                iteration,
                changed,
                clusters = extraction.clusters.len(),
                "assignment pass"
            );
            if changed == 0 {
                self.base.log(1, format!("converged after {iteration} iterations"));
                break;
            }
            if session.is_cancelled() {
                tracing::warn!(iteration, "clustering interrupted, returning current clusters");
                break;
            }
            if iteration < max_iterations {
                centers = self.recompute_centers(&extraction.clusters);
            }
        }

        let Extraction {
            mut clusters,
            unassigned,
        } = extraction;
        if self.base.options().hard_limit {
            self.enforce_limit(&mut clusters, k, session.labels());
        }
        let rep = self.center_rep();
        for cluster in &mut clusters {
            if cluster.representative().is_none() {
                cluster.set_representative(rep, self.base.measure());
            }
        }

        let mut root = ClusterInfo::from_subclusters(clusters);
        root.add_vectors(unassigned);
        root.add_vectors(empty);
        Ok(self.base.finish(root))
    }
}

/// Index of the smallest value; first one on ties.
fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(bi, bv), (i, &v)| if v < bv { (i, v) } else { (bi, bv) })
        .0
}

/// Index of the largest value; first one on ties.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
        .0
}
