//! State and parallel primitives shared by every clustering algorithm.
//!
//! # Primitives
//! - [`assign_to_nearest`](ClusteringAlgoBase::assign_to_nearest): label each
//!   vector with its most similar center, returning how many labels changed
//! - [`find_nearest_cluster`](ClusteringAlgoBase::find_nearest_cluster): best
//!   cluster for one vector
//! - [`extract_clusters`](ClusteringAlgoBase::extract_clusters): group vectors
//!   by their current label
//!
//! Each primitive fans out over the [`WorkerPool`] and returns only once every
//! index has been processed.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use super::info::{ClusterInfo, UNDEFINED_SCORE, VectorRef};
use super::options::{ClusterOptions, Setting, interpret, tokens};
use super::pool::WorkerPool;
use super::progress::ProgressSink;
use crate::error::{ClusterError, ClusterResult};
use crate::measure::{MeasureOptions, VectorMeasure, create_measure, default_measure};
use crate::vector::{Label, TermVector};

/// Result of grouping vectors by label.
#[derive(Debug, Default)]
pub struct Extraction {
    /// One leaf per distinct label, in first-seen order.
    pub clusters: Vec<ClusterInfo>,
    /// Vectors that carry no label.
    pub unassigned: Vec<VectorRef>,
}

/// Seeds carry a label that did not come from a label generator.
pub fn is_seed(vector: &TermVector) -> bool {
    vector.label().is_some_and(|l| !l.is_generated())
}

/// Options, measure and pool of one configured algorithm.
#[derive(Debug, Clone)]
pub struct ClusteringAlgoBase {
    options: ClusterOptions,
    measure: Arc<dyn VectorMeasure>,
    pool: WorkerPool,
}

impl Default for ClusteringAlgoBase {
    fn default() -> Self {
        Self::new(ClusterOptions::default(), Arc::from(default_measure()))
    }
}

impl ClusteringAlgoBase {
    pub fn new(options: ClusterOptions, measure: Arc<dyn VectorMeasure>) -> Self {
        Self {
            options,
            measure,
            pool: WorkerPool::global(),
        }
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ClusterOptions {
        &mut self.options
    }

    pub fn desired_clusters(&self) -> usize {
        self.options.desired_clusters
    }

    pub fn max_iterations(&self) -> usize {
        self.options.max_iterations
    }

    pub fn threshold(&self) -> f64 {
        self.options.threshold
    }

    pub fn measure(&self) -> &dyn VectorMeasure {
        self.measure.as_ref()
    }

    pub fn set_measure(&mut self, measure: Arc<dyn VectorMeasure>) {
        self.measure = measure;
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn set_pool(&mut self, pool: WorkerPool) {
        self.pool = pool;
    }

    /// Emit `msg` when `level` does not exceed the configured verbosity.
    pub fn log(&self, level: u8, msg: impl std::fmt::Display) {
        if level <= self.options.verbosity {
            tracing::info!(target: "clusterkit::cluster", "{msg}");
        }
    }

    // ---- options ----------------------------------------------------------

    /// Check one option token without changing anything.
    pub fn validate_option(&self, token: &str) -> ClusterResult<()> {
        interpret(token, &self.options).map(|_| ())
    }

    /// Interpret and apply one option token.
    pub fn apply_option(&mut self, token: &str) -> ClusterResult<()> {
        let setting = interpret(token, &self.options)?;
        self.apply_setting(&setting)
    }

    /// Parse a colon-separated option string.
    ///
    /// Every token is attempted so all problems are reported together. The
    /// options are only changed when the whole string is valid.
    pub fn parse_options(&mut self, spec: &str) -> ClusterResult<()> {
        let mut scratch = self.options.clone();
        let mut settings = Vec::new();
        let mut errors = Vec::new();
        for token in tokens(spec) {
            match interpret(token, &scratch) {
                Ok(setting) => {
                    scratch.apply(&setting);
                    settings.push(setting);
                }
                Err(ClusterError::InvalidOptions { errors: inner }) => errors.extend(inner),
                Err(e) => errors.push(e.to_string()),
            }
        }
        if !errors.is_empty() {
            return Err(ClusterError::InvalidOptions { errors });
        }
        for setting in &settings {
            self.apply_setting(setting)?;
        }
        Ok(())
    }

    fn apply_setting(&mut self, setting: &Setting) -> ClusterResult<()> {
        if let Setting::Measure(kind) = setting {
            let measure = create_measure(*kind, MeasureOptions::default()).ok_or_else(|| {
                ClusterError::MeasureUnavailable {
                    name: kind.canonical_name().to_string(),
                }
            })?;
            self.measure = Arc::from(measure);
        }
        self.options.apply(setting);
        Ok(())
    }

    // ---- input checks -----------------------------------------------------

    /// Ok(`true`) when every vector is sparse, Ok(`false`) when every vector
    /// is dense.
    pub fn check_sparse_or_dense(&self, vectors: &[VectorRef]) -> ClusterResult<bool> {
        let sparse = vectors.iter().filter(|v| v.is_sparse()).count();
        let dense = vectors.len() - sparse;
        if sparse > 0 && dense > 0 {
            return Err(ClusterError::MixedVectorTypes { dense, sparse });
        }
        Ok(sparse > 0)
    }

    /// Common entry validation.
    ///
    /// Returns `Ok(Some(result))` when the input is too small to cluster and
    /// the trivial result is the answer, `Ok(None)` to proceed.
    pub fn prepare(&self, vectors: &[VectorRef]) -> ClusterResult<Option<ClusterInfo>> {
        if vectors.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        self.check_sparse_or_dense(vectors)?;
        if vectors.len() == 1 {
            self.log(1, "single input vector, returning it as its own cluster");
            return Ok(Some(ClusterInfo::singleton_clusters(vectors)));
        }
        Ok(None)
    }

    /// Apply the post-processing every algorithm shares.
    pub fn finish(&self, mut root: ClusterInfo) -> ClusterInfo {
        if !self.options.allow_singletons {
            let subclusters = root.take_subclusters();
            let mut loose = Vec::new();
            for sub in subclusters {
                if sub.size() == 1 {
                    loose.extend(sub.all_members());
                } else {
                    root.add_subcluster(sub);
                }
            }
            for v in &loose {
                if v.label().is_some_and(|l| l.is_generated()) {
                    v.set_label(None);
                }
            }
            root.add_vectors(loose);
        }
        tracing::debug!(
            clusters = root.num_subclusters(),
            unassigned = root.members().len(),
            size = root.size(),
            "clustering finished"
        );
        root
    }

    // ---- parallel primitives ----------------------------------------------

    /// Relabel every vector with the label of its most similar center.
    ///
    /// Centers scoring below `threshold` are ignored; a vector with no
    /// eligible center keeps its current label. Ties are broken uniformly at
    /// random, except that a vector already carrying one of the tied labels
    /// keeps it. Returns the number of vectors whose label changed.
    pub fn assign_to_nearest(
        &self,
        vectors: &[VectorRef],
        centers: &[VectorRef],
        progress: &dyn ProgressSink,
        threshold: f64,
    ) -> usize {
        let measure = self.measure.as_ref();
        let changed = self.pool.parallelize(vectors.len(), |i| {
            let vector = &vectors[i];
            let mut best = f64::NEG_INFINITY;
            let mut tied: Vec<usize> = Vec::new();
            for (c, center) in centers.iter().enumerate() {
                let sim = measure.similarity(vector, center);
                if sim.is_nan() || sim < threshold {
                    continue;
                }
                if tied.is_empty() || sim > best {
                    best = sim;
                    tied.clear();
                    tied.push(c);
                } else if sim == best {
                    tied.push(c);
                }
            }
            progress.increment();

            let current = vector.label();
            let chosen = match tied.as_slice() {
                [] => return false,
                [only] => *only,
                _ => tied
                    .iter()
                    .copied()
                    .find(|&c| current.is_some() && centers[c].label() == current)
                    .unwrap_or_else(|| tied[rand::rng().random_range(0..tied.len())]),
            };
            let label = centers[chosen].label();
            if label != current {
                vector.set_label(label);
                true
            } else {
                false
            }
        });
        changed.into_iter().filter(|c| *c).count()
    }

    /// Index and similarity of the cluster most similar to `vector` under
    /// the configured representative. Ties go to the lowest index.
    pub fn find_nearest_cluster(
        &self,
        clusters: &[ClusterInfo],
        vector: &TermVector,
        progress: &dyn ProgressSink,
    ) -> Option<(usize, f64)> {
        let measure = self.measure.as_ref();
        let rep = self.options.representative;
        let scores = self.pool.parallelize(clusters.len(), |i| {
            let sim = clusters[i].similarity_to_vector(Some(vector), rep, measure);
            progress.increment();
            sim
        });
        scores
            .into_iter()
            .enumerate()
            .filter(|(_, s)| !s.is_nan() && *s > UNDEFINED_SCORE)
            .fold(None, |best, (i, s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((i, s)),
            })
    }

    /// Group vectors into leaf clusters by their current label.
    pub fn extract_clusters(&self, vectors: &[VectorRef]) -> Extraction {
        let mut index: HashMap<Label, usize> = HashMap::new();
        let mut groups: Vec<(Label, Vec<VectorRef>)> = Vec::new();
        let mut unassigned = Vec::new();
        for v in vectors {
            let Some(label) = v.label() else {
                unassigned.push(Arc::clone(v));
                continue;
            };
            let slot = *index.entry(label.clone()).or_insert_with(|| {
                groups.push((label, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(Arc::clone(v));
        }
        let clusters = groups
            .into_iter()
            .map(|(label, members)| {
                let mut cluster = ClusterInfo::from_members(members);
                cluster.set_label(Some(label));
                cluster
            })
            .collect();
        Extraction {
            clusters,
            unassigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::names::ClusterRep;
    use crate::cluster::progress::NoProgress;

    fn labeled(points: &[([f32; 2], Option<&str>)]) -> Vec<VectorRef> {
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

    #[test]
    fn test_parse_options_is_atomic() {
        let mut base = ClusteringAlgoBase::default();
        let err = base.parse_options("k=4:bogus=1:it=x").unwrap_err();
        match err {
            ClusterError::InvalidOptions { errors } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(base.desired_clusters(), 2);

        base.parse_options("k=3:measure=jaccard:it=5").unwrap();
        assert_eq!(base.desired_clusters(), 3);
        assert_eq!(base.max_iterations(), 5);
        assert_eq!(base.measure().canonical_name(), "Jaccard");
    }

    #[test]
    fn test_toggle_sees_earlier_tokens() {
        let mut base = ClusteringAlgoBase::default();
        base.parse_options("+hardlimit:!hardlimit").unwrap();
        assert!(!base.options().hard_limit);
        assert!(base.validate_option("rep=nearest").is_ok());
        assert_eq!(base.options().representative, ClusterRep::Centroid);
        base.apply_option("rep=nearest").unwrap();
        assert_eq!(base.options().representative, ClusterRep::Nearest);
    }

    #[test]
    fn test_mixed_vectors_rejected() {
        let base = ClusteringAlgoBase::default();
        let vectors: Vec<VectorRef> = vec![
            Arc::new(TermVector::dense(vec![1.0, 0.0])),
            Arc::new(TermVector::sparse([(0, 1.0)])),
        ];
        assert!(matches!(
            base.prepare(&vectors),
            Err(ClusterError::MixedVectorTypes { dense: 1, sparse: 1 })
        ));
        assert!(matches!(base.prepare(&[]), Err(ClusterError::EmptyInput)));
        assert!(base.prepare(&vectors[..1]).unwrap().is_some());
    }

    #[test]
    fn test_assign_to_nearest_counts_changes() {
        let base = ClusteringAlgoBase::default();
        let vectors = labeled(&[([1.0, 0.1], None), ([0.1, 1.0], Some("<CL_0002>"))]);
        let centers = labeled(&[([1.0, 0.0], Some("<CL_0001>")), ([0.0, 1.0], Some("<CL_0002>"))]);
        let changed = base.assign_to_nearest(&vectors, &centers, &NoProgress, f64::NEG_INFINITY);
        assert_eq!(changed, 1);
        assert_eq!(vectors[0].label().unwrap().as_str(), "<CL_0001>");
        assert_eq!(
            base.assign_to_nearest(&vectors, &centers, &NoProgress, f64::NEG_INFINITY),
            0
        );
    }

    #[test]
    fn test_assign_threshold_excludes_centers() {
        let base = ClusteringAlgoBase::default();
        let vectors = labeled(&[([1.0, 0.0], None)]);
        let centers = labeled(&[([0.0, 1.0], Some("far"))]);
        assert_eq!(base.assign_to_nearest(&vectors, &centers, &NoProgress, 0.5), 0);
        assert!(vectors[0].label().is_none());
    }

    #[test]
    fn test_tie_keeps_current_label() {
        let base = ClusteringAlgoBase::default();
        let vectors = labeled(&[([1.0, 1.0], Some("b"))]);
        let centers = labeled(&[([1.0, 0.0], Some("a")), ([0.0, 1.0], Some("b"))]);
        for _ in 0..10 {
            assert_eq!(base.assign_to_nearest(&vectors, &centers, &NoProgress, f64::NEG_INFINITY), 0);
        }
    }

    #[test]
    fn test_find_nearest_cluster() {
        let base = ClusteringAlgoBase::default();
        let vectors = labeled(&[([1.0, 0.0], None), ([0.0, 1.0], None)]);
        let clusters: Vec<ClusterInfo> = vectors.iter().cloned().map(ClusterInfo::singleton).collect();
        let query = TermVector::dense(vec![0.2, 1.0]);
        let (idx, sim) = base.find_nearest_cluster(&clusters, &query, &NoProgress).unwrap();
        assert_eq!(idx, 1);
        assert!(sim > 0.9);
        assert!(base.find_nearest_cluster(&[], &query, &NoProgress).is_none());
    }

    #[test]
    fn test_extract_clusters_keeps_unlabeled() {
        let base = ClusteringAlgoBase::default();
        let vectors = labeled(&[
            ([1.0, 0.0], Some("x")),
            ([0.0, 1.0], None),
            ([1.0, 1.0], Some("y")),
            ([2.0, 0.0], Some("x")),
        ]);
        let Extraction {
            clusters,
            unassigned,
        } = base.extract_clusters(&vectors);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].label().unwrap().as_str(), "x");
        assert_eq!(clusters[0].size(), 2);
        assert_eq!(unassigned.len(), 1);
        assert!(Arc::ptr_eq(&unassigned[0], &vectors[1]));
    }

    #[test]
    fn test_finish_dissolves_singletons() {
        let mut base = ClusteringAlgoBase::default();
        base.apply_option("-singletons").unwrap();
        let vectors = labeled(&[
            ([1.0, 0.0], Some("x")),
            ([2.0, 0.0], Some("x")),
            ([0.0, 1.0], Some("<CL_0002>")),
        ]);
        let Extraction { clusters, .. } = base.extract_clusters(&vectors);
        let root = base.finish(ClusterInfo::from_subclusters(clusters));
        assert_eq!(root.num_subclusters(), 1);
        assert_eq!(root.members().len(), 1);
        assert_eq!(root.size(), 3);
        assert!(vectors[2].label().is_none());
    }

    #[test]
    fn test_finish_keeps_user_label_of_lone_seed() {
        let mut base = ClusteringAlgoBase::default();
        base.apply_option("-singletons").unwrap();
        let vectors = labeled(&[
            ([1.0, 0.0], Some("<CL_0001>")),
            ([2.0, 0.0], Some("<CL_0001>")),
            ([0.0, 1.0], Some("seed")),
        ]);
        let Extraction { clusters, .. } = base.extract_clusters(&vectors);
        let root = base.finish(ClusterInfo::from_subclusters(clusters));
        assert_eq!(root.num_subclusters(), 1);
        assert!(Arc::ptr_eq(&root.members()[0], &vectors[2]));
        assert_eq!(vectors[2].label().unwrap().as_str(), "seed");
        assert_eq!(vectors[0].label().unwrap().as_str(), "<CL_0001>");
    }
}
