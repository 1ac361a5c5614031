//! Grow clusters around labelled seed vectors.
//!
//! Each unlabelled vector joins the seed it is most similar to, provided the
//! similarity reaches `threshold`. Vectors no seed claims stay at the top
//! level of the result.

use super::base::{ClusteringAlgoBase, Extraction, is_seed};
use super::info::{ClusterInfo, VectorRef};
use super::names::ClusteringAlgorithm;
use super::session::ClusteringSession;
use super::ClusteringAlgo;
use crate::error::ClusterResult;

#[derive(Debug, Clone, Default)]
pub struct GrowSeeds {
    base: ClusteringAlgoBase,
}

impl GrowSeeds {
    pub fn new(base: ClusteringAlgoBase) -> Self {
        Self { base }
    }
}

impl ClusteringAlgo for GrowSeeds {
    fn algorithm(&self) -> ClusteringAlgorithm {
        ClusteringAlgorithm::GrowSeeds
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
        let (seeds, unseeded): (Vec<VectorRef>, Vec<VectorRef>) =
            vectors.iter().cloned().partition(|v| is_seed(v));
        if seeds.is_empty() {
            tracing::warn!("no labelled seed vectors, nothing to grow");
        }
        for v in &unseeded {
            v.set_label(None);
        }

        let progress = session.progress("grow", unseeded.len());
        let assigned =
            self.base
                .assign_to_nearest(&unseeded, &seeds, progress.as_ref(), self.base.threshold());
        progress.finish();
        self.base.log(
            1,
            format!(
                "{}: {} seeds, {assigned} of {} vectors assigned",
                self.name(),
                seeds.len(),
                unseeded.len()
            ),
        );

        let Extraction {
            mut clusters,
            unassigned,
        } = self.base.extract_clusters(vectors);
        let rep = self.base.options().representative;
        for cluster in &mut clusters {
            cluster.set_representative(rep, self.base.measure());
        }
        let mut root = ClusterInfo::from_subclusters(clusters);
        root.add_vectors(unassigned);
        Ok(self.base.finish(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::TermVector;
    use std::sync::Arc;

    #[test]
    fn test_unclaimed_vectors_stay_on_top() {
        let vs: Vec<VectorRef> = vec![
            Arc::new(TermVector::dense(vec![1.0, 0.0]).with_label("east")),
            Arc::new(TermVector::dense(vec![0.0, 1.0]).with_label("north")),
            Arc::new(TermVector::dense(vec![0.9, 0.2])),
            Arc::new(TermVector::dense(vec![0.1, 0.9])),
            Arc::new(TermVector::dense(vec![0.7, 0.7])),
        ];
        let mut base = ClusteringAlgoBase::default();
        base.parse_options("thr=0.9").unwrap();
        let root = GrowSeeds::new(base).cluster(&vs).unwrap();

        assert_eq!(root.num_subclusters(), 2);
        assert_eq!(root.subclusters()[0].size(), 2);
        assert_eq!(root.subclusters()[1].size(), 2);
        assert_eq!(vs[2].label().unwrap().as_str(), "east");
        assert_eq!(vs[3].label().unwrap().as_str(), "north");
        assert_eq!(root.members().len(), 1);
        assert!(Arc::ptr_eq(&root.members()[0], &vs[4]));
        assert_eq!(root.size(), 5);
    }

    #[test]
    fn test_without_seeds_everything_is_unassigned() {
        let vs: Vec<VectorRef> = vec![
            Arc::new(TermVector::dense(vec![1.0, 0.0])),
            Arc::new(TermVector::dense(vec![0.0, 1.0])),
        ];
        let root = GrowSeeds::default().cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), 0);
        assert_eq!(root.members().len(), 2);
    }
}
