//! Clustering algorithms over [`TermVector`](crate::vector::TermVector)s.
//!
//! An algorithm is created by [`instantiate`] from a registered name and an
//! option string, then run with [`ClusteringAlgo::cluster`]. The result is a
//! [`ClusterInfo`] tree whose root holds one subcluster per cluster and, as
//! direct members, every input vector no cluster claimed.
//!
//! ```no_run
//! use std::sync::Arc;
//! use clusterkit::cluster::{instantiate, ClusteringAlgo};
//! use clusterkit::vector::TermVector;
//!
//! let vectors: Vec<_> = [[1.0, 0.0], [0.9, 0.1], [0.0, 1.0]]
//!     .iter()
//!     .map(|p| Arc::new(TermVector::dense(p.to_vec())))
//!     .collect();
//! let algo = instantiate("kmeans", "k=2", None)?;
//! let root = algo.cluster(&vectors)?;
//! assert_eq!(root.size(), 3);
//! # Ok::<(), clusterkit::ClusterError>(())
//! ```

pub mod base;
pub mod brown;
pub mod factory;
pub mod growseed;
pub mod incr;
pub mod info;
pub mod kmeans;
pub mod names;
pub mod options;
pub mod pool;
pub mod progress;
pub mod session;
pub mod stubs;

pub use base::{ClusteringAlgoBase, Extraction};
pub use factory::instantiate;
pub use info::{ClusterFlags, ClusterInfo, UNDEFINED_SCORE, VectorRef};
pub use names::{
    ALGORITHM_NAMES, ClusterRep, ClusteringAlgorithm, REPRESENTATIVE_NAMES,
    enumerate_cluster_algorithm_names, enumerate_cluster_representative_names,
    parse_cluster_algorithm_name, parse_cluster_representative_name,
};
pub use options::ClusterOptions;
pub use pool::WorkerPool;
pub use progress::{NoProgress, ProgressReporter, ProgressSink};
pub use session::{CancellationToken, ClusteringSession};

use crate::error::ClusterResult;

/// A configured clustering algorithm.
pub trait ClusteringAlgo: Send + Sync {
    fn algorithm(&self) -> ClusteringAlgorithm;

    fn base(&self) -> &ClusteringAlgoBase;

    fn base_mut(&mut self) -> &mut ClusteringAlgoBase;

    /// Cluster `vectors` using the labels, cancellation flag and progress
    /// reporter of `session`.
    fn cluster_with(
        &self,
        vectors: &[VectorRef],
        session: &ClusteringSession,
    ) -> ClusterResult<ClusterInfo>;

    /// Cluster `vectors` in a fresh session.
    fn cluster(&self, vectors: &[VectorRef]) -> ClusterResult<ClusterInfo> {
        self.cluster_with(vectors, &ClusteringSession::new())
    }

    fn name(&self) -> &'static str {
        self.algorithm().name()
    }

    /// Apply a colon-separated option string.
    fn parse_options(&mut self, spec: &str) -> ClusterResult<()> {
        self.base_mut().parse_options(spec)
    }
}
