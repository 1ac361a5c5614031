//! Registered algorithms without an implementation yet.
//!
//! They accept the same options and validate their input like every other
//! algorithm, then report [`ClusterError::Unimplemented`] so callers can
//! tell a missing algorithm from bad input.

use super::base::ClusteringAlgoBase;
use super::info::{ClusterInfo, VectorRef};
use super::names::ClusteringAlgorithm;
use super::session::ClusteringSession;
use super::ClusteringAlgo;
use crate::error::{ClusterError, ClusterResult};

/// DBSCAN, OPTICS, shared-nearest-neighbor, tight and annealing clustering.
#[derive(Debug, Clone)]
pub struct Deferred {
    base: ClusteringAlgoBase,
    algorithm: ClusteringAlgorithm,
}

impl Deferred {
    pub fn new(algorithm: ClusteringAlgorithm, base: ClusteringAlgoBase) -> Self {
        Self { base, algorithm }
    }
}

impl ClusteringAlgo for Deferred {
    fn algorithm(&self) -> ClusteringAlgorithm {
        self.algorithm
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
        _session: &ClusteringSession,
    ) -> ClusterResult<ClusterInfo> {
        if let Some(trivial) = self.base.prepare(vectors)? {
            return Ok(trivial);
        }
        Err(ClusterError::Unimplemented {
            algorithm: self.name(),
        })
    }
}
