//! Algorithm and representative name registries.

use serde::{Deserialize, Serialize};

use crate::error::NameError;
use crate::prefix::PrefixTable;

/// Every clustering algorithm the factory knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusteringAlgorithm {
    Agglomerative,
    Annealing,
    Brown,
    Dbscan,
    GrowSeeds,
    SingleLink,
    MultipassSingleLink,
    KMeans,
    KMedoids,
    Optics,
    SharedNeighbors,
    Tight,
}

/// Algorithm names. The first entry for an algorithm is its display name.
pub static ALGORITHM_NAMES: PrefixTable<ClusteringAlgorithm> = PrefixTable::new(
    "clustering algorithm",
    &[
        ("Agglomerative", ClusteringAlgorithm::Agglomerative),
        ("Annealing", ClusteringAlgorithm::Annealing),
        ("Brown", ClusteringAlgorithm::Brown),
        ("DBScan", ClusteringAlgorithm::Dbscan),
        ("GrowSeeds", ClusteringAlgorithm::GrowSeeds),
        ("Single-Link", ClusteringAlgorithm::SingleLink),
        ("SingleLink", ClusteringAlgorithm::SingleLink),
        ("INCR", ClusteringAlgorithm::SingleLink),
        ("Multi-Single-Link", ClusteringAlgorithm::MultipassSingleLink),
        ("MultiSingleLink", ClusteringAlgorithm::MultipassSingleLink),
        ("INCR2", ClusteringAlgorithm::MultipassSingleLink),
        ("K-Means", ClusteringAlgorithm::KMeans),
        ("KMeans", ClusteringAlgorithm::KMeans),
        ("K-Medoids", ClusteringAlgorithm::KMedoids),
        ("KMedoids", ClusteringAlgorithm::KMedoids),
        ("K-Medioids", ClusteringAlgorithm::KMedoids),
        ("KMedioids", ClusteringAlgorithm::KMedoids),
        ("OPTICS", ClusteringAlgorithm::Optics),
        ("Shared-NN", ClusteringAlgorithm::SharedNeighbors),
        ("SharedNN", ClusteringAlgorithm::SharedNeighbors),
        ("Shared-Neighbors", ClusteringAlgorithm::SharedNeighbors),
        ("SNN", ClusteringAlgorithm::SharedNeighbors),
        ("Tight", ClusteringAlgorithm::Tight),
    ],
);

impl ClusteringAlgorithm {
    pub fn name(self) -> &'static str {
        ALGORITHM_NAMES.name_of(self).unwrap_or("Unknown")
    }

    /// False for registered algorithms that only report `Unimplemented`.
    #[must_use]
    pub fn is_implemented(self) -> bool {
        !matches!(
            self,
            Self::Dbscan | Self::Optics | Self::SharedNeighbors | Self::Tight | Self::Annealing
        )
    }
}

/// How a cluster is summarised when compared against a vector or another
/// cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterRep {
    /// Element-wise mean (dense) or sum (sparse) of the members.
    #[default]
    Centroid,
    /// The member most similar to the centroid.
    Medoid,
    /// First vector of the first non-empty branch.
    Prototype,
    /// Most recently added vector.
    Newest,
    /// Mean over all cross pairs.
    Average,
    /// Worst cross pair (complete link).
    Furthest,
    /// Best cross pair (single link).
    Nearest,
    /// Root mean square over all cross pairs.
    Rms,
}

impl ClusterRep {
    /// Linkage policies compare every member pair instead of a single
    /// representative vector.
    #[must_use]
    pub fn is_linkage(self) -> bool {
        matches!(
            self,
            ClusterRep::Average | ClusterRep::Furthest | ClusterRep::Nearest | ClusterRep::Rms
        )
    }

    pub fn name(self) -> &'static str {
        REPRESENTATIVE_NAMES.name_of(self).unwrap_or("Unknown")
    }
}

pub static REPRESENTATIVE_NAMES: PrefixTable<ClusterRep> = PrefixTable::new(
    "cluster representative",
    &[
        ("Average", ClusterRep::Average),
        ("Centroid", ClusterRep::Centroid),
        ("Furthest", ClusterRep::Furthest),
        ("Medoid", ClusterRep::Medoid),
        ("Medioid", ClusterRep::Medoid),
        ("Nearest", ClusterRep::Nearest),
        ("Newest", ClusterRep::Newest),
        ("Prototype", ClusterRep::Prototype),
        ("RMS", ClusterRep::Rms),
    ],
);

/// Resolve an algorithm name (case-insensitive, unique prefixes accepted).
pub fn parse_cluster_algorithm_name(name: &str) -> Result<ClusteringAlgorithm, NameError> {
    ALGORITHM_NAMES.resolve(name)
}

/// All algorithm names, or those starting with `prefix`.
pub fn enumerate_cluster_algorithm_names(prefix: Option<&str>) -> Vec<&'static str> {
    ALGORITHM_NAMES.enumerate(prefix)
}

pub fn parse_cluster_representative_name(name: &str) -> Result<ClusterRep, NameError> {
    REPRESENTATIVE_NAMES.resolve(name)
}

pub fn enumerate_cluster_representative_names(prefix: Option<&str>) -> Vec<&'static str> {
    REPRESENTATIVE_NAMES.enumerate(prefix)
}
