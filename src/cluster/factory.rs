//! Build a configured algorithm from its name.

use std::sync::Arc;

use super::base::ClusteringAlgoBase;
use super::brown::Brown;
use super::growseed::GrowSeeds;
use super::incr::SingleLink;
use super::kmeans::KMeans;
use super::names::{ClusteringAlgorithm, parse_cluster_algorithm_name};
use super::stubs::Deferred;
use super::ClusteringAlgo;
use crate::error::{ClusterError, ClusterResult};
use crate::measure::VectorMeasure;

/// Create the algorithm registered under `name` and apply `options`.
///
/// `measure`, when given, replaces any measure named in `options`.
pub fn instantiate(
    name: &str,
    options: &str,
    measure: Option<Box<dyn VectorMeasure>>,
) -> ClusterResult<Box<dyn ClusteringAlgo>> {
    let algorithm = parse_cluster_algorithm_name(name).map_err(ClusterError::UnknownAlgorithm)?;
    let mut base = ClusteringAlgoBase::default();
    base.parse_options(options)?;
    if let Some(measure) = measure {
        base.set_measure(Arc::from(measure));
    }
    tracing::debug!(
        algorithm = algorithm.name(),
        measure = base.measure().canonical_name(),
        "instantiated clustering algorithm"
    );
    Ok(create(algorithm, base))
}

/// Wrap an already configured base in the algorithm for `algorithm`.
pub fn create(algorithm: ClusteringAlgorithm, base: ClusteringAlgoBase) -> Box<dyn ClusteringAlgo> {
    match algorithm {
        ClusteringAlgorithm::KMeans => Box::new(KMeans::new(base)),
        ClusteringAlgorithm::KMedoids => Box::new(KMeans::medoids(base)),
        ClusteringAlgorithm::Brown => Box::new(Brown::new(base)),
        ClusteringAlgorithm::Agglomerative => Box::new(Brown::agglomerative(base)),
        ClusteringAlgorithm::SingleLink => Box::new(SingleLink::new(base)),
        ClusteringAlgorithm::MultipassSingleLink => Box::new(SingleLink::multipass(base)),
        ClusteringAlgorithm::GrowSeeds => Box::new(GrowSeeds::new(base)),
        ClusteringAlgorithm::Dbscan
        | ClusteringAlgorithm::Optics
        | ClusteringAlgorithm::SharedNeighbors
        | ClusteringAlgorithm::Tight
        | ClusteringAlgorithm::Annealing => Box::new(Deferred::new(algorithm, base)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NameError;
    use crate::measure::{MeasureKind, MeasureOptions, create_measure};

    #[test]
    fn test_every_registered_name_instantiates() {
        for name in crate::cluster::enumerate_cluster_algorithm_names(None) {
            let algo = instantiate(name, "", None).unwrap();
            assert_eq!(algo.algorithm(), parse_cluster_algorithm_name(name).unwrap());
        }
    }

    #[test]
    fn test_names_resolve_by_prefix() {
        assert_eq!(instantiate("kmed", "", None).unwrap().name(), "K-Medoids");
        assert_eq!(instantiate("incr2", "", None).unwrap().name(), "Multi-Single-Link");
        assert!(matches!(
            instantiate("k", "", None),
            Err(ClusterError::UnknownAlgorithm(NameError::Ambiguous { .. }))
        ));
        assert!(matches!(
            instantiate("spectral", "", None),
            Err(ClusterError::UnknownAlgorithm(NameError::NoMatch { .. }))
        ));
    }

    #[test]
    fn test_options_and_explicit_measure() {
        let algo = instantiate("kmeans", "k=3:measure=jaccard:it=5", None).unwrap();
        assert_eq!(algo.base().desired_clusters(), 3);
        assert_eq!(algo.base().max_iterations(), 5);
        assert_eq!(algo.base().measure().canonical_name(), "Jaccard");

        let euclid = create_measure(MeasureKind::Euclidean, MeasureOptions::default());
        let algo = instantiate("kmeans", "measure=jaccard", euclid).unwrap();
        assert_eq!(algo.base().measure().canonical_name(), "Euclidean");

        assert!(matches!(
            instantiate("brown", "k=2:thresh=abc", None),
            Err(ClusterError::InvalidOptions { .. })
        ));
    }
}
