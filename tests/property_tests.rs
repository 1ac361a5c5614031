//! Property tests for name resolution and cluster bookkeeping.

use std::sync::Arc;

use clusterkit::cluster::{
    ALGORITHM_NAMES, ClusterInfo, ClusteringAlgo, VectorRef, instantiate,
    parse_cluster_algorithm_name,
};
use clusterkit::measure::{MEASURE_NAMES, parse_vector_measure_name};
use clusterkit::vector::{LabelGenerator, TermVector};
use proptest::prelude::*;

fn dense_vectors(max: usize) -> impl Strategy<Value = Vec<VectorRef>> {
    prop::collection::vec(prop::collection::vec(0.01f32..1.0, 3), 1..max).prop_map(|rows| {
        rows.into_iter()
            .map(|r| Arc::new(TermVector::dense(r)))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_registered_names_resolve_to_themselves(idx in 0usize..ALGORITHM_NAMES.entries().len()) {
        let (name, algorithm) = ALGORITHM_NAMES.entries()[idx];
        prop_assert_eq!(parse_cluster_algorithm_name(name).unwrap(), algorithm);
        prop_assert_eq!(parse_cluster_algorithm_name(&name.to_lowercase()).unwrap(), algorithm);
        let canonical = algorithm.name();
        prop_assert_eq!(parse_cluster_algorithm_name(canonical).unwrap(), algorithm);
    }

    #[test]
    fn prop_measure_names_are_case_insensitive(idx in 0usize..MEASURE_NAMES.entries().len()) {
        let (name, kind) = MEASURE_NAMES.entries()[idx];
        prop_assert_eq!(parse_vector_measure_name(&name.to_uppercase()).unwrap(), kind);
    }

    #[test]
    fn prop_singleton_clusters_cover_input(vs in dense_vectors(20)) {
        let root = ClusterInfo::singleton_clusters(&vs);
        prop_assert_eq!(root.num_subclusters(), vs.len());
        prop_assert!(root.subclusters().iter().all(|c| c.size() == 1));
        prop_assert_eq!(root.size(), vs.len());
    }

    #[test]
    fn prop_merge_conserves_members(vs in dense_vectors(12), split in 1usize..12, flatten in any::<bool>()) {
        let split = split.min(vs.len());
        let labels = LabelGenerator::new();
        let a = ClusterInfo::from_members(vs[..split].to_vec());
        let b = ClusterInfo::from_members(vs[split..].to_vec());
        let merged = a.merge(b, flatten, &labels);
        prop_assert_eq!(merged.size(), vs.len());
        for v in &vs {
            prop_assert!(merged.contains(v));
        }
    }

    #[test]
    fn prop_every_vector_ends_up_somewhere(vs in dense_vectors(16), k in 1usize..5) {
        for name in ["kmeans", "brown", "singlelink", "incr2"] {
            let algo = instantiate(name, &format!("k={k}:thr=0.9"), None).unwrap();
            let root = algo.cluster(&vs).unwrap();
            prop_assert_eq!(root.size(), vs.len(), "{}", name);
        }
    }
}
