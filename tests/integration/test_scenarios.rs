//! End-to-end clustering runs through the public factory.

use std::collections::BTreeSet;

use clusterkit::cluster::{ClusterRep, ClusteringAlgo, instantiate};
use clusterkit::measure::default_measure;

use crate::common::{dense, member_indices, two_groups};

#[test]
fn test_kmeans_separates_two_groups() {
    let vs = two_groups();
    let algo = instantiate("kmeans", "numclusters=2:iterations=10", None).unwrap();
    assert_eq!(algo.base().measure().canonical_name(), "Cosine");

    let root = algo.cluster(&vs).unwrap();
    assert_eq!(root.num_subclusters(), 2);
    assert!(root.members().is_empty());

    let groups: BTreeSet<BTreeSet<usize>> = root
        .subclusters()
        .iter()
        .map(|c| member_indices(c, &vs))
        .collect();
    let expected: BTreeSet<BTreeSet<usize>> =
        [BTreeSet::from([0, 1, 2]), BTreeSet::from([3, 4, 5])].into();
    assert_eq!(groups, expected);
}

#[test]
fn test_kmedoids_separates_two_groups() {
    let vs = two_groups();
    let root = instantiate("kmedoids", "k=2", None)
        .unwrap()
        .cluster(&vs)
        .unwrap();
    assert_eq!(root.num_subclusters(), 2);
    for cluster in root.subclusters() {
        let members = member_indices(cluster, &vs);
        assert!(members == BTreeSet::from([0, 1, 2]) || members == BTreeSet::from([3, 4, 5]));
    }
}

#[test]
fn test_single_vector_is_a_singleton_for_every_algorithm() {
    for name in clusterkit::cluster::enumerate_cluster_algorithm_names(None) {
        let vs = dense(&[[0.3, 0.7]]);
        let algo = instantiate(name, "numclusters=2", None).unwrap();
        let root = algo
            .cluster(&vs)
            .unwrap_or_else(|e| panic!("{name} failed on one vector: {e}"));
        assert_eq!(root.num_subclusters(), 1, "{name}");
        assert_eq!(root.subclusters()[0].size(), 1, "{name}");
        assert_eq!(root.size(), 1, "{name}");
    }
}

#[test]
fn test_brown_stops_when_only_orthogonal_pairs_remain() {
    let vs = dense(&[[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]]);
    let algo = instantiate("brown", "threshold=0.99", None).unwrap();
    let root = algo.cluster(&vs).unwrap();

    assert_eq!(root.num_subclusters(), 2);
    let groups: BTreeSet<BTreeSet<usize>> = root
        .subclusters()
        .iter()
        .map(|c| member_indices(c, &vs))
        .collect();
    assert!(groups.contains(&BTreeSet::from([0, 1])));
    assert!(groups.contains(&BTreeSet::from([2, 3])));

    let measure = default_measure();
    let [a, b] = root.subclusters() else {
        panic!("expected two top-level clusters");
    };
    assert!(a.similarity(Some(b), ClusterRep::Centroid, measure.as_ref()) <= 0.0);
}

#[test]
fn test_option_string_configures_base() {
    let algo = instantiate("kmeans", "k=3:measure=jaccard:it=5", None).unwrap();
    assert_eq!(algo.base().desired_clusters(), 3);
    assert_eq!(algo.base().max_iterations(), 5);
    assert_eq!(algo.base().measure().canonical_name(), "Jaccard");
}

#[test]
fn test_hard_limit_bounds_cluster_count() {
    let points = [
        [1.0, 0.0],
        [0.9, 0.1],
        [0.0, 1.0],
        [0.1, 0.9],
        [0.7, 0.7],
        [0.6, 0.8],
    ];
    // K-Means and K-Medoids give exactly min(k, non-empty vectors).
    for (name, opts, expected) in [
        ("kmeans", "k=2:+hardlimit", 2),
        ("kmedoids", "k=2:+hardlimit", 2),
        ("kmeans", "k=8:+hardlimit", 6),
        ("kmedoids", "k=8:+hardlimit", 6),
    ] {
        let vs = dense(&points);
        let root = instantiate(name, opts, None).unwrap().cluster(&vs).unwrap();
        assert_eq!(root.num_subclusters(), expected, "{name} {opts}");
        assert_eq!(root.size(), vs.len(), "{name} {opts}");
    }

    let vs = dense(&points);
    let root = instantiate("singlelink", "k=2:thr=0.999:+hardlimit", None)
        .unwrap()
        .cluster(&vs)
        .unwrap();
    assert!(root.num_subclusters() <= 2, "singlelink: {}", root.num_subclusters());
    assert_eq!(root.size(), vs.len());
}

#[test]
fn test_growseeds_respects_seed_labels() {
    let vs = dense(&[[1.0, 0.0], [0.0, 1.0], [0.95, 0.05], [0.05, 0.95]]);
    vs[0].set_label(Some("east".into()));
    vs[1].set_label(Some("north".into()));

    let root = instantiate("grow", "thr=0.5", None).unwrap().cluster(&vs).unwrap();
    assert_eq!(root.num_subclusters(), 2);
    assert_eq!(vs[2].label().unwrap().as_str(), "east");
    assert_eq!(vs[3].label().unwrap().as_str(), "north");
}
