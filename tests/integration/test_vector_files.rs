//! Vector file to report, the path `clusterkit run` takes.

use std::fs;

use clusterkit::config::ClusteringConfig;
use clusterkit::error::InputError;
use clusterkit::io::{ClusterReport, load_vectors};
use clusterkit::pipeline::{RunOverrides, build_algorithm};
use tempfile::TempDir;

const VECTORS: &str = r#"[
  {"name": "apple",  "sparse": [[0, 2.0], [1, 1.0]]},
  {"name": "pear",   "sparse": [[0, 1.5], [1, 1.0]]},
  {"name": "plum",   "sparse": [[0, 2.0], [1, 0.8]]},
  {"name": "car",    "sparse": [[7, 1.0], [9, 2.0]]},
  {"name": "truck",  "sparse": [[7, 1.2], [9, 2.0]]},
  {"name": "bus",    "sparse": [[7, 0.9], [9, 1.7]]}
]"#;

#[test]
fn test_sparse_file_round_trip_to_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.json");
    fs::write(&path, VECTORS).unwrap();

    let set = load_vectors(&path).unwrap();
    assert_eq!(set.len(), 6);

    let overrides = RunOverrides {
        algorithm: Some("agglom".to_string()),
        options: Some("k=2:thr=0.5".to_string()),
        ..Default::default()
    };
    let algo = build_algorithm(&ClusteringConfig::default(), &overrides).unwrap();
    let root = algo.cluster(&set.vectors).unwrap();
    let report = ClusterReport::new(
        algo.name(),
        algo.base().measure().canonical_name(),
        &root,
        &set,
    );

    assert_eq!(report.algorithm, "Agglomerative");
    assert_eq!(report.vectors, 6);
    assert_eq!(report.clusters.len(), 2);
    let mut groups: Vec<Vec<&str>> = report
        .clusters
        .iter()
        .map(|c| {
            let mut names = c.all_members();
            names.sort_unstable();
            names
        })
        .collect();
    groups.sort();
    assert_eq!(
        groups,
        vec![vec!["apple", "pear", "plum"], vec!["bus", "car", "truck"]]
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["clusters"].as_array().unwrap().len(), 2);
}

#[test]
fn test_mixed_file_is_an_input_error_at_clustering_time() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.json");
    fs::write(&path, r#"[{"dense": [1, 0]}, {"sparse": [[0, 1]]}]"#).unwrap();

    let set = load_vectors(&path).unwrap();
    let algo = build_algorithm(&ClusteringConfig::default(), &RunOverrides::default()).unwrap();
    let err = algo.cluster(&set.vectors).unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_bad_file_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"[{"name": "x"}]"#).unwrap();
    assert!(matches!(
        load_vectors(&path),
        Err(InputError::MissingValues { position: 0, .. })
    ));
    assert!(matches!(
        load_vectors(&dir.path().join("absent.json")),
        Err(InputError::FileRead { .. })
    ));
}
