//! Input validation shared by every algorithm.

use std::sync::Arc;

use clusterkit::cluster::{ClusteringAlgo, VectorRef, enumerate_cluster_algorithm_names, instantiate, parse_cluster_algorithm_name};
use clusterkit::io::ExitCode;
use clusterkit::vector::TermVector;
use clusterkit::ClusterError;

fn mixed() -> Vec<VectorRef> {
    vec![
        Arc::new(TermVector::dense(vec![1.0, 0.0])),
        Arc::new(TermVector::sparse(vec![(0, 1.0)])),
        Arc::new(TermVector::dense(vec![0.0, 1.0])),
    ]
}

#[test]
fn test_mixed_vectors_rejected_by_every_algorithm() {
    for name in enumerate_cluster_algorithm_names(None) {
        let algo = instantiate(name, "", None).unwrap();
        match algo.cluster(&mixed()) {
            Err(ClusterError::MixedVectorTypes { dense: 2, sparse: 1 }) => {}
            other => panic!("{name}: expected mixed-type error, got {other:?}"),
        }
    }
}

#[test]
fn test_empty_input_rejected_by_every_algorithm() {
    for name in enumerate_cluster_algorithm_names(None) {
        let algo = instantiate(name, "", None).unwrap();
        let err = algo.cluster(&[]).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyInput), "{name}: {err}");
        assert!(err.is_input_error());
        assert_eq!(ExitCode::from_error(&err), ExitCode::InvalidInput);
    }
}

#[test]
fn test_unimplemented_algorithms_are_distinguishable() {
    let vs: Vec<VectorRef> = vec![
        Arc::new(TermVector::dense(vec![1.0, 0.0])),
        Arc::new(TermVector::dense(vec![0.0, 1.0])),
        Arc::new(TermVector::dense(vec![0.5, 0.5])),
    ];
    for name in enumerate_cluster_algorithm_names(None) {
        let algorithm = parse_cluster_algorithm_name(name).unwrap();
        let result = instantiate(name, "thr=0.1", None).unwrap().cluster(&vs);
        if algorithm.is_implemented() {
            assert!(result.is_ok(), "{name}: {:?}", result.err());
        } else {
            let err = result.unwrap_err();
            assert!(matches!(err, ClusterError::Unimplemented { .. }), "{name}");
            assert!(!err.is_input_error());
            assert_eq!(ExitCode::from_error(&err), ExitCode::UnsupportedOperation);
        }
    }
}

#[test]
fn test_invalid_options_report_every_problem() {
    let err = match instantiate("kmeans", "k=two:bogus=1:it=3", None) {
        Err(e) => e,
        Ok(_) => panic!("options should be rejected"),
    };
    let ClusterError::InvalidOptions { errors } = &err else {
        panic!("unexpected error {err:?}");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
}
