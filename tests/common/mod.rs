use std::collections::BTreeSet;
use std::sync::Arc;

use clusterkit::cluster::{ClusterInfo, VectorRef};
use clusterkit::vector::TermVector;

/// Dense vectors from fixed-size rows.
pub fn dense<const N: usize>(rows: &[[f32; N]]) -> Vec<VectorRef> {
    rows.iter()
        .map(|r| Arc::new(TermVector::dense(r.to_vec())))
        .collect()
}

/// Indices into `input` of every vector below `cluster`.
pub fn member_indices(cluster: &ClusterInfo, input: &[VectorRef]) -> BTreeSet<usize> {
    cluster
        .all_members()
        .iter()
        .filter_map(|m| input.iter().position(|v| Arc::ptr_eq(v, m)))
        .collect()
}

/// Two groups of three, near the x and y axes.
pub fn two_groups() -> Vec<VectorRef> {
    dense(&[
        [1.0, 0.1],
        [0.9, 0.2],
        [1.0, 0.05],
        [0.1, 1.0],
        [0.2, 0.9],
        [0.05, 1.0],
    ])
}
