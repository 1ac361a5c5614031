//! Pluggable clustering of dense and sparse term vectors.
//!
//! Algorithms and similarity measures are looked up by name (unique prefixes
//! accepted) and configured with colon-separated option strings. See
//! [`cluster`] for the algorithm interface and [`measure`] for the measures.

pub mod cluster;
pub mod config;
pub mod display;
pub mod error;
pub mod io;
pub mod logging;
pub mod measure;
pub mod pipeline;
pub mod prefix;
pub mod vector;

// Explicit exports for better API clarity
pub use cluster::{
    ClusterInfo, ClusterRep, ClusteringAlgo, ClusteringAlgorithm, ClusteringSession, VectorRef,
    instantiate,
};
pub use config::Settings;
pub use error::{
    ClusterError, ClusterResult, InputError, InputResult, MeasureError, MeasureResult, NameError,
};
pub use measure::{MeasureKind, MeasureOptions, VectorMeasure, create_measure};
pub use vector::{Label, TermVector};
