//! Vector similarity and distance measures.
//!
//! Every measure implements [`VectorMeasure`]. Concrete measures are built by
//! [`create_measure`] from a [`MeasureKind`]; the kind is usually obtained by
//! resolving a user-supplied name with [`parse_vector_measure_name`].
//!
//! A measure computes one of its two scores and derives the other through a
//! fixed [`Derivation`], or computes both directly. Families that score a
//! co-occurrence table share the table computation and differ only in the
//! [`formulas`] callback.

pub mod direct;
pub mod factory;
pub mod family;
pub mod formulas;
pub mod names;
pub mod options;
pub mod table;
pub mod wrapped;

use std::fmt;

use crate::vector::TermVector;

pub use factory::{create_measure, create_measure_named, scoring_for};
pub use family::{Derivation, FormulaMeasure, IdentityMeasure, Score, Scoring, TableKind};
pub use names::{MEASURE_NAMES, MeasureKind, enumerate_vector_measure_names, parse_vector_measure_name};
pub use options::MeasureOptions;
pub use table::{BinaryAgreement, BinaryContingencyTable, ContingencyTable};
pub use wrapped::{MeasureAdjustment, Scaled, WrappedMeasure};

/// Similarity/distance between two vectors.
///
/// Similarity `1` and distance `0` mean identical. Implementations hold
/// only their options and are shared read-only across worker threads.
pub trait VectorMeasure: Send + Sync + fmt::Debug {
    /// Display name, e.g. `"Cosine"`.
    fn canonical_name(&self) -> &str;

    /// The registry entry this measure was built from, if any.
    fn kind(&self) -> Option<MeasureKind> {
        None
    }

    fn options(&self) -> &MeasureOptions;

    fn similarity(&self, v1: &TermVector, v2: &TermVector) -> f64;

    fn distance(&self, v1: &TermVector, v2: &TermVector) -> f64;

    /// Score in the measure's preferred direction: similarity unless the
    /// options ask for distance.
    fn score(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        if self.options().use_similarity {
            self.similarity(v1, v2)
        } else {
            self.distance(v1, v2)
        }
    }
}

/// The measure used when none is configured.
pub fn default_measure() -> Box<dyn VectorMeasure> {
    Box::new(FormulaMeasure::new(
        MeasureKind::Cosine,
        Scoring::Direct {
            similarity: direct::cosine_similarity,
            distance: direct::cosine_distance,
        },
        MeasureOptions::default(),
    ))
}
