//! Vectors, labels and the numeric helpers shared by measures and algorithms.
//!
//! A [`TermVector`] is either dense or sparse; the representation is fixed at
//! construction through the [`Elements`] sum type.

mod centroid;
mod label;
mod term;
mod types;

pub use centroid::{Accumulator, centroid};
pub use label::{Label, LabelGenerator};
pub use term::{Elements, Entries, TermVector, for_each_pair};
pub use types::{
    ElementIndex, ElementValue, Normalization, Scalar, normalization_weight, p_log_p,
};
