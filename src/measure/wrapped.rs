//! Measures that adjust a base measure using caller-supplied data, e.g. a
//! term-weight table or a precomputed pairwise score matrix.

use std::fmt;

use super::VectorMeasure;
use super::options::MeasureOptions;
use crate::vector::TermVector;

/// Adjusts the scores of a base measure.
///
/// `base` is the base measure's score for the same pair; implementations may
/// ignore it entirely (lookup tables) or rescale it.
pub trait MeasureAdjustment: Send + Sync + fmt::Debug {
    fn similarity(&self, base: f64, v1: &TermVector, v2: &TermVector) -> f64;
    fn distance(&self, base: f64, v1: &TermVector, v2: &TermVector) -> f64;
}

/// A base measure plus auxiliary data.
#[derive(Debug)]
pub struct WrappedMeasure<A: MeasureAdjustment> {
    name: String,
    base: Box<dyn VectorMeasure>,
    adjustment: A,
}

impl<A: MeasureAdjustment> WrappedMeasure<A> {
    pub fn new(name: impl Into<String>, base: Box<dyn VectorMeasure>, adjustment: A) -> Self {
        Self {
            name: name.into(),
            base,
            adjustment,
        }
    }

    pub fn base(&self) -> &dyn VectorMeasure {
        self.base.as_ref()
    }

    pub fn adjustment(&self) -> &A {
        &self.adjustment
    }

    pub fn base_similarity(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        self.base.similarity(v1, v2)
    }

    pub fn base_distance(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        self.base.distance(v1, v2)
    }
}

impl<A: MeasureAdjustment> VectorMeasure for WrappedMeasure<A> {
    fn canonical_name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &MeasureOptions {
        self.base.options()
    }

    fn similarity(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        self.adjustment
            .similarity(self.base_similarity(v1, v2), v1, v2)
    }

    fn distance(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        self.adjustment.distance(self.base_distance(v1, v2), v1, v2)
    }
}

/// Multiplies both scores by a constant factor.
#[derive(Debug, Clone, Copy)]
pub struct Scaled(pub f64);

impl MeasureAdjustment for Scaled {
    fn similarity(&self, base: f64, _: &TermVector, _: &TermVector) -> f64 {
        base * self.0
    }

    fn distance(&self, base: f64, _: &TermVector, _: &TermVector) -> f64 {
        base * self.0
    }
}
