//! Measure families: how a measure's primary score is computed and how the
//! complementary score is derived from it.

use std::fmt;

use super::VectorMeasure;
use super::direct::PairFn;
use super::formulas::{Counts, Formula};
use super::names::MeasureKind;
use super::options::MeasureOptions;
use super::table::{BinaryAgreement, BinaryContingencyTable, ContingencyTable};
use crate::vector::TermVector;

/// Which co-occurrence table feeds a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Weighted,
    Binary,
    Agreement,
}

impl TableKind {
    pub fn counts(self, v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> Counts {
        match self {
            TableKind::Weighted => ContingencyTable::compute(v1, v2, opts).into(),
            TableKind::Binary => BinaryContingencyTable::compute(v1, v2).into(),
            TableKind::Agreement => BinaryAgreement::compute(v1, v2).into(),
        }
    }
}

/// A primary score: either a direct pair function or a table formula.
#[derive(Clone, Copy)]
pub enum Score {
    Pair(PairFn),
    Table(TableKind, Formula),
}

impl Score {
    pub fn eval(&self, v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
        match self {
            Score::Pair(f) => f(v1, v2, opts),
            Score::Table(kind, f) => f(&kind.counts(v1, v2, opts), opts),
        }
    }
}

/// Fixed relation between a measure's similarity and its distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// `other = 1 - primary`
    Complement,
    /// `other = 1 / primary`, with `1/0 = +inf` and `1/inf = 0`.
    Reciprocal,
}

impl Derivation {
    #[inline]
    pub fn apply(self, primary: f64) -> f64 {
        match self {
            Derivation::Complement => 1.0 - primary,
            Derivation::Reciprocal if primary == 0.0 => f64::INFINITY,
            Derivation::Reciprocal => 1.0 / primary,
        }
    }
}

/// How a measure produces both of its scores.
#[derive(Clone, Copy)]
pub enum Scoring {
    /// Similarity and distance computed independently.
    Direct { similarity: PairFn, distance: PairFn },
    /// Similarity computed; distance derived.
    FromSimilarity(Score, Derivation),
    /// Distance computed; similarity derived.
    FromDistance(Score, Derivation),
}

impl Scoring {
    pub fn similarity_table(kind: TableKind, f: Formula) -> Self {
        Scoring::FromSimilarity(Score::Table(kind, f), Derivation::Complement)
    }

    pub fn distance_table(kind: TableKind, f: Formula) -> Self {
        Scoring::FromDistance(Score::Table(kind, f), Derivation::Complement)
    }

    pub fn similarity(f: PairFn) -> Self {
        Scoring::FromSimilarity(Score::Pair(f), Derivation::Complement)
    }

    pub fn distance(f: PairFn) -> Self {
        Scoring::FromDistance(Score::Pair(f), Derivation::Complement)
    }

    pub fn family(&self) -> &'static str {
        match self {
            Scoring::Direct { .. } => "direct",
            Scoring::FromSimilarity(Score::Table(..), _) => "table-similarity",
            Scoring::FromDistance(Score::Table(..), _) => "table-distance",
            Scoring::FromSimilarity(_, Derivation::Complement) => "similarity",
            Scoring::FromSimilarity(_, Derivation::Reciprocal) => "similarity-reciprocal",
            Scoring::FromDistance(_, Derivation::Complement) => "distance",
            Scoring::FromDistance(_, Derivation::Reciprocal) => "distance-reciprocal",
        }
    }
}

/// A named measure built from a [`Scoring`] strategy.
pub struct FormulaMeasure {
    kind: MeasureKind,
    scoring: Scoring,
    options: MeasureOptions,
}

impl FormulaMeasure {
    pub fn new(kind: MeasureKind, scoring: Scoring, options: MeasureOptions) -> Self {
        Self {
            kind,
            scoring,
            options,
        }
    }

    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }
}

impl fmt::Debug for FormulaMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaMeasure")
            .field("kind", &self.kind)
            .field("family", &self.scoring.family())
            .field("options", &self.options)
            .finish()
    }
}

impl VectorMeasure for FormulaMeasure {
    fn canonical_name(&self) -> &str {
        self.kind.canonical_name()
    }

    fn kind(&self) -> Option<MeasureKind> {
        Some(self.kind)
    }

    fn options(&self) -> &MeasureOptions {
        &self.options
    }

    fn similarity(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        match &self.scoring {
            Scoring::Direct { similarity, .. } => similarity(v1, v2, &self.options),
            Scoring::FromSimilarity(score, _) => score.eval(v1, v2, &self.options),
            Scoring::FromDistance(score, derive) => {
                derive.apply(score.eval(v1, v2, &self.options))
            }
        }
    }

    fn distance(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        match &self.scoring {
            Scoring::Direct { distance, .. } => distance(v1, v2, &self.options),
            Scoring::FromDistance(score, _) => score.eval(v1, v2, &self.options),
            Scoring::FromSimilarity(score, derive) => {
                derive.apply(score.eval(v1, v2, &self.options))
            }
        }
    }
}

/// Identity comparison: a vector is maximally similar to itself and to
/// nothing else. Used as the base of wrapped measures that supply all of
/// their scoring through auxiliary data.
#[derive(Debug, Default)]
pub struct IdentityMeasure {
    options: MeasureOptions,
}

impl IdentityMeasure {
    pub fn new(options: MeasureOptions) -> Self {
        Self { options }
    }
}

impl VectorMeasure for IdentityMeasure {
    fn canonical_name(&self) -> &str {
        "Identity"
    }

    fn options(&self) -> &MeasureOptions {
        &self.options
    }

    fn similarity(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        if v1.same_as(v2) { 1.0 } else { 0.0 }
    }

    fn distance(&self, v1: &TermVector, v2: &TermVector) -> f64 {
        if v1.same_as(v2) { 0.0 } else { 1.0 }
    }
}
