//! The vector type consumed by the measures and the clustering algorithms.

use super::label::Label;
use super::types::{ElementIndex, ElementValue};
use parking_lot::RwLock;

/// Element storage. Resolved once when the vector is built, so nothing
/// downstream needs to re-check the representation per access.
#[derive(Debug, Clone, PartialEq)]
pub enum Elements {
    /// Contiguous values for indices `0..len`.
    Dense(Vec<ElementValue>),
    /// `(index, value)` pairs sorted by index, unique, no explicit zeros.
    Sparse(Vec<(ElementIndex, ElementValue)>),
}

/// A labelled dense or sparse vector.
///
/// The label sits behind a lock so the parallel assignment step can relabel
/// disjoint vectors while the collection itself is shared read-only.
#[derive(Debug)]
pub struct TermVector {
    elements: Elements,
    length: f64,
    label: RwLock<Option<Label>>,
}

impl Clone for TermVector {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            length: self.length,
            label: RwLock::new(self.label()),
        }
    }
}

impl TermVector {
    /// Build a dense vector.
    pub fn dense(values: Vec<ElementValue>) -> Self {
        Self::from_elements(Elements::Dense(values))
    }

    /// Build a sparse vector. Entries may come in any order; duplicate
    /// indices are summed and zero values dropped.
    pub fn sparse<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ElementIndex, ElementValue)>,
    {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|(idx, _)| *idx);

        let mut merged: Vec<(ElementIndex, ElementValue)> = Vec::with_capacity(entries.len());
        for (idx, val) in entries {
            match merged.last_mut() {
                Some((last, sum)) if *last == idx => *sum += val,
                _ => merged.push((idx, val)),
            }
        }
        merged.retain(|(_, v)| *v != 0.0);
        Self::from_elements(Elements::Sparse(merged))
    }

    pub fn from_elements(elements: Elements) -> Self {
        let length = match &elements {
            Elements::Dense(values) => sum_of_squares(values.iter().copied()),
            Elements::Sparse(entries) => sum_of_squares(entries.iter().map(|(_, v)| *v)),
        }
        .sqrt();
        Self {
            elements,
            length,
            label: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_label(self, label: impl Into<Label>) -> Self {
        *self.label.write() = Some(label.into());
        self
    }

    /// Copy of the values carrying a different label.
    #[must_use]
    pub fn relabeled(&self, label: Label) -> Self {
        Self {
            elements: self.elements.clone(),
            length: self.length,
            label: RwLock::new(Some(label)),
        }
    }

    #[must_use]
    pub fn is_sparse(&self) -> bool {
        matches!(self.elements, Elements::Sparse(_))
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    /// Stored element count (dense dimension or sparse entry count).
    pub fn num_elements(&self) -> usize {
        match &self.elements {
            Elements::Dense(values) => values.len(),
            Elements::Sparse(entries) => entries.len(),
        }
    }

    /// True when the vector has no nonzero value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.elements {
            Elements::Dense(values) => values.iter().all(|v| *v == 0.0),
            Elements::Sparse(entries) => entries.is_empty(),
        }
    }

    /// Euclidean length, computed at construction.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn label(&self) -> Option<Label> {
        self.label.read().clone()
    }

    pub fn set_label(&self, label: Option<Label>) {
        *self.label.write() = label;
    }

    #[must_use]
    pub fn has_label(&self) -> bool {
        self.label.read().is_some()
    }

    /// Value at `index`, zero when absent.
    pub fn get(&self, index: ElementIndex) -> ElementValue {
        match &self.elements {
            Elements::Dense(values) => values.get(index as usize).copied().unwrap_or(0.0),
            Elements::Sparse(entries) => entries
                .binary_search_by_key(&index, |(idx, _)| *idx)
                .map(|pos| entries[pos].1)
                .unwrap_or(0.0),
        }
    }

    /// `(index, value)` pairs in increasing index order.
    pub fn iter(&self) -> Entries<'_> {
        match &self.elements {
            Elements::Dense(values) => Entries::Dense(values.iter().enumerate()),
            Elements::Sparse(entries) => Entries::Sparse(entries.iter()),
        }
    }

    /// Stored values without their indices.
    pub fn values(&self) -> impl Iterator<Item = ElementValue> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Pointer identity.
    #[must_use]
    pub fn same_as(&self, other: &TermVector) -> bool {
        std::ptr::eq(self, other)
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let mut sum = 0.0;
        for_each_pair(self, other, |_, x, y| sum += x * y);
        sum
    }
}

fn sum_of_squares(values: impl Iterator<Item = ElementValue>) -> f64 {
    values
        .map(|v| {
            let v = f64::from(v);
            v * v
        })
        .sum()
}

/// Iterator over a vector's stored elements.
pub enum Entries<'a> {
    Dense(std::iter::Enumerate<std::slice::Iter<'a, ElementValue>>),
    Sparse(std::slice::Iter<'a, (ElementIndex, ElementValue)>),
}

impl Iterator for Entries<'_> {
    type Item = (ElementIndex, ElementValue);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Entries::Dense(it) => it.next().map(|(i, v)| (i as ElementIndex, *v)),
            Entries::Sparse(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Entries::Dense(it) => it.size_hint(),
            Entries::Sparse(it) => it.size_hint(),
        }
    }
}

/// Walk the union of both vectors' stored indices in order, calling
/// `f(index, x, y)` with `0.0` standing in for an absent side.
pub fn for_each_pair<F>(v1: &TermVector, v2: &TermVector, mut f: F)
where
    F: FnMut(ElementIndex, f64, f64),
{
    let mut a = v1.iter().peekable();
    let mut b = v2.iter().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (Some((i, x)), Some((j, y))) => {
                if i == j {
                    f(i, f64::from(x), f64::from(y));
                    a.next();
                    b.next();
                } else if i < j {
                    f(i, f64::from(x), 0.0);
                    a.next();
                } else {
                    f(j, 0.0, f64::from(y));
                    b.next();
                }
            }
            (Some((i, x)), None) => {
                f(i, f64::from(x), 0.0);
                a.next();
            }
            (None, Some((j, y))) => {
                f(j, 0.0, f64::from(y));
                b.next();
            }
            (None, None) => break,
        }
    }
}
