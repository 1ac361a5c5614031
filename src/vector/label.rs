//! Cluster labels and the per-session label generator.

use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static GENERATED_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<CL_[0-9]{4,}>$").expect("Invalid regex"));

/// Symbolic cluster tag. Cheap to clone; equal when the names are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(Arc<str>);

impl Label {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for labels produced by a [`LabelGenerator`], i.e. `<CL_nnnn>`.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        GENERATED_LABEL.is_match(&self.0)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

/// Monotonic source of `<CL_%04u>` labels.
///
/// One generator lives in each clustering session so label numbering is
/// deterministic per run and independent across runs.
#[derive(Debug)]
pub struct LabelGenerator {
    next: AtomicU64,
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Produce the next label.
    pub fn generate(&self) -> Label {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        Label::from(format!("<CL_{id:04}>"))
    }

    /// Number the next call to [`generate`](Self::generate) will use.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_labels_are_recognized() {
        let labels = LabelGenerator::new();
        let first = labels.generate();
        let second = labels.generate();
        assert_eq!(first.as_str(), "<CL_0001>");
        assert_eq!(second.as_str(), "<CL_0002>");
        assert!(first.is_generated());
        assert_eq!(labels.peek(), 3);
    }

    #[test]
    fn test_user_labels_are_not_generated() {
        assert!(!Label::new("sports").is_generated());
        assert!(!Label::new("<CL_12>").is_generated());
        assert!(!Label::new("<CL_0001>x").is_generated());
        assert!(Label::new("<CL_123456>").is_generated());
    }

    #[test]
    fn test_label_equality_by_name() {
        assert_eq!(Label::new("a"), Label::from("a".to_string()));
        assert_ne!(Label::new("a"), Label::new("b"));
    }
}
