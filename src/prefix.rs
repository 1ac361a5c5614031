//! Case-insensitive unique-prefix name tables.
//!
//! Every user-facing registry (algorithms, representatives, measures and the
//! option keywords) resolves names the same way:
//!
//! 1. An exact case-insensitive match anywhere in the table wins.
//! 2. Otherwise every entry that starts with the key is a candidate. If all
//!    candidates map to the same value the match is unique, even when the
//!    key prefixes several aliases of it.
//! 3. Candidates with differing values make the key ambiguous.

use crate::error::NameError;

/// A static `(name, value)` table searched by prefix.
#[derive(Debug, Clone, Copy)]
pub struct PrefixTable<T: 'static> {
    what: &'static str,
    entries: &'static [(&'static str, T)],
}

impl<T: Copy + PartialEq + 'static> PrefixTable<T> {
    /// Create a table. `what` names the registry in diagnostics.
    pub const fn new(what: &'static str, entries: &'static [(&'static str, T)]) -> Self {
        Self { what, entries }
    }

    /// Registry description used in error messages ("algorithm", "measure", ...).
    pub fn what(&self) -> &'static str {
        self.what
    }

    /// Resolve `key` to its value.
    pub fn resolve(&self, key: &str) -> Result<T, NameError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(NameError::Empty { what: self.what });
        }

        if let Some((_, value)) = self
            .entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
        {
            return Ok(*value);
        }

        let mut found: Option<T> = None;
        let mut candidates = Vec::new();
        for (name, value) in self.entries {
            if !starts_with_ignore_case(name, key) {
                continue;
            }
            candidates.push(*name);
            match found {
                None => found = Some(*value),
                Some(prev) if prev == *value => {}
                Some(_) => {
                    let candidates = self
                        .entries
                        .iter()
                        .filter(|(name, _)| starts_with_ignore_case(name, key))
                        .map(|(name, _)| (*name).to_string())
                        .collect();
                    return Err(NameError::Ambiguous {
                        what: self.what,
                        key: key.to_string(),
                        candidates,
                    });
                }
            }
        }

        found.ok_or_else(|| NameError::NoMatch {
            what: self.what,
            key: key.to_string(),
        })
    }

    /// All names in registration order, or only those starting with `prefix`.
    pub fn enumerate(&self, prefix: Option<&str>) -> Vec<&'static str> {
        match prefix.map(str::trim).filter(|p| !p.is_empty()) {
            Some(prefix) => self
                .entries
                .iter()
                .filter(|(name, _)| starts_with_ignore_case(name, prefix))
                .map(|(name, _)| *name)
                .collect(),
            None => {
                let mut names: Vec<&'static str> = Vec::with_capacity(self.entries.len());
                for (name, _) in self.entries {
                    if !names.contains(name) {
                        names.push(name);
                    }
                }
                names
            }
        }
    }

    /// First registered name for `value`, used as its display name.
    pub fn name_of(&self, value: T) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }

    /// Iterate over the raw table.
    pub fn entries(&self) -> &'static [(&'static str, T)] {
        self.entries
    }
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name.is_char_boundary(prefix.len())
        && name[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fruit {
        Apple,
        Apricot,
        Banana,
    }

    const FRUITS: PrefixTable<Fruit> = PrefixTable::new(
        "fruit",
        &[
            ("Apple", Fruit::Apple),
            ("Apricot", Fruit::Apricot),
            ("Ap", Fruit::Apricot),
            ("Banana", Fruit::Banana),
            ("Bananas", Fruit::Banana),
        ],
    );

    #[test]
    fn test_exact_match_beats_ambiguity() {
        assert_eq!(FRUITS.resolve("ap").unwrap(), Fruit::Apricot);
        assert_eq!(FRUITS.resolve("APPLE").unwrap(), Fruit::Apple);
    }

    #[test]
    fn test_unique_prefix() {
        assert_eq!(FRUITS.resolve("app").unwrap(), Fruit::Apple);
        assert_eq!(FRUITS.resolve("apr").unwrap(), Fruit::Apricot);
    }

    #[test]
    fn test_aliases_of_same_value_are_not_ambiguous() {
        assert_eq!(FRUITS.resolve("ban").unwrap(), Fruit::Banana);
    }

    #[test]
    fn test_ambiguous_and_no_match() {
        match FRUITS.resolve("a") {
            Err(NameError::Ambiguous { candidates, .. }) => {
                assert_eq!(candidates, vec!["Apple", "Apricot", "Ap"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
        assert!(matches!(
            FRUITS.resolve("cherry"),
            Err(NameError::NoMatch { .. })
        ));
        assert!(matches!(FRUITS.resolve("  "), Err(NameError::Empty { .. })));
    }

    #[test]
    fn test_enumerate() {
        assert_eq!(FRUITS.enumerate(None).len(), 5);
        assert_eq!(FRUITS.enumerate(Some("ba")), vec!["Banana", "Bananas"]);
        assert!(FRUITS.enumerate(Some("z")).is_empty());
        assert_eq!(FRUITS.name_of(Fruit::Banana), Some("Banana"));
    }
}
