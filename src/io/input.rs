//! Vector files.
//!
//! A vector file is a JSON array of records:
//!
//! ```json
//! [
//!   {"name": "doc-1", "dense": [0.5, 1.0, 0.0]},
//!   {"name": "doc-2", "label": "sports", "sparse": [[0, 0.5], [17, 2.0]]}
//! ]
//! ```
//!
//! `name` identifies the vector in the output. `label` is the cluster label
//! the vector starts with; labelled vectors act as seeds.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::cluster::VectorRef;
use crate::error::{InputError, InputResult};
use crate::vector::{ElementIndex, ElementValue, TermVector};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VectorRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    dense: Option<Vec<f64>>,
    #[serde(default)]
    sparse: Option<Vec<(ElementIndex, f64)>>,
}

/// Vectors in file order with their display names.
#[derive(Debug, Default)]
pub struct VectorSet {
    pub vectors: Vec<VectorRef>,
    pub names: Vec<String>,
}

impl VectorSet {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Read and validate a vector file.
pub fn load_vectors(path: &Path) -> InputResult<VectorSet> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_vectors(&text, path)
}

/// Parse vector file contents; `path` is only used in error messages.
pub fn parse_vectors(text: &str, path: &Path) -> InputResult<VectorSet> {
    let records: Vec<VectorRecord> =
        serde_json::from_str(text).map_err(|source| InputError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let mut set = VectorSet::default();
    for (position, record) in records.into_iter().enumerate() {
        let vector = match (record.dense, record.sparse) {
            (Some(values), None) => TermVector::dense(
                values
                    .into_iter()
                    .map(|v| finite(v, path, position))
                    .collect::<InputResult<Vec<_>>>()?,
            ),
            (None, Some(entries)) => TermVector::sparse(
                entries
                    .into_iter()
                    .map(|(idx, v)| Ok((idx, finite(v, path, position)?)))
                    .collect::<InputResult<Vec<_>>>()?,
            ),
            (None, None) => {
                return Err(InputError::MissingValues {
                    path: path.to_path_buf(),
                    position,
                });
            }
            (Some(_), Some(_)) => {
                return Err(InputError::ConflictingValues {
                    path: path.to_path_buf(),
                    position,
                });
            }
        };
        let vector = match record.label {
            Some(label) => vector.with_label(label),
            None => vector,
        };
        set.names
            .push(record.name.unwrap_or_else(|| format!("#{position}")));
        set.vectors.push(Arc::new(vector));
    }

    tracing::debug!(path = %path.display(), vectors = set.len(), "loaded vectors");
    Ok(set)
}

fn finite(value: f64, path: &Path, position: usize) -> InputResult<ElementValue> {
    let narrowed = value as ElementValue;
    if narrowed.is_finite() {
        Ok(narrowed)
    } else {
        Err(InputError::NonFinite {
            path: path.to_path_buf(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> InputResult<VectorSet> {
        parse_vectors(text, Path::new("test.json"))
    }

    #[test]
    fn test_dense_and_sparse_records() {
        let set = parse(
            r#"[{"name": "a", "dense": [1, 0]},
                {"label": "seed", "sparse": [[3, 2.0], [1, 0.5]]}]"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names, vec!["a", "#1"]);
        assert!(!set.vectors[0].is_sparse());
        assert!(set.vectors[0].label().is_none());
        assert!(set.vectors[1].is_sparse());
        assert_eq!(set.vectors[1].get(3), 2.0);
        assert_eq!(set.vectors[1].label().unwrap().as_str(), "seed");
    }

    #[test]
    fn test_record_errors() {
        assert!(matches!(
            parse(r#"[{"name": "a"}]"#),
            Err(InputError::MissingValues { position: 0, .. })
        ));
        assert!(matches!(
            parse(r#"[{"dense": [1]}, {"dense": [1], "sparse": [[0, 1]]}]"#),
            Err(InputError::ConflictingValues { position: 1, .. })
        ));
        assert!(matches!(
            parse(r#"[{"dense": [1e300]}]"#),
            Err(InputError::NonFinite { position: 0, .. })
        ));
        assert!(matches!(parse("{"), Err(InputError::Json { .. })));
        assert!(matches!(
            parse(r#"[{"dense": [1], "weight": 2}]"#),
            Err(InputError::Json { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"dense": [0.5, 0.5]}}]"#).unwrap();
        let set = load_vectors(file.path()).unwrap();
        assert_eq!(set.len(), 1);

        let missing = load_vectors(Path::new("/nonexistent/vectors.json"));
        assert!(matches!(missing, Err(InputError::FileRead { .. })));
    }
}
