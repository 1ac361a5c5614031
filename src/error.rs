//! Error types for the clustering engine
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to resolve a name against one of the prefix registries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Empty {what} name")]
    Empty { what: &'static str },

    #[error("Unknown {what} '{key}'")]
    NoMatch { what: &'static str, key: String },

    #[error("Ambiguous {what} '{key}', could be any of: {}", candidates.join(", "))]
    Ambiguous {
        what: &'static str,
        key: String,
        candidates: Vec<String>,
    },
}

impl NameError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::Empty { .. } => "EMPTY_NAME",
            Self::NoMatch { .. } => "NO_MATCH",
            Self::Ambiguous { .. } => "AMBIGUOUS_NAME",
        }
        .to_string()
    }

    /// True when the key matched more than one registered value.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}

/// Main error type for clustering operations
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Unknown clustering algorithm: {0}")]
    UnknownAlgorithm(NameError),

    #[error(
        "Invalid clustering options:\n  {}\nSuggestion: Run 'clusterkit list' to see valid names",
        errors.join("\n  ")
    )]
    InvalidOptions { errors: Vec<String> },

    #[error("Invalid value '{value}' for option '{option}': {reason}")]
    InvalidOptionValue {
        option: &'static str,
        value: String,
        reason: String,
    },

    #[error("Similarity measure '{name}' is recognized but has no implementation")]
    MeasureUnavailable { name: String },

    #[error(
        "Empty vector set provided for clustering\nSuggestion: Ensure vectors are loaded before clustering"
    )]
    EmptyInput,

    #[error(
        "Vectors must be all dense or all sparse ({dense} dense, {sparse} sparse)\nSuggestion: Convert the input to a single representation"
    )]
    MixedVectorTypes { dense: usize, sparse: usize },

    #[error("Clustering algorithm '{algorithm}' is not implemented yet")]
    Unimplemented { algorithm: &'static str },

    #[error("Failed to build worker pool: {reason}")]
    ThreadPool { reason: String },

    #[error("Measure error: {0}")]
    Measure(#[from] MeasureError),
}

impl ClusterError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::UnknownAlgorithm(_) => "UNKNOWN_ALGORITHM",
            Self::InvalidOptions { .. } => "INVALID_OPTIONS",
            Self::InvalidOptionValue { .. } => "INVALID_OPTION_VALUE",
            Self::MeasureUnavailable { .. } => "MEASURE_UNAVAILABLE",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::MixedVectorTypes { .. } => "MIXED_VECTOR_TYPES",
            Self::Unimplemented { .. } => "UNIMPLEMENTED",
            Self::ThreadPool { .. } => "THREAD_POOL_ERROR",
            Self::Measure(_) => "MEASURE_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::UnknownAlgorithm(_) => vec![
                "Run 'clusterkit list algorithms' to see the registered names",
                "Any unambiguous prefix of a name is accepted",
            ],
            Self::InvalidOptions { .. } | Self::InvalidOptionValue { .. } => vec![
                "Options are colon separated, e.g. 'k=3:measure=cosine:it=10'",
                "Prefix a flag with '+', '-' or '!' to set, clear or toggle it",
            ],
            Self::MeasureUnavailable { .. } => vec![
                "Pick another measure from 'clusterkit list measures'",
            ],
            Self::MixedVectorTypes { .. } => vec![
                "Every vector in one run must use either 'dense' or 'sparse'",
            ],
            Self::Unimplemented { .. } => vec![
                "Use kmeans, kmedoids, brown, agglomerative, singlelink or growseeds instead",
            ],
            Self::ThreadPool { .. } => vec!["Lower 'clustering.threads' in the settings file"],
            _ => vec![],
        }
    }

    /// True for input validation failures, as opposed to configuration or
    /// missing-implementation conditions.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::MixedVectorTypes { .. })
    }
}

/// Errors raised while building a similarity measure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Unknown similarity measure: {0}")]
    UnknownMeasure(NameError),

    #[error("Unknown measure option: {0}")]
    UnknownOption(NameError),

    #[error("Invalid value '{value}' for measure option '{option}'")]
    InvalidValue { option: &'static str, value: String },

    #[error("Similarity measure '{name}' is recognized but has no implementation")]
    Unavailable { name: String },
}

impl MeasureError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::UnknownMeasure(_) => "UNKNOWN_MEASURE",
            Self::UnknownOption(_) => "UNKNOWN_MEASURE_OPTION",
            Self::InvalidValue { .. } => "INVALID_MEASURE_VALUE",
            Self::Unavailable { .. } => "MEASURE_UNAVAILABLE",
        }
        .to_string()
    }
}

/// Errors raised while loading vectors from disk.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse vectors in '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Vector #{position} in '{path}' has neither 'dense' nor 'sparse' values")]
    MissingValues { path: PathBuf, position: usize },

    #[error("Vector #{position} in '{path}' has both 'dense' and 'sparse' values")]
    ConflictingValues { path: PathBuf, position: usize },

    #[error("Vector #{position} in '{path}' contains a non-finite value")]
    NonFinite { path: PathBuf, position: usize },
}

impl InputError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::Json { .. } => "JSON_ERROR",
            Self::MissingValues { .. } => "MISSING_VALUES",
            Self::ConflictingValues { .. } => "CONFLICTING_VALUES",
            Self::NonFinite { .. } => "NON_FINITE_VALUE",
        }
        .to_string()
    }
}

/// Result type alias for clustering operations
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Result type alias for measure construction
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Result type alias for input loading
pub type InputResult<T> = Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(ClusterError::EmptyInput.status_code(), "EMPTY_INPUT");
        assert_eq!(
            ClusterError::Unimplemented {
                algorithm: "DBSCAN"
            }
            .status_code(),
            "UNIMPLEMENTED"
        );
        let err = NameError::NoMatch {
            what: "measure",
            key: "zz".to_string(),
        };
        assert_eq!(MeasureError::UnknownMeasure(err).status_code(), "UNKNOWN_MEASURE");
    }

    #[test]
    fn test_input_errors_are_distinguishable() {
        assert!(ClusterError::MixedVectorTypes { dense: 1, sparse: 1 }.is_input_error());
        assert!(
            !ClusterError::Unimplemented {
                algorithm: "OPTICS"
            }
            .is_input_error()
        );
    }

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = NameError::Ambiguous {
            what: "option",
            key: "m".to_string(),
            candidates: vec!["measure".to_string(), "minpoints".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("measure, minpoints"));
        assert!(err.is_ambiguous());
    }
}
