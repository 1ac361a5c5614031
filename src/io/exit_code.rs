//! Exit codes for the `clusterkit` binary.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success
//! - `1`: General error
//! - `2`: Blocking error, the run was interrupted
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::{ClusterError, InputError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Run cancelled before it finished (code 2)
    BlockingError = 2,

    /// Unknown or ambiguous name (code 3)
    NotFound = 3,

    /// Malformed vector file or vector set (code 4)
    InvalidInput = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Bad option string or settings file (code 6)
    ConfigError = 6,

    /// Algorithm or measure without an implementation (code 8)
    UnsupportedOperation = 8,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Map a clustering failure to the code scripts can branch on.
    pub fn from_error(error: &ClusterError) -> Self {
        match error {
            ClusterError::UnknownAlgorithm(_) => ExitCode::NotFound,
            ClusterError::InvalidOptions { .. } | ClusterError::InvalidOptionValue { .. } => {
                ExitCode::ConfigError
            }
            ClusterError::EmptyInput | ClusterError::MixedVectorTypes { .. } => {
                ExitCode::InvalidInput
            }
            ClusterError::Unimplemented { .. } | ClusterError::MeasureUnavailable { .. } => {
                ExitCode::UnsupportedOperation
            }
            ClusterError::Measure(_) => ExitCode::ConfigError,
            ClusterError::ThreadPool { .. } => ExitCode::GeneralError,
        }
    }

    pub fn from_input_error(error: &InputError) -> Self {
        match error {
            InputError::FileRead { .. } => ExitCode::IoError,
            _ => ExitCode::InvalidInput,
        }
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, ExitCode::BlockingError)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::BlockingError => "Interrupted",
            ExitCode::NotFound => "Not found",
            ExitCode::InvalidInput => "Invalid input",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
            ExitCode::UnsupportedOperation => "Unsupported operation",
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), *self as u8)
    }
}
