//! Reading vector files and writing cluster reports.

pub mod exit_code;
pub mod format;
pub mod input;
pub mod output;

pub use exit_code::ExitCode;
pub use format::{ErrorDetails, JsonResponse, OutputFormat, ResponseMeta};
pub use input::{VectorSet, load_vectors, parse_vectors};
pub use output::{ClusterNode, ClusterReport, OutputManager};
