//! Output format and the JSON envelope used by `--json`.

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, InputError};
use crate::io::exit_code::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Text,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Envelope for every `--json` response, success or failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResponse<T = serde_json::Value>
where
    T: Serialize,
{
    /// "success", "interrupted" or "error"
    pub status: String,

    /// Stable result code, e.g. "OK" or "MIXED_VECTOR_TYPES"
    pub code: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,

    pub exit_code: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ResponseMeta {
    pub fn timed(elapsed: std::time::Duration) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            execution_time_ms: Some(elapsed.as_millis() as u64),
        }
    }
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            code: "OK".to_string(),
            message: "Operation completed successfully".to_string(),
            data: Some(data),
            error: None,
            exit_code: ExitCode::Success as u8,
            meta: None,
        }
    }

    /// The run stopped on Ctrl-C; `data` is the partial result.
    pub fn interrupted(data: T) -> Self {
        Self {
            status: "interrupted".to_string(),
            code: "CANCELLED".to_string(),
            message: "Clustering was interrupted, result is partial".to_string(),
            data: Some(data),
            error: None,
            exit_code: ExitCode::BlockingError as u8,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl JsonResponse<serde_json::Value> {
    pub fn error(code: ExitCode, status_code: String, message: String, suggestions: &[&str]) -> Self {
        Self {
            status: "error".to_string(),
            code: status_code,
            message,
            data: None,
            error: Some(ErrorDetails {
                suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            }),
            exit_code: code as u8,
            meta: None,
        }
    }

    pub fn from_error(error: &ClusterError) -> Self {
        Self::error(
            ExitCode::from_error(error),
            error.status_code(),
            error.to_string(),
            &error.recovery_suggestions(),
        )
    }

    pub fn from_input_error(error: &InputError) -> Self {
        Self::error(
            ExitCode::from_input_error(error),
            error.status_code(),
            error.to_string(),
            &["Vectors are a JSON array of {\"label\", \"dense\"} or {\"label\", \"sparse\"} objects"],
        )
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialization() {
        let json = serde_json::to_value(JsonResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["code"], "OK");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_interrupted_keeps_data() {
        let json = serde_json::to_value(JsonResponse::interrupted(vec![1])).unwrap();
        assert_eq!(json["status"], "interrupted");
        assert_eq!(json["code"], "CANCELLED");
        assert_eq!(json["exit_code"], 2);
        assert_eq!(json["data"], serde_json::json!([1]));
    }

    #[test]
    fn test_error_from_cluster_error() {
        let err = ClusterError::MixedVectorTypes { dense: 2, sparse: 1 };
        let json = serde_json::to_value(JsonResponse::from_error(&err)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "MIXED_VECTOR_TYPES");
        assert_eq!(json["exit_code"], 4);
        assert!(!json["error"]["suggestions"].as_array().unwrap().is_empty());
    }
}
