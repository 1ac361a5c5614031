//! Cluster reports and the writer that prints them.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::io::{self, Write};

use crate::cluster::{ClusterInfo, VectorRef};
use crate::error::{ClusterError, InputError};
use crate::io::exit_code::ExitCode;
use crate::io::format::{JsonResponse, OutputFormat, ResponseMeta};
use crate::io::input::VectorSet;

/// One cluster with its member names and nested subclusters.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClusterNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Vectors in this cluster and all of its subclusters
    pub size: usize,
    /// Direct members only
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subclusters: Vec<ClusterNode>,
}

/// Result of one `clusterkit run`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClusterReport {
    pub algorithm: String,
    pub measure: String,
    pub vectors: usize,
    pub clusters: Vec<ClusterNode>,
    pub unassigned: Vec<String>,
}

impl ClusterReport {
    /// Describe `root` using the names from the vector file it was built from.
    pub fn new(algorithm: &str, measure: &str, root: &ClusterInfo, input: &VectorSet) -> Self {
        let names: HashMap<*const crate::vector::TermVector, &str> = input
            .vectors
            .iter()
            .zip(&input.names)
            .map(|(v, n)| (std::sync::Arc::as_ptr(v), n.as_str()))
            .collect();
        let name_of = |v: &VectorRef| {
            names
                .get(&std::sync::Arc::as_ptr(v))
                .map_or_else(|| "?".to_string(), |n| n.to_string())
        };
        Self {
            algorithm: algorithm.to_string(),
            measure: measure.to_string(),
            vectors: root.size(),
            clusters: root
                .subclusters()
                .iter()
                .map(|c| node(c, &name_of))
                .collect(),
            unassigned: root.members().iter().map(&name_of).collect(),
        }
    }
}

fn node<F: Fn(&VectorRef) -> String>(cluster: &ClusterInfo, name_of: &F) -> ClusterNode {
    ClusterNode {
        label: cluster.label().map(|l| l.as_str().to_string()),
        size: cluster.size(),
        members: cluster.members().iter().map(name_of).collect(),
        subclusters: cluster
            .subclusters()
            .iter()
            .map(|c| node(c, name_of))
            .collect(),
    }
}

impl ClusterNode {
    /// Member names of this cluster and all of its subclusters.
    pub fn all_members(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.members.iter().map(String::as_str).collect();
        for sub in &self.subclusters {
            out.extend(sub.all_members());
        }
        out
    }
}

impl Display for ClusterReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} with {} on {} vectors",
            self.algorithm, self.measure, self.vectors
        )?;
        write!(f, "{}", crate::display::cluster_summary_table(self, 8))
    }
}

/// Writes results and errors as text or JSON.
pub struct OutputManager {
    format: OutputFormat,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl OutputManager {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    #[cfg(test)]
    pub fn new_with_writers(
        format: OutputFormat,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            stdout,
            stderr,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn success<T>(&mut self, data: T, meta: Option<ResponseMeta>) -> io::Result<ExitCode>
    where
        T: Serialize + Display,
    {
        match self.format {
            OutputFormat::Json => {
                let mut response = JsonResponse::success(&data);
                if let Some(meta) = meta {
                    response = response.with_meta(meta);
                }
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stdout, "{data}")?;
            }
        }
        Ok(ExitCode::Success)
    }

    pub fn error(&mut self, error: &ClusterError) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::from_error(error);
                writeln!(self.stderr, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "Error: {error}")?;
                for suggestion in error.recovery_suggestions() {
                    writeln!(self.stderr, "  Suggestion: {suggestion}")?;
                }
            }
        }
        Ok(ExitCode::from_error(error))
    }

    pub fn input_error(&mut self, error: &InputError) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::from_input_error(error);
                writeln!(self.stderr, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "Error: {error}")?;
            }
        }
        Ok(ExitCode::from_input_error(error))
    }

    /// Print the partial result of an interrupted run.
    pub fn interrupted<T>(&mut self, data: T, meta: Option<ResponseMeta>) -> io::Result<ExitCode>
    where
        T: Serialize + Display,
    {
        match self.format {
            OutputFormat::Json => {
                let mut response = JsonResponse::interrupted(&data);
                if let Some(meta) = meta {
                    response = response.with_meta(meta);
                }
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "Warning: clustering interrupted, result is partial")?;
                writeln!(self.stdout, "{data}")?;
            }
        }
        Ok(ExitCode::BlockingError)
    }

    /// Status line on stderr (text mode only).
    pub fn progress(&mut self, message: &str) -> io::Result<()> {
        if matches!(self.format, OutputFormat::Text) {
            writeln!(self.stderr, "{message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::input::parse_vectors;
    use crate::vector::Label;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn sample() -> (VectorSet, ClusterInfo) {
        let set = parse_vectors(
            r#"[{"name": "a", "dense": [1, 0]},
                {"name": "b", "dense": [1, 0.1]},
                {"name": "c", "dense": [0, 1]}]"#,
            Path::new("t.json"),
        )
        .unwrap();
        let mut cluster = ClusterInfo::from_members(set.vectors[..2].to_vec());
        cluster.set_label(Some(Label::new("<CL_0001>")));
        let mut root = ClusterInfo::from_subclusters(vec![cluster]);
        root.add_vector(set.vectors[2].clone());
        (set, root)
    }

    #[test]
    fn test_report_uses_input_names() {
        let (set, root) = sample();
        let report = ClusterReport::new("K-Means", "Cosine", &root, &set);
        assert_eq!(report.vectors, 3);
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(report.clusters[0].label.as_deref(), Some("<CL_0001>"));
        assert_eq!(report.clusters[0].all_members(), vec!["a", "b"]);
        assert_eq!(report.unassigned, vec!["c"]);
    }

    #[test]
    fn test_json_success_output() {
        let (set, root) = sample();
        let report = ClusterReport::new("K-Means", "Cosine", &root, &set);
        let stdout = Shared::default();
        let mut manager = OutputManager::new_with_writers(
            OutputFormat::Json,
            Box::new(stdout.clone()),
            Box::new(io::sink()),
        );
        assert_eq!(manager.success(&report, None).unwrap(), ExitCode::Success);

        let json: serde_json::Value = serde_json::from_str(&stdout.text()).unwrap();
        assert_eq!(json["data"]["clusters"][0]["members"], serde_json::json!(["a", "b"]));
        assert_eq!(json["data"]["unassigned"], serde_json::json!(["c"]));
    }

    #[test]
    fn test_interrupted_run_still_prints_report() {
        let (set, root) = sample();
        let report = ClusterReport::new("Brown", "Cosine", &root, &set);
        let stdout = Shared::default();
        let mut manager = OutputManager::new_with_writers(
            OutputFormat::Json,
            Box::new(stdout.clone()),
            Box::new(io::sink()),
        );
        let code = manager.interrupted(&report, None).unwrap();
        assert_eq!(code, ExitCode::BlockingError);

        let json: serde_json::Value = serde_json::from_str(&stdout.text()).unwrap();
        assert_eq!(json["status"], "interrupted");
        assert_eq!(json["data"]["clusters"][0]["members"], serde_json::json!(["a", "b"]));

        let stdout = Shared::default();
        let stderr = Shared::default();
        let mut manager = OutputManager::new_with_writers(
            OutputFormat::Text,
            Box::new(stdout.clone()),
            Box::new(stderr.clone()),
        );
        manager.interrupted(&report, None).unwrap();
        assert!(stderr.text().contains("interrupted"));
        assert!(stdout.text().starts_with("Brown with Cosine on 3 vectors"));
    }

    #[test]
    fn test_text_error_output() {
        let stderr = Shared::default();
        let mut manager = OutputManager::new_with_writers(
            OutputFormat::Text,
            Box::new(io::sink()),
            Box::new(stderr.clone()),
        );
        let code = manager.error(&ClusterError::EmptyInput).unwrap();
        assert_eq!(code, ExitCode::InvalidInput);
        assert!(stderr.text().starts_with("Error: Empty vector set"));
        assert!(stderr.text().contains("Suggestion:"));
    }
}
