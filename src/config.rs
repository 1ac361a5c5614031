//! Configuration module for the clustering engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CK_` and use double underscores
//! to separate nested levels:
//! - `CK_CLUSTERING__THREADS=8` sets `clustering.threads`
//! - `CK_CLUSTERING__ALGORITHM=brown` sets `clustering.algorithm`
//! - `CK_LOGGING__LEVEL=debug` sets `logging.level`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cluster::ClusterRep;

/// Directory holding the settings file.
pub const CONFIG_DIR: &str = ".clusterkit";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Clustering defaults used by `clusterkit run`
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClusteringConfig {
    /// Algorithm name or unique prefix
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Colon-separated option string, e.g. "k=3:it=20"
    #[serde(default)]
    pub options: String,

    /// Similarity measure name or unique prefix
    #[serde(default = "default_measure")]
    pub measure: String,

    /// Colon-separated measure options, e.g. "power=3:normalize=l2"
    #[serde(default)]
    pub measure_options: String,

    /// Cluster representative policy
    #[serde(default)]
    pub representative: ClusterRep,

    /// Worker threads, 0 for one per CPU
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Show progress bars on stderr
    #[serde(default = "default_true")]
    pub progress: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// One of "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_algorithm() -> String {
    "KMeans".to_string()
}
fn default_measure() -> String {
    "Cosine".to_string()
}
fn default_threads() -> usize {
    0
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            clustering: ClusteringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            options: String::new(),
            measure: default_measure(),
            measure_options: String::new(),
            representative: ClusterRep::default(),
            threads: default_threads(),
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ClusteringConfig {
    /// Number of worker threads to start.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels, single underscores
            // stay inside field names
            .merge(Env::prefixed("CK_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find the settings file by looking for a .clusterkit directory from the
    /// current directory upwards
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Self::init_config_file_in(Path::new("."), force)
    }

    /// Like [`init_config_file`](Self::init_config_file) under `root`.
    pub fn init_config_file_in(
        root: &Path,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.join(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# clusterkit configuration file

# Version of the configuration schema
version = 1

# Global debug mode
debug = false

[clustering]
# Algorithm: KMeans, KMedoids, Brown, Agglomerative, SingleLink,
# MultiSingleLink, GrowSeeds (run 'clusterkit list algorithms')
algorithm = "KMeans"

# Colon-separated options, e.g. "k=3:it=20:thr=0.4:+hardlimit"
options = ""

# Similarity measure (run 'clusterkit list measures')
measure = "Cosine"

# Measure options, e.g. "power=3" or "normalize=l2"
measure_options = ""

# How clusters are compared: centroid, medoid, prototype, newest,
# average, furthest, nearest, rms
representative = "centroid"

# Worker threads (0 = one per CPU, {} on this machine)
threads = 0

# Show progress bars while clustering
progress = true

[logging]
# error, warn, info, debug or trace
level = "warn"
"#,
            num_cpus::get()
        );

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
