//! Turn settings and command-line overrides into a ready-to-run algorithm.
//!
//! Option strings are layered: the configured representative and measure
//! come first, then `clustering.options`, then `--options`, so later layers
//! override earlier ones key by key.

use crate::cluster::{ClusteringAlgo, WorkerPool, instantiate};
use crate::config::ClusteringConfig;
use crate::error::ClusterResult;
use crate::measure::{MeasureOptions, VectorMeasure, create_measure_named};

/// Values given on the command line for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub algorithm: Option<String>,
    pub options: Option<String>,
    pub measure: Option<String>,
    pub threads: Option<usize>,
    /// Number of `-v` flags; raises the algorithm's own verbosity
    pub verbose: u8,
}

/// Join the option layers for `config` and `overrides`.
pub fn option_string(config: &ClusteringConfig, overrides: &RunOverrides) -> String {
    let mut parts = vec![format!("representative={}", config.representative.name())];
    if explicit_measure_name(config, overrides).is_none() {
        parts.push(format!("measure={}", config.measure));
    }
    if overrides.verbose > 0 {
        parts.push(format!("verbosity={}", overrides.verbose));
    }
    parts.extend(
        [Some(config.options.as_str()), overrides.options.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
    );
    parts.join(":")
}

/// The measure to build outside the option string, if any.
///
/// `--measure` and non-empty `clustering.measure_options` need a measure
/// built with options, which an option string cannot express.
fn explicit_measure_name<'a>(
    config: &'a ClusteringConfig,
    overrides: &'a RunOverrides,
) -> Option<&'a str> {
    match overrides.measure.as_deref() {
        Some(name) => Some(name),
        None if !config.measure_options.trim().is_empty() => Some(config.measure.as_str()),
        None => None,
    }
}

/// Build the algorithm for one run.
pub fn build_algorithm(
    config: &ClusteringConfig,
    overrides: &RunOverrides,
) -> ClusterResult<Box<dyn ClusteringAlgo>> {
    let name = overrides.algorithm.as_deref().unwrap_or(&config.algorithm);
    let measure: Option<Box<dyn VectorMeasure>> = match explicit_measure_name(config, overrides) {
        Some(measure_name) => {
            let opts = MeasureOptions::parse(&config.measure_options)?;
            Some(create_measure_named(measure_name, opts)?)
        }
        None => None,
    };

    let mut algo = instantiate(name, &option_string(config, overrides), measure)?;

    let threads = overrides.threads.unwrap_or(config.threads);
    if threads != 0 {
        algo.base_mut().set_pool(WorkerPool::with_threads(threads)?);
    }
    tracing::info!(
        algorithm = algo.name(),
        measure = algo.base().measure().canonical_name(),
        threads = algo.base().pool().threads(),
        "configured clustering run"
    );
    Ok(algo)
}
