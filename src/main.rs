//! CLI entry point for the clustering engine.
//!
//! Lists the algorithm, representative and measure registries, clusters a
//! vector file, and manages the settings file.

use clap::{
    Parser, Subcommand, ValueEnum,
    builder::styling::{AnsiColor, Effects, Styles},
};
use clusterkit::cluster::{
    ALGORITHM_NAMES, CancellationToken, ClusteringSession, REPRESENTATIVE_NAMES,
    enumerate_cluster_algorithm_names, enumerate_cluster_representative_names,
    parse_cluster_algorithm_name, parse_cluster_representative_name,
};
use clusterkit::display::{BarReporter, THEME, names_table};
use clusterkit::io::{
    ClusterReport, ExitCode, OutputFormat, OutputManager, ResponseMeta, load_vectors,
};
use clusterkit::measure::{
    MEASURE_NAMES, enumerate_vector_measure_names, parse_vector_measure_name, scoring_for,
};
use clusterkit::pipeline::{RunOverrides, build_algorithm};
use clusterkit::{ClusterError, Settings, logging};
use anyhow::anyhow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Vector clustering engine
#[derive(Parser)]
#[command(
    name = "clusterkit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Cluster dense or sparse vectors with pluggable algorithms and measures",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .clusterkit directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// List registered names
    #[command(
        after_help = "Examples:\n  clusterkit list algorithms\n  clusterkit list measures bin\n  clusterkit list representatives --json"
    )]
    List {
        registry: Registry,

        /// Only names starting with this prefix
        prefix: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Cluster the vectors in a JSON file
    #[command(
        after_help = "Examples:\n  clusterkit run vectors.json\n  clusterkit run vectors.json -a brown -o thr=0.3\n  clusterkit run vectors.json -a kmeans -o k=4:+hardlimit -m euclid --json"
    )]
    Run {
        /// JSON array of {name, label, dense | sparse} records
        input: PathBuf,

        /// Algorithm name or unique prefix (overrides config)
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Colon-separated options, applied after the configured ones
        #[arg(short, long)]
        options: Option<String>,

        /// Similarity measure name or unique prefix (overrides config)
        #[arg(short, long)]
        measure: Option<String>,

        /// Number of worker threads (overrides config)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Hide progress bars
        #[arg(long)]
        no_progress: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Registry {
    Algorithms,
    Representatives,
    Measures,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", THEME.error_with_icon(&format!("{e:#}")));
            std::process::exit(ExitCode::ConfigError.into());
        }
    };

    let base_level = if settings.debug {
        tracing::Level::DEBUG
    } else {
        logging::parse_level(&settings.logging.level).unwrap_or(tracing::Level::WARN)
    };
    logging::init(logging::level_for_verbosity(base_level, cli.verbose));

    let code = match cli.command {
        Commands::Init { force } => init(force),
        Commands::Config => show_config(&settings),
        Commands::List {
            registry,
            prefix,
            json,
        } => list(registry, prefix.as_deref(), OutputFormat::from_json_flag(json)),
        Commands::Run {
            input,
            algorithm,
            options,
            measure,
            threads,
            no_progress,
            json,
        } => {
            let overrides = RunOverrides {
                algorithm,
                options,
                measure,
                threads,
                verbose: cli.verbose,
            };
            let progress = settings.clustering.progress && !no_progress && !json;
            run(
                &settings,
                input,
                overrides,
                progress,
                OutputFormat::from_json_flag(json),
            )
            .await
        }
    };

    std::process::exit(code.into());
}

/// Settings from `--config`, or the workspace file with defaults as fallback.
fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(config_path) => Settings::load_from(config_path).map_err(|e| {
            anyhow!(
                "Configuration error loading from {}: {e}",
                config_path.display()
            )
        }),
        None => Ok(Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            Settings::default()
        })),
    }
}

fn init(force: bool) -> ExitCode {
    match Settings::init_config_file(force) {
        Ok(path) => {
            println!(
                "{}",
                THEME.success_with_icon(&format!(
                    "Created configuration file at: {}",
                    THEME.apply(&THEME.path, path.display())
                ))
            );
            println!("Edit this file to customize your settings.");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("{}", THEME.error_with_icon(&e.to_string()));
            ExitCode::ConfigError
        }
    }
}

fn show_config(settings: &Settings) -> ExitCode {
    println!("{}", THEME.apply(&THEME.header, "Current Configuration:"));
    println!("{}", "=".repeat(50));
    match toml::to_string_pretty(settings) {
        Ok(toml_str) => {
            println!("{toml_str}");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error displaying config: {e}");
            ExitCode::GeneralError
        }
    }
}

/// `(name, note)` rows for one registry.
fn registry_rows(registry: Registry, prefix: Option<&str>) -> Vec<(&'static str, String)> {
    match registry {
        Registry::Algorithms => enumerate_cluster_algorithm_names(prefix)
            .into_iter()
            .filter_map(|name| {
                let algo = parse_cluster_algorithm_name(name).ok()?;
                let note = if name != algo.name() {
                    format!("alias of {}", algo.name())
                } else if algo.is_implemented() {
                    String::new()
                } else {
                    "not implemented".to_string()
                };
                Some((name, note))
            })
            .collect(),
        Registry::Representatives => enumerate_cluster_representative_names(prefix)
            .into_iter()
            .filter_map(|name| {
                let rep = parse_cluster_representative_name(name).ok()?;
                let note = if name != rep.name() {
                    format!("alias of {}", rep.name())
                } else if rep.is_linkage() {
                    "linkage".to_string()
                } else {
                    String::new()
                };
                Some((name, note))
            })
            .collect(),
        Registry::Measures => enumerate_vector_measure_names(prefix)
            .into_iter()
            .filter_map(|name| {
                let kind = parse_vector_measure_name(name).ok()?;
                let note = if name != kind.canonical_name() {
                    format!("alias of {}", kind.canonical_name())
                } else if scoring_for(kind).is_some() {
                    String::new()
                } else {
                    "not implemented".to_string()
                };
                Some((name, note))
            })
            .collect(),
    }
}

fn list(registry: Registry, prefix: Option<&str>, format: OutputFormat) -> ExitCode {
    let (title, what) = match registry {
        Registry::Algorithms => ("Algorithm", ALGORITHM_NAMES.what()),
        Registry::Representatives => ("Representative", REPRESENTATIVE_NAMES.what()),
        Registry::Measures => ("Measure", MEASURE_NAMES.what()),
    };
    let rows = registry_rows(registry, prefix);
    if rows.is_empty() {
        eprintln!(
            "{}",
            THEME.warning_with_icon(&format!(
                "No {what} names start with '{}'",
                prefix.unwrap_or_default()
            ))
        );
        return ExitCode::NotFound;
    }

    if format.is_json() {
        let names: Vec<serde_json::Value> = rows
            .iter()
            .map(|(name, note)| serde_json::json!({ "name": name, "note": note }))
            .collect();
        let response = clusterkit::io::JsonResponse::success(names);
        match serde_json::to_string_pretty(&response) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::GeneralError;
            }
        }
    } else {
        println!("{}", names_table(title, &rows));
    }
    ExitCode::Success
}

async fn run(
    settings: &Settings,
    input: PathBuf,
    overrides: RunOverrides,
    progress: bool,
    format: OutputFormat,
) -> ExitCode {
    let started = Instant::now();
    let mut out = OutputManager::new(format);

    let vectors = match load_vectors(&input) {
        Ok(vectors) => vectors,
        Err(e) => return out.input_error(&e).unwrap_or(ExitCode::IoError),
    };
    let algo = match build_algorithm(&settings.clustering, &overrides) {
        Ok(algo) => algo,
        Err(e) => return report_error(&mut out, &e),
    };
    let _ = out.progress(&format!(
        "Clustering {} vectors from {} with {}",
        vectors.len(),
        THEME.apply(&THEME.path, input.display()),
        algo.name()
    ));

    let token = CancellationToken::new();
    let mut session = ClusteringSession::new().with_cancellation(token.clone());
    if progress {
        session = session.with_progress(Arc::new(BarReporter::new()));
    }

    let refs = vectors.vectors.clone();
    let mut handle = tokio::task::spawn_blocking(move || {
        let result = algo.cluster_with(&refs, &session);
        (algo, result)
    });

    let joined = tokio::select! {
        joined = &mut handle => joined,
        _ = tokio::signal::ctrl_c() => {
            token.cancel();
            tracing::warn!("interrupt received, stopping after the current pass");
            handle.await
        }
    };

    let (algo, result) = match joined {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: clustering worker failed: {e}");
            return ExitCode::GeneralError;
        }
    };
    match result {
        Ok(root) => {
            let report = ClusterReport::new(
                algo.name(),
                algo.base().measure().canonical_name(),
                &root,
                &vectors,
            );
            if !format.is_json() {
                let summary = THEME.run_summary(report.clusters.len(), report.unassigned.len());
                let _ = out.progress(&summary);
            }
            let meta = Some(ResponseMeta::timed(started.elapsed()));
            if token.is_cancelled() {
                out.interrupted(&report, meta)
                    .unwrap_or(ExitCode::BlockingError)
            } else {
                out.success(&report, meta).unwrap_or(ExitCode::GeneralError)
            }
        }
        Err(e) => report_error(&mut out, &e),
    }
}

fn report_error(out: &mut OutputManager, error: &ClusterError) -> ExitCode {
    tracing::debug!(code = %error.status_code(), "clustering failed");
    out.error(error).unwrap_or(ExitCode::from_error(error))
}
