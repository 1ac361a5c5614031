//! Clustering option strings.
//!
//! Grammar: `token (':' token)*` with
//! `token = ['+' | '-' | '!' | '^'] name ['=' value]`. The modifiers set,
//! clear or toggle a boolean option. Names resolve by unique prefix.

use super::names::{ClusterRep, parse_cluster_representative_name};
use crate::error::{ClusterError, ClusterResult};
use crate::measure::{MeasureKind, parse_vector_measure_name, scoring_for};
use crate::prefix::PrefixTable;

/// Tunables shared by every algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    pub desired_clusters: usize,
    pub max_iterations: usize,
    pub threshold: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub min_points: usize,
    pub verbosity: u8,
    pub fast_init: bool,
    pub hard_limit: bool,
    pub ignore_extra: bool,
    pub allow_singletons: bool,
    pub representative: ClusterRep,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            desired_clusters: 2,
            max_iterations: 10,
            threshold: 0.5,
            alpha: 1.0,
            beta: 1.0,
            gamma: 1.0,
            min_points: 2,
            verbosity: 0,
            fast_init: false,
            hard_limit: false,
            ignore_extra: false,
            allow_singletons: true,
            representative: ClusterRep::Centroid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    Alpha,
    Beta,
    Gamma,
    FastInit,
    HardLimit,
    IgnoreExtra,
    Iterations,
    Clusters,
    Measure,
    MinPoints,
    Representative,
    Singletons,
    Threshold,
    Verbosity,
}

impl OptionKey {
    fn is_flag(self) -> bool {
        matches!(
            self,
            OptionKey::FastInit | OptionKey::HardLimit | OptionKey::IgnoreExtra | OptionKey::Singletons
        )
    }

    fn name(self) -> &'static str {
        OPTION_NAMES.name_of(self).unwrap_or("option")
    }
}

pub static OPTION_NAMES: PrefixTable<OptionKey> = PrefixTable::new(
    "clustering option",
    &[
        ("alpha", OptionKey::Alpha),
        ("a", OptionKey::Alpha),
        ("beta", OptionKey::Beta),
        ("b", OptionKey::Beta),
        ("gamma", OptionKey::Gamma),
        ("fastinit", OptionKey::FastInit),
        ("hardlimit", OptionKey::HardLimit),
        ("ignoreextra", OptionKey::IgnoreExtra),
        ("iterations", OptionKey::Iterations),
        ("it", OptionKey::Iterations),
        ("numclusters", OptionKey::Clusters),
        ("k", OptionKey::Clusters),
        ("measure", OptionKey::Measure),
        ("minpoints", OptionKey::MinPoints),
        ("minpts", OptionKey::MinPoints),
        ("representative", OptionKey::Representative),
        ("singletons", OptionKey::Singletons),
        ("threshold", OptionKey::Threshold),
        ("thr", OptionKey::Threshold),
        ("verbosity", OptionKey::Verbosity),
        ("v", OptionKey::Verbosity),
    ],
);

/// Boolean modifier in front of an option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Set,
    Clear,
    Toggle,
}

/// One fully interpreted option assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Alpha(f64),
    Beta(f64),
    Gamma(f64),
    FastInit(bool),
    HardLimit(bool),
    IgnoreExtra(bool),
    Iterations(usize),
    Clusters(usize),
    Measure(MeasureKind),
    MinPoints(usize),
    Representative(ClusterRep),
    Singletons(bool),
    Threshold(f64),
    Verbosity(u8),
}

/// Interpret one token against the current options (needed for toggles).
///
/// Pure: nothing is modified. `measure=` must name a measure that has an
/// implementation.
pub fn interpret(token: &str, current: &ClusterOptions) -> ClusterResult<Setting> {
    let token = token.trim();
    let (modifier, rest) = match token.chars().next() {
        Some('+') => (Some(Modifier::Set), &token[1..]),
        Some('-') => (Some(Modifier::Clear), &token[1..]),
        Some('!') | Some('^') => (Some(Modifier::Toggle), &token[1..]),
        _ => (None, token),
    };
    let (name, value) = match rest.split_once('=') {
        Some((n, v)) => (n.trim(), Some(v.trim())),
        None => (rest.trim(), None),
    };
    let key = OPTION_NAMES.resolve(name).map_err(|e| ClusterError::InvalidOptions {
        errors: vec![e.to_string()],
    })?;

    if key.is_flag() {
        let old = flag_value(key, current);
        let new = match (modifier, value) {
            (Some(_), Some(v)) => {
                return Err(invalid(key, v, "a modifier and a value cannot be combined"));
            }
            (Some(Modifier::Set), None) | (None, None) => true,
            (Some(Modifier::Clear), None) => false,
            (Some(Modifier::Toggle), None) => !old,
            (None, Some(v)) => parse_bool(v).ok_or_else(|| invalid(key, v, "expected a boolean"))?,
        };
        return Ok(match key {
            OptionKey::FastInit => Setting::FastInit(new),
            OptionKey::HardLimit => Setting::HardLimit(new),
            OptionKey::IgnoreExtra => Setting::IgnoreExtra(new),
            _ => Setting::Singletons(new),
        });
    }

    if modifier.is_some() {
        return Err(invalid(key, token, "only boolean options accept '+', '-', '!' or '^'"));
    }
    let value = value.ok_or_else(|| invalid(key, "", "a value is required"))?;

    Ok(match key {
        OptionKey::Alpha => Setting::Alpha(number(key, value)?),
        OptionKey::Beta => Setting::Beta(number(key, value)?),
        OptionKey::Gamma => Setting::Gamma(number(key, value)?),
        OptionKey::Threshold => Setting::Threshold(number(key, value)?),
        OptionKey::Iterations => {
            let n = count(key, value)?;
            if n == 0 {
                return Err(invalid(key, value, "must be at least 1"));
            }
            Setting::Iterations(n)
        }
        OptionKey::Clusters => Setting::Clusters(count(key, value)?),
        OptionKey::MinPoints => Setting::MinPoints(count(key, value)?),
        OptionKey::Verbosity => Setting::Verbosity(
            value
                .parse::<u8>()
                .map_err(|_| invalid(key, value, "expected a small non-negative integer"))?,
        ),
        OptionKey::Measure => {
            let kind = parse_vector_measure_name(value).map_err(|e| invalid(key, value, &e.to_string()))?;
            if scoring_for(kind).is_none() {
                return Err(ClusterError::MeasureUnavailable {
                    name: kind.canonical_name().to_string(),
                });
            }
            Setting::Measure(kind)
        }
        OptionKey::Representative => Setting::Representative(
            parse_cluster_representative_name(value).map_err(|e| invalid(key, value, &e.to_string()))?,
        ),
        OptionKey::FastInit | OptionKey::HardLimit | OptionKey::IgnoreExtra | OptionKey::Singletons => {
            unreachable!("flags handled above")
        }
    })
}

impl ClusterOptions {
    /// Apply a setting. `Setting::Measure` is handled by the caller, which
    /// owns the measure object.
    pub fn apply(&mut self, setting: &Setting) {
        match *setting {
            Setting::Alpha(v) => self.alpha = v,
            Setting::Beta(v) => self.beta = v,
            Setting::Gamma(v) => self.gamma = v,
            Setting::FastInit(v) => self.fast_init = v,
            Setting::HardLimit(v) => self.hard_limit = v,
            Setting::IgnoreExtra(v) => self.ignore_extra = v,
            Setting::Iterations(v) => self.max_iterations = v,
            Setting::Clusters(v) => self.desired_clusters = v,
            Setting::MinPoints(v) => self.min_points = v,
            Setting::Representative(v) => self.representative = v,
            Setting::Singletons(v) => self.allow_singletons = v,
            Setting::Threshold(v) => self.threshold = v,
            Setting::Verbosity(v) => self.verbosity = v,
            Setting::Measure(_) => {}
        }
    }
}

/// Split an option string into its non-empty tokens.
pub fn tokens(spec: &str) -> impl Iterator<Item = &str> {
    spec.split(':').map(str::trim).filter(|t| !t.is_empty())
}

fn flag_value(key: OptionKey, current: &ClusterOptions) -> bool {
    match key {
        OptionKey::FastInit => current.fast_init,
        OptionKey::HardLimit => current.hard_limit,
        OptionKey::IgnoreExtra => current.ignore_extra,
        _ => current.allow_singletons,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "y" | "t" => Some(true),
        "0" | "false" | "no" | "off" | "n" | "f" => Some(false),
        _ => None,
    }
}

fn number(key: OptionKey, value: &str) -> ClusterResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(key, value, "expected a number"))
}

fn count(key: OptionKey, value: &str) -> ClusterResult<usize> {
    value
        .parse::<usize>()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}

fn invalid(key: OptionKey, value: &str, reason: &str) -> ClusterError {
    ClusterError::InvalidOptionValue {
        option: key.name(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
