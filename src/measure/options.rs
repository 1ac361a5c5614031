//! Tunables carried by every measure.

use crate::error::{MeasureError, MeasureResult};
use crate::prefix::PrefixTable;
use crate::vector::Normalization;

/// Options shared by all measures. Most measures ignore most of them.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureOptions {
    /// Exponent of the Minkowski L-norm.
    pub power: f64,
    /// Weight of the first vector's unshared mass (Tversky).
    pub alpha: f64,
    /// Weight of the second vector's unshared mass (Tversky).
    pub beta: f64,
    /// Additive smoothing for the divergence measures.
    pub smoothing: f64,
    pub normalize: Normalization,
    /// Prefer similarity over distance when a caller asks for a "score".
    pub use_similarity: bool,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            power: 1.0,
            alpha: 1.0,
            beta: 1.0,
            smoothing: 0.0,
            normalize: Normalization::None,
            use_similarity: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Power,
    Alpha,
    Beta,
    Smoothing,
    Normalize,
    Similarity,
    Distance,
}

static KEYS: PrefixTable<Key> = PrefixTable::new(
    "measure option",
    &[
        ("power", Key::Power),
        ("p", Key::Power),
        ("alpha", Key::Alpha),
        ("beta", Key::Beta),
        ("smoothing", Key::Smoothing),
        ("normalize", Key::Normalize),
        ("norm", Key::Normalize),
        ("similarity", Key::Similarity),
        ("sim", Key::Similarity),
        ("distance", Key::Distance),
        ("dist", Key::Distance),
    ],
);

static NORMALIZATIONS: PrefixTable<Normalization> = PrefixTable::new(
    "normalization",
    &[
        ("none", Normalization::None),
        ("0", Normalization::None),
        ("l1", Normalization::L1),
        ("1", Normalization::L1),
        ("l2", Normalization::L2),
        ("2", Normalization::L2),
        ("linf", Normalization::LInf),
        ("max", Normalization::LInf),
        ("3", Normalization::LInf),
    ],
);

impl MeasureOptions {
    /// Parse `key=value` tokens separated by `:` or `,`, e.g.
    /// `"power=3:normalize=l1:distance"`. An empty string yields the defaults.
    pub fn parse(spec: &str) -> MeasureResult<Self> {
        let mut opts = Self::default();
        for token in spec.split([':', ',']).map(str::trim).filter(|t| !t.is_empty()) {
            let (name, value) = match token.split_once('=') {
                Some((n, v)) => (n.trim(), Some(v.trim())),
                None => (token, None),
            };
            let key = KEYS.resolve(name).map_err(MeasureError::UnknownOption)?;
            match key {
                Key::Power => opts.power = number("power", value)?,
                Key::Alpha => opts.alpha = number("alpha", value)?,
                Key::Beta => opts.beta = number("beta", value)?,
                Key::Smoothing => opts.smoothing = number("smoothing", value)?,
                Key::Normalize => {
                    let value = value.unwrap_or("l1");
                    opts.normalize =
                        NORMALIZATIONS
                            .resolve(value)
                            .map_err(|_| MeasureError::InvalidValue {
                                option: "normalize",
                                value: value.to_string(),
                            })?;
                }
                Key::Similarity => opts.use_similarity = true,
                Key::Distance => opts.use_similarity = false,
            }
        }
        Ok(opts)
    }
}

fn number(option: &'static str, value: Option<&str>) -> MeasureResult<f64> {
    let raw = value.unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MeasureError::InvalidValue {
            option,
            value: raw.to_string(),
        })
}
