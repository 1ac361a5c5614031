//! Numeric element contract shared by the measures.
//!
//! Vectors store `f32` values, but the normalisation and entropy helpers are
//! written against [`Scalar`] so integer count vectors (term frequencies) go
//! through exactly the same code path.

/// Index type of a vector element.
pub type ElementIndex = u32;

/// Value type stored by [`TermVector`](super::TermVector).
pub type ElementValue = f32;

/// Numeric element type accepted by the measure helpers.
pub trait Scalar: Copy + PartialOrd + Default + Send + Sync {
    /// Widen to `f64` for accumulation.
    fn to_f64(self) -> f64;

    /// Absolute value. Identity for unsigned types, which have no sign.
    #[must_use]
    fn abs_value(self) -> Self;
}

macro_rules! signed_scalar {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn abs_value(self) -> Self {
                self.abs()
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn abs_value(self) -> Self {
                self
            }
        }
    )*};
}

signed_scalar!(f32, f64, i8, i16, i32, i64);
unsigned_scalar!(u8, u16, u32, u64, usize);

/// `p * ln(p)` with the limit value `0` at `p == 0`.
#[inline]
pub fn p_log_p(p: f64) -> f64 {
    if p <= 0.0 { 0.0 } else { p * p.ln() }
}

/// Vector normalisation applied before comparing term weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    #[default]
    None,
    L1,
    L2,
    #[serde(rename = "linf")]
    LInf,
}

/// Divisor that normalises `values` under `norm`.
///
/// Always strictly positive: a zero weight (all-zero vector) yields `1.0`.
pub fn normalization_weight<T, I>(values: I, norm: Normalization) -> f64
where
    T: Scalar,
    I: IntoIterator<Item = T>,
{
    let weight = match norm {
        Normalization::None => 1.0,
        Normalization::L1 => values.into_iter().map(|v| v.abs_value().to_f64()).sum(),
        Normalization::L2 => values
            .into_iter()
            .map(|v| {
                let v = v.to_f64();
                v * v
            })
            .sum::<f64>()
            .sqrt(),
        Normalization::LInf => values
            .into_iter()
            .map(|v| v.abs_value().to_f64())
            .fold(0.0, f64::max),
    };
    if weight > 0.0 { weight } else { 1.0 }
}
