//! Measures computed straight from the element pairs, without a table.

use super::options::MeasureOptions;
use crate::vector::{Normalization, TermVector, for_each_pair, normalization_weight, p_log_p};

/// A pairwise scoring callback.
pub type PairFn = fn(&TermVector, &TermVector, &MeasureOptions) -> f64;

/// Normalisation weights for both vectors, with `fallback` used when the
/// options leave normalisation off.
fn weights(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions, fallback: Normalization) -> (f64, f64) {
    let norm = match opts.normalize {
        Normalization::None => fallback,
        other => other,
    };
    (
        normalization_weight(v1.values(), norm),
        normalization_weight(v2.values(), norm),
    )
}

/// Fold the union of both vectors' elements after normalisation.
fn fold_pairs<F>(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions, fallback: Normalization, mut f: F)
where
    F: FnMut(f64, f64),
{
    let (wt1, wt2) = weights(v1, v2, opts, fallback);
    for_each_pair(v1, v2, |_, x, y| f(x / wt1, y / wt2));
}

#[inline]
fn inverse_distance(dist: f64) -> f64 {
    1.0 / (1.0 + dist)
}

// ---- cosine ---------------------------------------------------------------

pub fn cosine_similarity(v1: &TermVector, v2: &TermVector, _: &MeasureOptions) -> f64 {
    let denom = v1.length() * v2.length();
    if denom > 0.0 {
        v1.dot(v2) / denom
    } else if v1.is_empty() && v2.is_empty() {
        1.0
    } else {
        0.0
    }
}

pub fn cosine_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    1.0 - cosine_similarity(v1, v2, opts)
}

// ---- Minkowski family -----------------------------------------------------

pub fn manhattan_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| sum += (x - y).abs());
    sum
}

pub fn manhattan_similarity(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    inverse_distance(manhattan_distance(v1, v2, opts))
}

pub fn squared_euclidean_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| {
        let d = x - y;
        sum += d * d;
    });
    sum
}

pub fn squared_euclidean_similarity(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    inverse_distance(squared_euclidean_distance(v1, v2, opts))
}

pub fn euclidean_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    squared_euclidean_distance(v1, v2, opts).sqrt()
}

pub fn euclidean_similarity(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    inverse_distance(euclidean_distance(v1, v2, opts))
}

pub fn linf_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut max = 0.0f64;
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| max = max.max((x - y).abs()));
    max
}

pub fn linf_similarity(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    inverse_distance(linf_distance(v1, v2, opts))
}

/// Fraction of positions in the union of stored indices whose values differ.
pub fn l0_distance(v1: &TermVector, v2: &TermVector, _: &MeasureOptions) -> f64 {
    let mut total = 0usize;
    let mut differ = 0usize;
    for_each_pair(v1, v2, |_, x, y| {
        total += 1;
        if x != y {
            differ += 1;
        }
    });
    if total == 0 { 0.0 } else { differ as f64 / total as f64 }
}

/// Minkowski distance of order `opts.power`; non-positive powers fall back
/// to L0.
pub fn lnorm_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let p = opts.power;
    if p <= 0.0 {
        return l0_distance(v1, v2, opts);
    }
    if p == 1.0 {
        return manhattan_distance(v1, v2, opts);
    }
    if p == 2.0 {
        return euclidean_distance(v1, v2, opts);
    }
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| sum += (x - y).abs().powf(p));
    sum.powf(1.0 / p)
}

pub fn lnorm_similarity(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    inverse_distance(lnorm_distance(v1, v2, opts))
}

// ---- ratio measures -------------------------------------------------------

pub fn canberra_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let (mut diff, mut total) = (0.0, 0.0);
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| {
        diff += (x - y).abs();
        total += x.abs() + y.abs();
    });
    if total > 0.0 { diff / total } else { 0.0 }
}

/// Root mean of the squared per-element relative differences.
pub fn clark_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let (mut sum, mut count) = (0.0, 0usize);
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| {
        let denom = x.abs() + y.abs();
        if denom > 0.0 {
            let r = (x - y) / denom;
            sum += r * r;
            count += 1;
        }
    });
    if count == 0 { 0.0 } else { (sum / count as f64).sqrt() }
}

pub fn soergel_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let (mut diff, mut max) = (0.0, 0.0);
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| {
        diff += (x - y).abs();
        max += x.max(y);
    });
    if max != 0.0 { diff / max } else { 0.0 }
}

pub fn wave_hedges_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let (mut sum, mut count) = (0.0, 0usize);
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| {
        let larger = x.abs().max(y.abs());
        if larger > 0.0 {
            sum += (x - y).abs() / larger;
            count += 1;
        }
    });
    if count == 0 { 0.0 } else { sum / count as f64 }
}

pub fn lorentzian_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| sum += (1.0 + (x - y).abs()).ln());
    sum
}

/// Half the L1 difference of the L1-normalised vectors, in `[0, 1]`.
pub fn robinson_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::L1, |x, y| sum += (x - y).abs());
    sum / 2.0
}

pub fn circle_product_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let total = v1.num_elements() + v2.num_elements();
    if total == 0 {
        return 0.0;
    }
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::L1, |x, y| sum += x.min(y));
    sum / total as f64
}

pub fn similarity_ratio(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let (mut prod, mut sumsq) = (0.0, 0.0);
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| {
        prod += x * y;
        sumsq += x * x + y * y;
    });
    let denom = sumsq - prod;
    if denom != 0.0 { prod / denom } else { 1.0 }
}

pub fn squared_chord_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::None, |x, y| {
        let d = x.max(0.0).sqrt() - y.max(0.0).sqrt();
        sum += d * d;
    });
    sum
}

// ---- probability-distribution measures ------------------------------------

/// Bhattacharyya coefficient of the L1-normalised vectors.
pub fn fidelity(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    if v1.is_empty() && v2.is_empty() {
        return 1.0;
    }
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::L1, |x, y| {
        sum += (x.max(0.0) * y.max(0.0)).sqrt();
    });
    sum.min(1.0)
}

pub fn bhattacharyya_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let fid = fidelity(v1, v2, opts);
    if fid > 0.0 { -fid.ln() } else { f64::INFINITY }
}

pub fn hellinger_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    (1.0 - fidelity(v1, v2, opts)).max(0.0).sqrt()
}

pub fn matusita_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    (2.0 - 2.0 * fidelity(v1, v2, opts)).max(0.0).sqrt()
}

fn kl_term(p: f64, q: f64) -> f64 {
    if p > 0.0 && q > 0.0 { p * (p.log2() - q.log2()) } else { 0.0 }
}

pub fn jensen_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::L1, |x, y| {
        sum += (p_log_p(x) + p_log_p(y)) / 2.0 - p_log_p((x + y) / 2.0);
    });
    sum.max(0.0)
}

/// Jensen-Shannon divergence in bits, bounded by `[0, 1]`.
pub fn jensen_shannon_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::L1, |x, y| {
        let avg = (x + y) / 2.0;
        sum += kl_term(x, avg) + kl_term(y, avg);
    });
    (sum / 2.0).clamp(0.0, 1.0)
}

/// Kullback-Leibler divergence `D(v1 || v2)` with additive smoothing so
/// terms missing from `v2` do not blow up.
pub fn kullback_leibler_distance(v1: &TermVector, v2: &TermVector, opts: &MeasureOptions) -> f64 {
    let s = opts.smoothing.max(0.0);
    let mut sum = 0.0;
    fold_pairs(v1, v2, opts, Normalization::L1, |x, y| sum += kl_term(x + s, y + s));
    sum.max(0.0)
}
