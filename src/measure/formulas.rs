//! Scoring formulas over co-occurrence counts.
//!
//! Naming follows the ecology literature (see the R `simba` package):
//! `a` is the shared mass, `b` and `c` the mass found only in the first and
//! second vector, `d` the count of positions absent from both. The weighted
//! tables have `d == 0`; agreement tables fold `b + c` into `b`.
//!
//! Similarity formulas score two all-zero vectors as identical (`1.0`);
//! distance formulas give them `0.0`.

use super::options::MeasureOptions;
use super::table::{BinaryAgreement, BinaryContingencyTable, ContingencyTable};
use crate::vector::p_log_p;

/// Table entries widened to floats.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Counts {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Counts {
    fn total1(&self) -> f64 {
        self.a + self.b
    }

    fn total2(&self) -> f64 {
        self.a + self.c
    }

    fn sum(&self) -> f64 {
        self.a + self.b + self.c
    }

    /// Proportions over all cells, used by the correlation-style formulas.
    fn proportions(&self) -> Option<Counts> {
        let n = self.a + self.b + self.c + self.d;
        (n > 0.0).then(|| Counts {
            a: self.a / n,
            b: self.b / n,
            c: self.c / n,
            d: self.d / n,
        })
    }
}

impl From<ContingencyTable> for Counts {
    fn from(t: ContingencyTable) -> Self {
        Self {
            a: t.both,
            b: t.v1_only,
            c: t.v2_only,
            d: 0.0,
        }
    }
}

impl From<BinaryContingencyTable> for Counts {
    fn from(t: BinaryContingencyTable) -> Self {
        let (a, b, c, d) = t.as_f64();
        Self { a, b, c, d }
    }
}

impl From<BinaryAgreement> for Counts {
    fn from(t: BinaryAgreement) -> Self {
        Self {
            a: t.both as f64,
            b: t.disagree as f64,
            c: 0.0,
            d: t.neither as f64,
        }
    }
}

/// A scoring callback.
pub type Formula = fn(&Counts, &MeasureOptions) -> f64;

#[inline]
fn ratio_or(num: f64, denom: f64, fallback: f64) -> f64 {
    if denom != 0.0 { num / denom } else { fallback }
}

// ---- similarities ---------------------------------------------------------

pub fn anti_dice(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.a, t.a + 2.0 * (t.b + t.c), 1.0)
}

pub fn benini(t: &Counts, _: &MeasureOptions) -> f64 {
    let Some(p) = t.proportions() else { return 1.0 };
    let prod = p.total1() * p.total2();
    ratio_or(p.a - prod, p.a + p.b.min(p.c) - prod, 1.0)
}

pub fn braun_blanquet(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.a, t.total1().max(t.total2()), 1.0)
}

pub fn cody(t: &Counts, _: &MeasureOptions) -> f64 {
    let (t1, t2) = (t.total1(), t.total2());
    match (t1 > 0.0, t2 > 0.0) {
        (false, false) => 1.0,
        (true, true) => t.a * (t1 + t2) / (2.0 * t1 * t2),
        _ => 0.0,
    }
}

pub fn dice(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(2.0 * t.a, 2.0 * t.a + t.b + t.c, 1.0)
}

pub fn fager_mcgowan(t: &Counts, _: &MeasureOptions) -> f64 {
    let denom = (t.total1() * t.total2()).sqrt() - t.b.max(t.c) / 2.0;
    ratio_or(t.a, denom, 1.0)
}

/// Goodman-Kruskal gamma over presence/absence; needs the `d` cell.
pub fn gamma(t: &Counts, _: &MeasureOptions) -> f64 {
    match (t.total1() > 0.0, t.total2() > 0.0) {
        (false, false) => return 1.0,
        (true, true) => {}
        _ => return -1.0,
    }
    let Some(p) = t.proportions() else { return 1.0 };
    let concordance = p.a * p.d;
    let discordance = p.b * p.c;
    ratio_or(
        concordance - discordance,
        concordance + discordance,
        1.0,
    )
}

pub fn gilbert(t: &Counts, _: &MeasureOptions) -> f64 {
    let Some(p) = t.proportions() else { return 1.0 };
    let prod = p.total1() * p.total2();
    ratio_or(p.a - prod, p.a + p.b + p.c - prod, 1.0)
}

pub fn gini(t: &Counts, _: &MeasureOptions) -> f64 {
    let Some(p) = t.proportions() else { return 1.0 };
    let (t1, t2) = (p.total1(), p.total2());
    ratio_or(
        p.a - t1 * t2,
        ((1.0 - t1 * t1) * (1.0 - t2 * t2)).sqrt(),
        1.0,
    )
}

pub fn jaccard(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.a, t.sum(), 1.0)
}

/// Unbounded above: no disagreement at all scores `+inf`.
pub fn kulczynski1(t: &Counts, _: &MeasureOptions) -> f64 {
    let only = t.b + t.c;
    if only > 0.0 {
        t.a / only
    } else if t.a > 0.0 {
        f64::INFINITY
    } else {
        1.0
    }
}

pub fn kulczynski2(t: &Counts, _: &MeasureOptions) -> f64 {
    if t.sum() == 0.0 {
        return 1.0;
    }
    let (t1, t2) = (t.total1(), t.total2());
    if t1 == 0.0 || t2 == 0.0 {
        return 0.0;
    }
    (t.a / t1 + t.a / t2) / 2.0
}

pub fn legendre(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(3.0 * t.a, 3.0 * t.a + t.b + t.c, 1.0)
}

pub fn lennon2(t: &Counts, _: &MeasureOptions) -> f64 {
    let sum = t.sum();
    if sum == 0.0 {
        1.0
    } else {
        ((t.a + sum) / sum).log2()
    }
}

pub fn maarel(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(2.0 * t.a - t.b - t.c, 2.0 * t.a + t.b + t.c, 1.0)
}

pub fn mcconnagh(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.a * t.a - t.b * t.c, t.total1() * t.total2(), 1.0)
}

pub fn modified_gini(t: &Counts, _: &MeasureOptions) -> f64 {
    let Some(p) = t.proportions() else { return 1.0 };
    let prod = p.total1() * p.total2();
    ratio_or(p.a - prod, 1.0 - (p.b - p.c).abs() / 2.0 - prod, 1.0)
}

pub fn mountford(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(2.0 * t.a, t.a * (t.b + t.c) + 2.0 * t.b * t.c, 1.0)
}

pub fn ochiai(t: &Counts, _: &MeasureOptions) -> f64 {
    if t.sum() == 0.0 {
        return 1.0;
    }
    let (t1, t2) = (t.total1(), t.total2());
    if t1 == 0.0 || t2 == 0.0 {
        return 0.0;
    }
    t.a / (t1 * t2).sqrt()
}

pub fn simpson(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.a, t.a + t.b.min(t.c), 1.0)
}

pub fn sokal_sneath(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(2.0 * t.a, 2.0 * t.a + t.b + t.c, 1.0)
}

/// Agreement variant: joint absences count as matches.
pub fn sokal_sneath_agreement(t: &Counts, _: &MeasureOptions) -> f64 {
    let matches = 2.0 * (t.a + t.d);
    ratio_or(matches, matches + t.b + t.c, 1.0)
}

pub fn sorgenfrei(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.a * t.a, t.total1() * t.total2(), 1.0)
}

pub fn tripartite(t: &Counts, _: &MeasureOptions) -> f64 {
    let (a, min, max) = (t.a, t.b.min(t.c), t.b.max(t.c));
    let u = if a + max != 0.0 {
        (1.0 + (a + min) / (a + max)).log2()
    } else {
        1.0
    };
    let s = 1.0 / (2.0 + min / (a + 1.0)).log2().sqrt();
    let r1 = if t.total1() != 0.0 {
        (1.0 + a / t.total1()).log2()
    } else {
        1.0
    };
    let r2 = if t.total2() != 0.0 {
        (1.0 + a / t.total2()).log2()
    } else {
        1.0
    };
    (u * s * r1 * r2).sqrt()
}

/// Asymmetric: `alpha` weighs the first vector's unshared mass, `beta` the
/// second's. `alpha = beta = 1` is Jaccard, `0.5` is Dice.
pub fn tversky(t: &Counts, opts: &MeasureOptions) -> f64 {
    ratio_or(t.a, t.a + opts.alpha * t.b + opts.beta * t.c, 1.0)
}

// ---- distances ------------------------------------------------------------

pub fn bray_curtis(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.b + t.c, 2.0 * t.a + t.b + t.c, 0.0)
}

pub fn cocogaston(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.b + t.c, 2.0 * t.a + t.b + t.c, 0.0)
}

pub fn harrison(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.b.min(t.c), t.a + t.b.max(t.c), 0.0)
}

pub fn lance_williams(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.b + t.c, 2.0 * t.a + t.b + t.c, 0.0)
}

pub fn lande(t: &Counts, _: &MeasureOptions) -> f64 {
    (t.b + t.c) / 2.0
}

pub fn lennon(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(2.0 * (t.b - t.c).abs(), t.total1() + t.total2(), 0.0)
}

pub fn magurran(t: &Counts, _: &MeasureOptions) -> f64 {
    let sum = t.sum();
    if sum == 0.0 {
        0.0
    } else {
        (t.a + sum) * (1.0 - t.a / sum)
    }
}

pub fn routledge1(t: &Counts, _: &MeasureOptions) -> f64 {
    let sum = t.sum() * t.sum();
    let denom = sum - 2.0 * t.b * t.c;
    if denom != 0.0 { sum / denom - 1.0 } else { 0.0 }
}

pub fn routledge2(t: &Counts, _: &MeasureOptions) -> f64 {
    let denom = 2.0 * t.a + t.b + t.c;
    if denom == 0.0 {
        return 0.0;
    }
    let num1 = 2.0 * t.a * std::f64::consts::LN_2;
    let num2 = p_log_p(t.total1()) + p_log_p(t.total2());
    denom.ln() - (num1 + num2) / denom
}

pub fn whittaker(t: &Counts, _: &MeasureOptions) -> f64 {
    let sum = t.sum();
    if sum == 0.0 {
        0.0
    } else {
        2.0 * sum / (t.a + sum) - 1.0
    }
}

pub fn williams(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.b.min(t.c), t.sum(), 0.0)
}

pub fn williams2(t: &Counts, _: &MeasureOptions) -> f64 {
    let sum = t.sum();
    ratio_or(2.0 * t.b * t.c + 1.0, sum * sum - sum, 0.0)
}

pub fn wilson_shmida(t: &Counts, _: &MeasureOptions) -> f64 {
    ratio_or(t.b + t.c, 2.0 * t.a + t.b + t.c, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(a: f64, b: f64, c: f64) -> Counts {
        Counts { a, b, c, d: 0.0 }
    }

    fn close(x: f64, y: f64) -> bool {
        (x - y).abs() < 1e-9
    }

    #[test]
    fn test_set_overlap_similarities() {
        let o = MeasureOptions::default();
        let t = counts(2.0, 1.0, 1.0);
        assert!(close(jaccard(&t, &o), 0.5));
        assert!(close(dice(&t, &o), 4.0 / 6.0));
        assert!(close(anti_dice(&t, &o), 2.0 / 6.0));
        assert!(close(braun_blanquet(&t, &o), 2.0 / 3.0));
        assert!(close(simpson(&t, &o), 2.0 / 3.0));
        assert!(close(ochiai(&t, &o), 2.0 / 3.0));
        assert!(close(sorgenfrei(&t, &o), 4.0 / 9.0));
        assert!(close(legendre(&t, &o), 6.0 / 8.0));
        assert!(close(kulczynski1(&t, &o), 1.0));
    }

    #[test]
    fn test_empty_vectors_are_identical() {
        let o = MeasureOptions::default();
        let t = Counts::default();
        for f in [jaccard, dice, anti_dice, ochiai, cody, kulczynski2, maarel, tversky] {
            assert_eq!(f(&t, &o), 1.0);
        }
        for f in [bray_curtis, cocogaston, harrison, lennon, wilson_shmida, routledge2] {
            assert_eq!(f(&t, &o), 0.0);
        }
    }

    #[test]
    fn test_one_sided_empty_is_maximally_dissimilar() {
        let o = MeasureOptions::default();
        let t = counts(0.0, 3.0, 0.0);
        assert_eq!(ochiai(&t, &o), 0.0);
        assert_eq!(kulczynski2(&t, &o), 0.0);
        assert_eq!(bray_curtis(&t, &o), 1.0);
    }

    #[test]
    fn test_tversky_generalizes_jaccard_and_dice() {
        let t = counts(3.0, 2.0, 1.0);
        let jac = MeasureOptions::default();
        assert!(close(tversky(&t, &jac), jaccard(&t, &jac)));
        let half = MeasureOptions {
            alpha: 0.5,
            beta: 0.5,
            ..MeasureOptions::default()
        };
        assert!(close(tversky(&t, &half), dice(&t, &half)));
    }

    #[test]
    fn test_gamma_uses_joint_absence() {
        let o = MeasureOptions::default();
        let t = Counts {
            a: 2.0,
            b: 0.0,
            c: 0.0,
            d: 2.0,
        };
        assert_eq!(gamma(&t, &o), 1.0);
        let only_one = Counts {
            a: 0.0,
            b: 2.0,
            c: 0.0,
            d: 1.0,
        };
        assert_eq!(gamma(&only_one, &o), -1.0);
    }

    #[test]
    fn test_agreement_counts_feed_the_same_formulas() {
        let agreement = BinaryAgreement {
            both: 2,
            disagree: 2,
            neither: 1,
        };
        let t = Counts::from(agreement);
        let o = MeasureOptions::default();
        assert!(close(jaccard(&t, &o), 0.5));
        assert!(close(sokal_sneath_agreement(&t, &o), 6.0 / 8.0));
    }
}
