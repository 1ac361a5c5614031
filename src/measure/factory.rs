//! Maps a [`MeasureKind`] to its scoring strategy.

use super::VectorMeasure;
use super::direct as d;
use super::family::{Derivation, FormulaMeasure, Score, Scoring, TableKind};
use super::formulas as f;
use super::names::{MeasureKind, parse_vector_measure_name};
use super::options::MeasureOptions;
use crate::error::{MeasureError, MeasureResult};

use TableKind::{Agreement, Binary, Weighted};

/// The scoring strategy for `kind`, or `None` when the name is recognized
/// but has no implementation.
pub fn scoring_for(kind: MeasureKind) -> Option<Scoring> {
    use MeasureKind as K;

    let sim = Scoring::similarity_table;
    let dist = Scoring::distance_table;

    let scoring = match kind {
        K::Cosine => Scoring::Direct {
            similarity: d::cosine_similarity,
            distance: d::cosine_distance,
        },
        K::Euclidean => Scoring::Direct {
            similarity: d::euclidean_similarity,
            distance: d::euclidean_distance,
        },
        K::SquaredEuclidean => Scoring::Direct {
            similarity: d::squared_euclidean_similarity,
            distance: d::squared_euclidean_distance,
        },
        K::Manhattan => Scoring::Direct {
            similarity: d::manhattan_similarity,
            distance: d::manhattan_distance,
        },
        K::LInf => Scoring::Direct {
            similarity: d::linf_similarity,
            distance: d::linf_distance,
        },
        K::LNorm => Scoring::Direct {
            similarity: d::lnorm_similarity,
            distance: d::lnorm_distance,
        },
        K::Bhattacharyya => Scoring::Direct {
            similarity: d::fidelity,
            distance: d::bhattacharyya_distance,
        },
        K::L0 => Scoring::distance(d::l0_distance),

        K::Fidelity => Scoring::similarity(d::fidelity),
        K::SimilarityRatio => Scoring::similarity(d::similarity_ratio),

        K::Canberra => Scoring::distance(d::canberra_distance),
        K::CircleProduct => Scoring::distance(d::circle_product_distance),
        K::Clark => Scoring::distance(d::clark_distance),
        K::Hellinger => Scoring::distance(d::hellinger_distance),
        K::Jensen => Scoring::distance(d::jensen_distance),
        K::JensenShannon => Scoring::distance(d::jensen_shannon_distance),
        K::KullbackLeibler => Scoring::distance(d::kullback_leibler_distance),
        K::Matusita => Scoring::distance(d::matusita_distance),
        K::Robinson => Scoring::distance(d::robinson_distance),
        K::Soergel => Scoring::distance(d::soergel_distance),
        K::SquaredChord => Scoring::distance(d::squared_chord_distance),
        K::WaveHedges => Scoring::distance(d::wave_hedges_distance),
        K::Lorentzian => {
            Scoring::FromDistance(Score::Pair(d::lorentzian_distance), Derivation::Reciprocal)
        }

        // weighted contingency tables
        K::AntiDice => sim(Weighted, f::anti_dice),
        K::Benini => sim(Weighted, f::benini),
        K::BraunBlanquet => sim(Weighted, f::braun_blanquet),
        K::Cody => sim(Weighted, f::cody),
        K::Dice => sim(Weighted, f::dice),
        K::FagerMcGowan => sim(Weighted, f::fager_mcgowan),
        K::Gilbert => sim(Weighted, f::gilbert),
        K::Gini => sim(Weighted, f::gini),
        K::Jaccard => sim(Weighted, f::jaccard),
        K::Kulczynski1 => Scoring::FromSimilarity(
            Score::Table(Weighted, f::kulczynski1),
            Derivation::Reciprocal,
        ),
        K::Kulczynski2 => sim(Weighted, f::kulczynski2),
        K::Legendre => sim(Weighted, f::legendre),
        K::Lennon2 => sim(Weighted, f::lennon2),
        K::Maarel => sim(Weighted, f::maarel),
        K::McConnagh => sim(Weighted, f::mcconnagh),
        K::ModifiedGini => sim(Weighted, f::modified_gini),
        K::Mountford => sim(Weighted, f::mountford),
        K::Ochiai => sim(Weighted, f::ochiai),
        K::Simpson => sim(Weighted, f::simpson),
        K::SokalSneath => sim(Weighted, f::sokal_sneath),
        K::Sorgenfrei => sim(Weighted, f::sorgenfrei),
        K::Tripartite => sim(Weighted, f::tripartite),
        K::Tversky => sim(Weighted, f::tversky),
        K::BrayCurtis => dist(Weighted, f::bray_curtis),
        K::Cocogaston => dist(Weighted, f::cocogaston),
        K::Harrison => dist(Weighted, f::harrison),
        K::LanceWilliams => dist(Weighted, f::lance_williams),
        K::Lande => dist(Weighted, f::lande),
        K::Lennon => dist(Weighted, f::lennon),
        K::Magurran => dist(Weighted, f::magurran),
        K::Routledge1 => dist(Weighted, f::routledge1),
        K::Routledge2 => dist(Weighted, f::routledge2),
        K::Whittaker => dist(Weighted, f::whittaker),
        K::Williams => dist(Weighted, f::williams),
        K::Williams2 => dist(Weighted, f::williams2),
        K::WilsonShmida => dist(Weighted, f::wilson_shmida),

        // presence/absence tables
        K::BinaryBenini => sim(Binary, f::benini),
        K::BinaryBraunBlanquet => sim(Binary, f::braun_blanquet),
        K::BinaryCody => sim(Binary, f::cody),
        K::BinaryFagerMcGowan => sim(Binary, f::fager_mcgowan),
        K::BinaryGamma => sim(Binary, f::gamma),
        K::BinaryGilbert => sim(Binary, f::gilbert),
        K::BinaryGini => sim(Binary, f::gini),
        K::BinaryKulczynski2 => sim(Binary, f::kulczynski2),
        K::BinaryMcConnagh => sim(Binary, f::mcconnagh),
        K::BinaryModGini => sim(Binary, f::modified_gini),
        K::BinaryMountford => sim(Binary, f::mountford),
        K::BinaryOchiai => sim(Binary, f::ochiai),
        K::BinarySimpson => sim(Binary, f::simpson),
        K::BinarySorgenfrei => sim(Binary, f::sorgenfrei),
        K::BinaryTripartite => sim(Binary, f::tripartite),
        K::BinaryHarrison => dist(Binary, f::harrison),
        K::BinaryLennon => dist(Binary, f::lennon),
        K::BinaryRoutledge1 => dist(Binary, f::routledge1),
        K::BinaryRoutledge2 => dist(Binary, f::routledge2),
        K::BinaryWilliams => dist(Binary, f::williams),
        K::BinaryWilliams2 => dist(Binary, f::williams2),

        // agreement counts
        K::BinaryAntiDice => sim(Agreement, f::anti_dice),
        K::BinaryDice => sim(Agreement, f::dice),
        K::BinaryJaccard => sim(Agreement, f::jaccard),
        K::BinaryKulczynski1 => Scoring::FromSimilarity(
            Score::Table(Agreement, f::kulczynski1),
            Derivation::Reciprocal,
        ),
        K::BinaryLegendre => sim(Agreement, f::legendre),
        K::BinaryLennon2 => sim(Agreement, f::lennon2),
        K::BinaryMaarel => sim(Agreement, f::maarel),
        K::BinarySokalSneath => sim(Agreement, f::sokal_sneath_agreement),
        K::BinaryBrayCurtis => dist(Agreement, f::bray_curtis),
        K::BinaryCocogaston => dist(Agreement, f::cocogaston),
        K::BinaryLanceWilliams => dist(Agreement, f::lance_williams),
        K::BinaryLande => dist(Agreement, f::lande),
        K::BinaryMagurran => dist(Agreement, f::magurran),
        K::BinaryWhittaker => dist(Agreement, f::whittaker),
        K::BinaryWilsonShmida => dist(Agreement, f::wilson_shmida),

        K::Gamma
        | K::KumarJohnson
        | K::Mahalanobis
        | K::Sangvi
        | K::Taneja
        | K::User => return None,
    };
    Some(scoring)
}

/// Build a measure for `kind`, or `None` if it has no implementation.
pub fn create_measure(kind: MeasureKind, options: MeasureOptions) -> Option<Box<dyn VectorMeasure>> {
    let scoring = scoring_for(kind)?;
    Some(Box::new(FormulaMeasure::new(kind, scoring, options)))
}

/// Resolve `name` and build the measure.
///
/// Unlike [`create_measure`] this reports why no measure was produced: an
/// unknown or ambiguous name, or a recognized name without an implementation.
pub fn create_measure_named(name: &str, options: MeasureOptions) -> MeasureResult<Box<dyn VectorMeasure>> {
    let kind = parse_vector_measure_name(name).map_err(MeasureError::UnknownMeasure)?;
    create_measure(kind, options).ok_or_else(|| MeasureError::Unavailable {
        name: kind.canonical_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::names::MEASURE_NAMES;
    use crate::vector::TermVector;

    fn pair() -> (TermVector, TermVector) {
        (
            TermVector::sparse(vec![(0, 1.0), (1, 2.0), (3, 1.0)]),
            TermVector::sparse(vec![(1, 1.0), (2, 3.0), (3, 1.0)]),
        )
    }

    #[test]
    fn test_unimplemented_kinds_return_none() {
        for kind in [MeasureKind::Mahalanobis, MeasureKind::User, MeasureKind::Gamma] {
            assert!(create_measure(kind, MeasureOptions::default()).is_none());
        }
        assert!(matches!(
            create_measure_named("mahalanobis", MeasureOptions::default()),
            Err(MeasureError::Unavailable { .. })
        ));
        assert!(matches!(
            create_measure_named("no-such-measure", MeasureOptions::default()),
            Err(MeasureError::UnknownMeasure(_))
        ));
    }

    #[test]
    fn test_every_implemented_measure_obeys_its_relation() {
        let (a, b) = pair();
        for (_, kind) in MEASURE_NAMES.entries() {
            let Some(scoring) = scoring_for(*kind) else { continue };
            let m = FormulaMeasure::new(*kind, scoring, MeasureOptions::default());
            let (s, dist) = (m.similarity(&a, &b), m.distance(&a, &b));
            assert!(!s.is_nan() && !dist.is_nan(), "{kind:?} produced NaN");
            match m.scoring() {
                Scoring::FromSimilarity(_, Derivation::Complement)
                | Scoring::FromDistance(_, Derivation::Complement) => {
                    assert!((s + dist - 1.0).abs() < 1e-9, "{kind:?}: {s} + {dist}");
                }
                Scoring::FromSimilarity(_, Derivation::Reciprocal)
                | Scoring::FromDistance(_, Derivation::Reciprocal) => {
                    if s.is_finite() && dist.is_finite() {
                        assert!((s * dist - 1.0).abs() < 1e-9, "{kind:?}: {s} * {dist}");
                    }
                }
                Scoring::Direct { .. } => {}
            }
        }
    }

    #[test]
    fn test_identical_vectors_score_as_identical() {
        let (a, _) = pair();
        for kind in [
            MeasureKind::Cosine,
            MeasureKind::Jaccard,
            MeasureKind::Dice,
            MeasureKind::BinaryJaccard,
            MeasureKind::BinaryOchiai,
        ] {
            let m = create_measure(kind, MeasureOptions::default()).unwrap();
            assert!((m.similarity(&a, &a) - 1.0).abs() < 1e-9, "{kind:?}");
            assert!(m.distance(&a, &a).abs() < 1e-9, "{kind:?}");
        }
        for kind in [MeasureKind::Euclidean, MeasureKind::BrayCurtis, MeasureKind::JensenShannon] {
            let m = create_measure(kind, MeasureOptions::default()).unwrap();
            assert!(m.distance(&a, &a).abs() < 1e-9, "{kind:?}");
        }
    }

    #[test]
    fn test_kulczynski1_reciprocal_infinity() {
        let (a, _) = pair();
        let m = create_measure(MeasureKind::Kulczynski1, MeasureOptions::default()).unwrap();
        assert_eq!(m.similarity(&a, &a), f64::INFINITY);
        assert_eq!(m.distance(&a, &a), 0.0);
        let disjoint = TermVector::sparse(vec![(9, 1.0)]);
        assert_eq!(m.similarity(&a, &disjoint), 0.0);
        assert_eq!(m.distance(&a, &disjoint), f64::INFINITY);
    }

    #[test]
    fn test_lnorm_uses_power_option() {
        let a = TermVector::dense(vec![0.0, 0.0]);
        let b = TermVector::dense(vec![3.0, 4.0]);
        let opts = MeasureOptions::parse("power=2").unwrap();
        let m = create_measure(MeasureKind::LNorm, opts).unwrap();
        assert!((m.distance(&a, &b) - 5.0).abs() < 1e-12);
        assert_eq!(m.canonical_name(), "L-norm");
    }
}
