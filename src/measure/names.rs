//! Similarity-measure name registry.

use crate::error::NameError;
use crate::prefix::PrefixTable;

/// Every similarity/distance measure the registry knows about.
///
/// Some entries are recognized names without an implementation; the factory
/// returns `None` for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureKind {
    Cosine,
    AntiDice,
    Benini,
    Bhattacharyya,
    BinaryAntiDice,
    BinaryBenini,
    BinaryBraunBlanquet,
    BinaryBrayCurtis,
    BinaryCocogaston,
    BinaryCody,
    BinaryDice,
    BinaryFagerMcGowan,
    BinaryGamma,
    BinaryGilbert,
    BinaryGini,
    BinaryHarrison,
    BinaryJaccard,
    BinaryKulczynski1,
    BinaryKulczynski2,
    BinaryLanceWilliams,
    BinaryLande,
    BinaryLennon,
    BinaryLennon2,
    BinaryLegendre,
    BinaryMaarel,
    BinaryMagurran,
    BinaryMcConnagh,
    BinaryModGini,
    BinaryMountford,
    BinaryOchiai,
    BinaryRoutledge1,
    BinaryRoutledge2,
    BinarySimpson,
    BinarySokalSneath,
    BinarySorgenfrei,
    BinaryTripartite,
    BinaryWhittaker,
    BinaryWilliams,
    BinaryWilliams2,
    BinaryWilsonShmida,
    BraunBlanquet,
    BrayCurtis,
    Canberra,
    CircleProduct,
    Clark,
    Cocogaston,
    Cody,
    Dice,
    Euclidean,
    FagerMcGowan,
    Fidelity,
    Gamma,
    Gilbert,
    Gini,
    Harrison,
    Hellinger,
    Jaccard,
    Jensen,
    JensenShannon,
    Kulczynski1,
    Kulczynski2,
    KullbackLeibler,
    KumarJohnson,
    L0,
    LanceWilliams,
    Lande,
    Lennon,
    Lennon2,
    Legendre,
    LInf,
    Lorentzian,
    LNorm,
    Maarel,
    Magurran,
    Mahalanobis,
    Manhattan,
    Matusita,
    McConnagh,
    ModifiedGini,
    Mountford,
    Ochiai,
    Robinson,
    Routledge1,
    Routledge2,
    Sangvi,
    SimilarityRatio,
    Simpson,
    Soergel,
    SokalSneath,
    Sorgenfrei,
    SquaredChord,
    SquaredEuclidean,
    Taneja,
    Tripartite,
    Tversky,
    WaveHedges,
    Whittaker,
    Williams,
    Williams2,
    WilsonShmida,
    User,
}

/// Name table. The first entry for a kind is its canonical name.
pub static MEASURE_NAMES: PrefixTable<MeasureKind> = PrefixTable::new(
    "similarity measure",
    &[
    ("Cosine", MeasureKind::Cosine),
    ("Anti-Dice", MeasureKind::AntiDice),
    ("AntiDice", MeasureKind::AntiDice),
    ("Benini", MeasureKind::Benini),
    ("Bhattacharyya", MeasureKind::Bhattacharyya),
    ("Binary Anti-Dice", MeasureKind::BinaryAntiDice),
    ("Binary AntiDice", MeasureKind::BinaryAntiDice),
    ("BinaryAntiDice", MeasureKind::BinaryAntiDice),
    ("Binary Benini", MeasureKind::BinaryBenini),
    ("BinaryBenini", MeasureKind::BinaryBenini),
    ("Binary Braun-Blanquet", MeasureKind::BinaryBraunBlanquet),
    ("Binary BraunBlanquet", MeasureKind::BinaryBraunBlanquet),
    ("BinaryBraunBlanquet", MeasureKind::BinaryBraunBlanquet),
    ("Binary Bray-Curtis", MeasureKind::BinaryBrayCurtis),
    ("Binary BrayCurtis", MeasureKind::BinaryBrayCurtis),
    ("BinaryBrayCurtis", MeasureKind::BinaryBrayCurtis),
    ("Binary Cocogaston", MeasureKind::BinaryCocogaston),
    ("BinaryCocogaston", MeasureKind::BinaryCocogaston),
    ("Binary Cody", MeasureKind::BinaryCody),
    ("BinaryCody", MeasureKind::BinaryCody),
    ("Binary Dice", MeasureKind::BinaryDice),
    ("BinaryDice", MeasureKind::BinaryDice),
    ("Binary Fager-McGowan", MeasureKind::BinaryFagerMcGowan),
    ("Binary FagerMcGowan", MeasureKind::BinaryFagerMcGowan),
    ("BinaryFagerMcGowan", MeasureKind::BinaryFagerMcGowan),
    ("Binary Gamma", MeasureKind::BinaryGamma),
    ("BinaryGamma", MeasureKind::BinaryGamma),
    ("Binary Gilbert", MeasureKind::BinaryGilbert),
    ("BinaryGilbert", MeasureKind::BinaryGilbert),
    ("Binary Gini", MeasureKind::BinaryGini),
    ("BinaryGini", MeasureKind::BinaryGini),
    ("Binary Harrison", MeasureKind::BinaryHarrison),
    ("BinaryHarrison", MeasureKind::BinaryHarrison),
    ("Binary Jaccard", MeasureKind::BinaryJaccard),
    ("BinaryJaccard", MeasureKind::BinaryJaccard),
    ("Binary Kulczynski1", MeasureKind::BinaryKulczynski1),
    ("BinaryKulczynski1", MeasureKind::BinaryKulczynski1),
    ("Binary Kulczynski2", MeasureKind::BinaryKulczynski2),
    ("BinaryKulczynski2", MeasureKind::BinaryKulczynski2),
    ("Binary Lance-Williams", MeasureKind::BinaryLanceWilliams),
    ("Binary LanceWilliams", MeasureKind::BinaryLanceWilliams),
    ("BinaryLanceWilliams", MeasureKind::BinaryLanceWilliams),
    ("Binary Lande", MeasureKind::BinaryLande),
    ("BinaryLande", MeasureKind::BinaryLande),
    ("Binary Lennon", MeasureKind::BinaryLennon),
    ("BinaryLennon", MeasureKind::BinaryLennon),
    ("Binary Lennon2", MeasureKind::BinaryLennon2),
    ("BinaryLennon2", MeasureKind::BinaryLennon2),
    ("Binary Legendre", MeasureKind::BinaryLegendre),
    ("BinaryLegendre", MeasureKind::BinaryLegendre),
    ("Binary Maarel", MeasureKind::BinaryMaarel),
    ("BinaryMaarel", MeasureKind::BinaryMaarel),
    ("Binary Magurran", MeasureKind::BinaryMagurran),
    ("BinaryMagurran", MeasureKind::BinaryMagurran),
    ("Binary McConnagh", MeasureKind::BinaryMcConnagh),
    ("BinaryMcConnagh", MeasureKind::BinaryMcConnagh),
    ("Binary Modified Gini", MeasureKind::BinaryModGini),
    ("Binary Mod-Gini", MeasureKind::BinaryModGini),
    ("Binary ModGini", MeasureKind::BinaryModGini),
    ("BinaryModGini", MeasureKind::BinaryModGini),
    ("Binary Mountford", MeasureKind::BinaryMountford),
    ("BinaryMountford", MeasureKind::BinaryMountford),
    ("Binary Ochiai", MeasureKind::BinaryOchiai),
    ("BinaryOchiai", MeasureKind::BinaryOchiai),
    ("Binary Routledge1", MeasureKind::BinaryRoutledge1),
    ("BinaryRoutledge1", MeasureKind::BinaryRoutledge1),
    ("Binary Routledge2", MeasureKind::BinaryRoutledge2),
    ("BinaryRoutledge2", MeasureKind::BinaryRoutledge2),
    ("Binary Simpson", MeasureKind::BinarySimpson),
    ("BinarySimpson", MeasureKind::BinarySimpson),
    ("Binary Sokal-Sneath", MeasureKind::BinarySokalSneath),
    ("Binary SokalSneath", MeasureKind::BinarySokalSneath),
    ("BinarySokalSneath", MeasureKind::BinarySokalSneath),
    ("Binary Sorgenfrei", MeasureKind::BinarySorgenfrei),
    ("BinarySorgenfrei", MeasureKind::BinarySorgenfrei),
    ("Binary Tripartite", MeasureKind::BinaryTripartite),
    ("BinaryTripartite", MeasureKind::BinaryTripartite),
    ("Binary Whittaker", MeasureKind::BinaryWhittaker),
    ("BinaryWhittaker", MeasureKind::BinaryWhittaker),
    ("Binary Williams", MeasureKind::BinaryWilliams),
    ("BinaryWilliams", MeasureKind::BinaryWilliams),
    ("Binary Williams2", MeasureKind::BinaryWilliams2),
    ("BinaryWilliams2", MeasureKind::BinaryWilliams2),
    ("Binary Wilson-Shmida", MeasureKind::BinaryWilsonShmida),
    ("Binary WilsonShmida", MeasureKind::BinaryWilsonShmida),
    ("BinaryWilsonShmida", MeasureKind::BinaryWilsonShmida),
    ("Braun-Blanquet", MeasureKind::BraunBlanquet),
    ("BraunBlanquet", MeasureKind::BraunBlanquet),
    ("BB", MeasureKind::BraunBlanquet),
    ("Bray-Curtis", MeasureKind::BrayCurtis),
    ("BrayCurtis", MeasureKind::BrayCurtis),
    ("BC", MeasureKind::BrayCurtis),
    ("Canberra", MeasureKind::Canberra),
    ("Circle Product", MeasureKind::CircleProduct),
    ("Circle-Product", MeasureKind::CircleProduct),
    ("CircleProduct", MeasureKind::CircleProduct),
    ("Clark", MeasureKind::Clark),
    ("Cocogaston", MeasureKind::Cocogaston),
    ("Cody", MeasureKind::Cody),
    ("Dice", MeasureKind::Dice),
    ("Euclidean", MeasureKind::Euclidean),
    ("Fager-McGowan", MeasureKind::FagerMcGowan),
    ("FagerMcGowan", MeasureKind::FagerMcGowan),
    ("FM", MeasureKind::FagerMcGowan),
    ("Fidelity", MeasureKind::Fidelity),
    ("Gamma", MeasureKind::Gamma),
    ("Gilbert", MeasureKind::Gilbert),
    ("Gini", MeasureKind::Gini),
    ("Harrison", MeasureKind::Harrison),
    ("Hellinger", MeasureKind::Hellinger),
    ("Jaccard", MeasureKind::Jaccard),
    ("Jensen", MeasureKind::Jensen),
    ("Jensen-Shannon", MeasureKind::JensenShannon),
    ("JensenShannon", MeasureKind::JensenShannon),
    ("JS", MeasureKind::JensenShannon),
    ("Kulczynski1", MeasureKind::Kulczynski1),
    ("Kulczynski2", MeasureKind::Kulczynski2),
    ("Kullback-Leibler", MeasureKind::KullbackLeibler),
    ("KL", MeasureKind::KullbackLeibler),
    ("Kumar-Johnson", MeasureKind::KumarJohnson),
    ("KumarJohnson", MeasureKind::KumarJohnson),
    ("KJ", MeasureKind::KumarJohnson),
    ("L0", MeasureKind::L0),
    ("Lance-Williams", MeasureKind::LanceWilliams),
    ("LanceWilliams", MeasureKind::LanceWilliams),
    ("LW", MeasureKind::LanceWilliams),
    ("Lande", MeasureKind::Lande),
    ("Lennon", MeasureKind::Lennon),
    ("Lennon2", MeasureKind::Lennon2),
    ("Legendre", MeasureKind::Legendre),
    ("Linf", MeasureKind::LInf),
    ("L-infinity", MeasureKind::LInf),
    ("Chebyshev", MeasureKind::LInf),
    ("Lorentzian", MeasureKind::Lorentzian),
    ("L-norm", MeasureKind::LNorm),
    ("Minkowski", MeasureKind::LNorm),
    ("Lnorm", MeasureKind::LNorm),
    ("Maarel", MeasureKind::Maarel),
    ("Magurran", MeasureKind::Magurran),
    ("Mahalanobis", MeasureKind::Mahalanobis),
    ("Manhattan", MeasureKind::Manhattan),
    ("L1", MeasureKind::Manhattan),
    ("Matusita", MeasureKind::Matusita),
    ("McConnagh", MeasureKind::McConnagh),
    ("Modified Gini", MeasureKind::ModifiedGini),
    ("Mod-Gini", MeasureKind::ModifiedGini),
    ("ModGini", MeasureKind::ModifiedGini),
    ("Mountford", MeasureKind::Mountford),
    ("Ochiai", MeasureKind::Ochiai),
    ("Robinson", MeasureKind::Robinson),
    ("Routledge1", MeasureKind::Routledge1),
    ("Routledge2", MeasureKind::Routledge2),
    ("Sangvi", MeasureKind::Sangvi),
    ("Similarity Ratio", MeasureKind::SimilarityRatio),
    ("Similarity-Ratio", MeasureKind::SimilarityRatio),
    ("SimilarityRatio", MeasureKind::SimilarityRatio),
    ("Sim-Ratio", MeasureKind::SimilarityRatio),
    ("SimRatio", MeasureKind::SimilarityRatio),
    ("Simpson", MeasureKind::Simpson),
    ("Soergel", MeasureKind::Soergel),
    ("Sokal-Sneath", MeasureKind::SokalSneath),
    ("SokalSneath", MeasureKind::SokalSneath),
    ("SS", MeasureKind::SokalSneath),
    ("Sorgenfrei", MeasureKind::Sorgenfrei),
    ("Squared Chord", MeasureKind::SquaredChord),
    ("Squared-Chord", MeasureKind::SquaredChord),
    ("SquaredChord", MeasureKind::SquaredChord),
    ("Squared Euclidean", MeasureKind::SquaredEuclidean),
    ("Squared-Euclidean", MeasureKind::SquaredEuclidean),
    ("SquaredEuclidean", MeasureKind::SquaredEuclidean),
    ("Taneja", MeasureKind::Taneja),
    ("Tripartite", MeasureKind::Tripartite),
    ("3P", MeasureKind::Tripartite),
    ("Tversky", MeasureKind::Tversky),
    ("Wave Hedges", MeasureKind::WaveHedges),
    ("Wave-Hedges", MeasureKind::WaveHedges),
    ("WaveHedges", MeasureKind::WaveHedges),
    ("WH", MeasureKind::WaveHedges),
    ("Whittaker", MeasureKind::Whittaker),
    ("Williams", MeasureKind::Williams),
    ("Williams2", MeasureKind::Williams2),
    ("Wilson-Shmida", MeasureKind::WilsonShmida),
    ("WilsonShmida", MeasureKind::WilsonShmida),
    ("WS", MeasureKind::WilsonShmida),
    ("User", MeasureKind::User),
    ],
);

impl MeasureKind {
    /// Display name, e.g. `"Jaccard"` or `"Binary Dice"`.
    pub fn canonical_name(self) -> &'static str {
        MEASURE_NAMES.name_of(self).unwrap_or("Unknown")
    }

    /// True for the presence/absence variants computed over nonzero counts.
    #[must_use]
    pub fn is_binary(self) -> bool {
        self.canonical_name().starts_with("Binary")
    }
}

/// Resolve a measure name (case-insensitive, unique prefixes accepted).
pub fn parse_vector_measure_name(name: &str) -> Result<MeasureKind, NameError> {
    MEASURE_NAMES.resolve(name)
}

/// All measure names, or those starting with `prefix`.
pub fn enumerate_vector_measure_names(prefix: Option<&str>) -> Vec<&'static str> {
    MEASURE_NAMES.enumerate(prefix)
}
