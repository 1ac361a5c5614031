//! The cluster tree.
//!
//! A [`ClusterInfo`] node holds direct member vectors and/or child nodes.
//! Members are shared with the caller's input collection through `Arc`, so
//! building, merging or dropping a tree never copies or frees a vector.

use std::sync::Arc;

use bitflags::bitflags;

use super::names::ClusterRep;
use crate::measure::VectorMeasure;
use crate::vector::{Accumulator, Label, LabelGenerator, TermVector, centroid};

/// Score returned when one side of a comparison is missing.
///
/// Real scores lie well above this value; callers treat anything at or
/// below it as undefined.
pub const UNDEFINED_SCORE: f64 = -999.99;

/// A vector shared between the input collection and the cluster tree.
pub type VectorRef = Arc<TermVector>;

bitflags! {
    /// Shape flags of a cluster node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClusterFlags: u8 {
        /// No subclusters: a leaf cluster.
        const FLAT = 0b0000_0001;
        /// No direct members: a pure branching node.
        const GROUP = 0b0000_0010;
    }
}

/// One node of a cluster tree.
#[derive(Debug, Clone, Default)]
pub struct ClusterInfo {
    members: Vec<VectorRef>,
    subclusters: Vec<ClusterInfo>,
    representative: Option<VectorRef>,
    label: Option<Label>,
    size: usize,
    flags: ClusterFlags,
}

impl ClusterInfo {
    /// Build a node from direct members and child nodes.
    pub fn new(members: Vec<VectorRef>, subclusters: Vec<ClusterInfo>) -> Self {
        let size = members.len() + subclusters.iter().map(ClusterInfo::size).sum::<usize>();
        let mut info = Self {
            members,
            subclusters,
            representative: None,
            label: None,
            size,
            flags: ClusterFlags::empty(),
        };
        info.update_flags();
        info
    }

    /// A leaf cluster over `members`.
    pub fn from_members(members: Vec<VectorRef>) -> Self {
        Self::new(members, Vec::new())
    }

    /// A group node over `subclusters`.
    pub fn from_subclusters(subclusters: Vec<ClusterInfo>) -> Self {
        Self::new(Vec::new(), subclusters)
    }

    /// A leaf holding exactly `vector`, labelled with the vector's label.
    pub fn singleton(vector: VectorRef) -> Self {
        let label = vector.label();
        let mut info = Self::from_members(vec![vector]);
        info.label = label;
        info
    }

    /// A group node with one singleton child per vector.
    pub fn singleton_clusters(vectors: &[VectorRef]) -> Self {
        Self::from_subclusters(vectors.iter().cloned().map(Self::singleton).collect())
    }

    fn update_flags(&mut self) {
        self.flags.set(ClusterFlags::FLAT, self.subclusters.is_empty());
        self.flags.set(
            ClusterFlags::GROUP,
            self.members.is_empty() && !self.subclusters.is_empty(),
        );
    }

    // ---- accessors --------------------------------------------------------

    pub fn members(&self) -> &[VectorRef] {
        &self.members
    }

    pub fn subclusters(&self) -> &[ClusterInfo] {
        &self.subclusters
    }

    pub fn num_subclusters(&self) -> usize {
        self.subclusters.len()
    }

    /// Number of vectors reachable through this node.
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn flags(&self) -> ClusterFlags {
        self.flags
    }

    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.flags.contains(ClusterFlags::FLAT)
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.flags.contains(ClusterFlags::GROUP)
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn set_label(&mut self, label: Option<Label>) {
        self.label = label;
    }

    /// Cached representative, if one has been computed.
    pub fn representative(&self) -> Option<&VectorRef> {
        self.representative.as_ref()
    }

    /// True when `vector` (by identity) is reachable through this node.
    #[must_use]
    pub fn contains(&self, vector: &TermVector) -> bool {
        self.members.iter().any(|m| m.same_as(vector))
            || self.subclusters.iter().any(|s| s.contains(vector))
    }

    /// Every vector reachable through this node, members first, then each
    /// subcluster depth-first.
    pub fn all_members(&self) -> Vec<VectorRef> {
        let mut out = Vec::with_capacity(self.size);
        self.collect_members(&mut out);
        out
    }

    fn collect_members(&self, out: &mut Vec<VectorRef>) {
        out.extend(self.members.iter().cloned());
        for sub in &self.subclusters {
            sub.collect_members(out);
        }
    }

    // ---- mutation ---------------------------------------------------------

    pub fn add_vector(&mut self, vector: VectorRef) {
        self.members.push(vector);
        self.size += 1;
        self.update_flags();
    }

    pub fn add_vectors<I: IntoIterator<Item = VectorRef>>(&mut self, vectors: I) {
        for v in vectors {
            self.add_vector(v);
        }
    }

    pub fn add_subcluster(&mut self, sub: ClusterInfo) {
        self.size += sub.size;
        self.subclusters.push(sub);
        self.update_flags();
    }

    /// Take the child nodes out, leaving this node with members only.
    pub fn take_subclusters(&mut self) -> Vec<ClusterInfo> {
        let subs = std::mem::take(&mut self.subclusters);
        self.size = self.members.len();
        self.update_flags();
        subs
    }

    /// Take the direct members out.
    pub fn take_members(&mut self) -> Vec<VectorRef> {
        let members = std::mem::take(&mut self.members);
        self.size -= members.len();
        self.update_flags();
        members
    }

    /// Combine two nodes under a freshly generated label.
    ///
    /// With `flatten` the result is a leaf holding both sides' transitive
    /// members; otherwise it is a group with exactly the two inputs as
    /// children.
    #[must_use]
    pub fn merge(self, other: ClusterInfo, flatten: bool, labels: &LabelGenerator) -> ClusterInfo {
        let mut merged = if flatten {
            let mut members = self.all_members();
            members.extend(other.all_members());
            Self::from_members(members)
        } else {
            Self::from_subclusters(vec![self, other])
        };
        merged.label = Some(labels.generate());
        merged
    }

    /// Merge the children at `first` and `second` in place.
    ///
    /// The result replaces the child at `first` and the child at `second` is
    /// removed, shifting every later child down by one. Returns `false` when
    /// the indices are equal or out of range.
    pub fn merge_at(
        &mut self,
        first: usize,
        second: usize,
        flatten: bool,
        labels: &LabelGenerator,
    ) -> bool {
        let n = self.subclusters.len();
        if first == second || first >= n || second >= n {
            return false;
        }
        let removed = self.subclusters.remove(second);
        let first = if second < first { first - 1 } else { first };
        let kept = std::mem::take(&mut self.subclusters[first]);
        self.subclusters[first] = kept.merge(removed, flatten, labels);
        true
    }

    /// Collapse every immediate child into a leaf holding its transitive
    /// members. Only one level is flattened: this node keeps its children.
    pub fn flatten_subclusters(&mut self) {
        for sub in &mut self.subclusters {
            let members = sub.all_members();
            sub.subclusters.clear();
            sub.members = members;
            sub.representative = None;
            sub.update_flags();
        }
    }

    /// Give every node and vector a path label: the node's own members get
    /// `prefix`, child `i` gets `prefix SEP i`, and so on down the tree.
    pub fn label_subcluster_paths(&mut self, prefix: &str, sep: &str) {
        self.label_paths_with(prefix, sep, &mut |v, path| {
            v.set_label(Some(Label::new(path)));
        });
    }

    /// Like [`label_subcluster_paths`](Self::label_subcluster_paths) with a
    /// caller-supplied setter for the vector labels.
    pub fn label_paths_with<F>(&mut self, prefix: &str, sep: &str, set_label: &mut F)
    where
        F: FnMut(&TermVector, &str),
    {
        self.label = Some(Label::new(prefix));
        for m in &self.members {
            set_label(m, prefix);
        }
        for (i, sub) in self.subclusters.iter_mut().enumerate() {
            let path = format!("{prefix}{sep}{i}");
            sub.label_paths_with(&path, sep, set_label);
        }
    }

    // ---- representatives --------------------------------------------------

    /// Compute and cache the representative under `rep`. Linkage policies
    /// have no single representative and clear the cache.
    pub fn set_representative(&mut self, rep: ClusterRep, measure: &dyn VectorMeasure) {
        self.representative = self.compute_representative(rep, measure);
    }

    /// Update the cached representative after `added` joined this node.
    ///
    /// Centroids are accumulated incrementally from the cached value; other
    /// policies are recomputed.
    pub fn update_representative(
        &mut self,
        added: &VectorRef,
        rep: ClusterRep,
        measure: &dyn VectorMeasure,
    ) {
        match (rep, self.representative.take()) {
            (ClusterRep::Centroid, Some(current)) => {
                let mut acc = Accumulator::resume(&current, self.size.saturating_sub(1));
                acc.add(added);
                self.representative = Some(Arc::new(acc.finish()));
            }
            (ClusterRep::Newest, _) => self.representative = Some(Arc::clone(added)),
            _ => self.set_representative(rep, measure),
        }
    }

    fn compute_representative(&self, rep: ClusterRep, measure: &dyn VectorMeasure) -> Option<VectorRef> {
        match rep {
            ClusterRep::Centroid => self.centroid().map(Arc::new),
            ClusterRep::Medoid => {
                let center = self.centroid()?;
                self.all_members()
                    .into_iter()
                    .map(|m| (measure.similarity(&m, &center), m))
                    .fold(None, |best: Option<(f64, VectorRef)>, (sim, m)| match best {
                        Some((best_sim, _)) if best_sim >= sim => best,
                        _ => Some((sim, m)),
                    })
                    .map(|(_, m)| m)
            }
            ClusterRep::Prototype => self.prototype(),
            ClusterRep::Newest => self.newest(),
            ClusterRep::Average | ClusterRep::Furthest | ClusterRep::Nearest | ClusterRep::Rms => {
                None
            }
        }
    }

    fn centroid(&self) -> Option<TermVector> {
        let members = self.all_members();
        let sparse = members.first().is_some_and(|m| m.is_sparse());
        centroid(members.iter().map(|m| m.as_ref()), sparse)
    }

    fn prototype(&self) -> Option<VectorRef> {
        self.members
            .first()
            .cloned()
            .or_else(|| self.subclusters.iter().find_map(ClusterInfo::prototype))
    }

    fn newest(&self) -> Option<VectorRef> {
        self.members
            .last()
            .cloned()
            .or_else(|| self.subclusters.last().and_then(ClusterInfo::newest))
    }

    /// Cached representative, or a freshly computed one.
    fn representative_for(&self, rep: ClusterRep, measure: &dyn VectorMeasure) -> Option<VectorRef> {
        self.representative
            .clone()
            .or_else(|| self.compute_representative(rep, measure))
    }

    // ---- comparisons ------------------------------------------------------

    /// Similarity to another cluster under `rep`, or [`UNDEFINED_SCORE`]
    /// when `other` is missing or either side is empty.
    pub fn similarity(
        &self,
        other: Option<&ClusterInfo>,
        rep: ClusterRep,
        measure: &dyn VectorMeasure,
    ) -> f64 {
        let Some(other) = other else {
            return UNDEFINED_SCORE;
        };
        if rep.is_linkage() {
            return linkage(
                &self.all_members(),
                &other.all_members(),
                rep,
                true,
                |a, b| measure.similarity(a, b),
            );
        }
        match (
            self.representative_for(rep, measure),
            other.representative_for(rep, measure),
        ) {
            (Some(a), Some(b)) => measure.similarity(&a, &b),
            _ => UNDEFINED_SCORE,
        }
    }

    /// Distance to another cluster under `rep`; see [`similarity`](Self::similarity).
    pub fn distance(
        &self,
        other: Option<&ClusterInfo>,
        rep: ClusterRep,
        measure: &dyn VectorMeasure,
    ) -> f64 {
        let Some(other) = other else {
            return UNDEFINED_SCORE;
        };
        if rep.is_linkage() {
            return linkage(
                &self.all_members(),
                &other.all_members(),
                rep,
                false,
                |a, b| measure.distance(a, b),
            );
        }
        match (
            self.representative_for(rep, measure),
            other.representative_for(rep, measure),
        ) {
            (Some(a), Some(b)) => measure.distance(&a, &b),
            _ => UNDEFINED_SCORE,
        }
    }

    /// Similarity to a single vector under `rep`.
    pub fn similarity_to_vector(
        &self,
        vector: Option<&TermVector>,
        rep: ClusterRep,
        measure: &dyn VectorMeasure,
    ) -> f64 {
        let Some(vector) = vector else {
            return UNDEFINED_SCORE;
        };
        if rep.is_linkage() {
            return linkage_to_vector(&self.all_members(), vector, rep, true, |a, b| {
                measure.similarity(a, b)
            });
        }
        match self.representative_for(rep, measure) {
            Some(r) => measure.similarity(&r, vector),
            None => UNDEFINED_SCORE,
        }
    }

    /// Distance to a single vector under `rep`.
    pub fn distance_to_vector(
        &self,
        vector: Option<&TermVector>,
        rep: ClusterRep,
        measure: &dyn VectorMeasure,
    ) -> f64 {
        let Some(vector) = vector else {
            return UNDEFINED_SCORE;
        };
        if rep.is_linkage() {
            return linkage_to_vector(&self.all_members(), vector, rep, false, |a, b| {
                measure.distance(a, b)
            });
        }
        match self.representative_for(rep, measure) {
            Some(r) => measure.distance(&r, vector),
            None => UNDEFINED_SCORE,
        }
    }
}

/// Aggregate a score over all cross pairs.
///
/// `higher_is_closer` says whether the scores are similarities: `Nearest`
/// takes the closest pair and `Furthest` the most distant one in either case.
fn linkage<F>(left: &[VectorRef], right: &[VectorRef], rep: ClusterRep, higher_is_closer: bool, score: F) -> f64
where
    F: Fn(&TermVector, &TermVector) -> f64,
{
    let scores = left
        .iter()
        .flat_map(|a| right.iter().map(move |b| (a, b)))
        .map(|(a, b)| score(a, b));
    aggregate(scores, rep, higher_is_closer)
}

fn linkage_to_vector<F>(members: &[VectorRef], vector: &TermVector, rep: ClusterRep, higher_is_closer: bool, score: F) -> f64
where
    F: Fn(&TermVector, &TermVector) -> f64,
{
    aggregate(members.iter().map(|m| score(m, vector)), rep, higher_is_closer)
}

fn aggregate<I: Iterator<Item = f64>>(scores: I, rep: ClusterRep, higher_is_closer: bool) -> f64 {
    let mut count = 0usize;
    let (mut sum, mut sum_sq) = (0.0, 0.0);
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for s in scores {
        count += 1;
        sum += s;
        sum_sq += s * s;
        min = min.min(s);
        max = max.max(s);
    }
    if count == 0 {
        return UNDEFINED_SCORE;
    }
    let closest = if higher_is_closer { max } else { min };
    let furthest = if higher_is_closer { min } else { max };
    match rep {
        ClusterRep::Nearest => closest,
        ClusterRep::Furthest => furthest,
        ClusterRep::Rms => (sum_sq / count as f64).sqrt(),
        _ => sum / count as f64,
    }
}
