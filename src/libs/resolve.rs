//! Greedy interval packing.
//!
//! Candidates are visited in order. A candidate is kept iff none of its
//! positions is already used; kept positions are added to the used set.
//! Rejections are final. The result is pairwise disjoint and maximal for the
//! given order, but not an optimal cover.

use intspan::IntSpan;
use std::collections::BTreeMap;

/// Positions a candidate claims on the sequence.
pub trait Occupancy {
    /// Leftmost claimed position, the tie-break after the primary key
    fn start(&self) -> usize;
    fn occupied(&self) -> IntSpan;
}

/// Inclusive `[start, end]` as an `IntSpan`
pub fn span(start: usize, end: usize) -> IntSpan {
    IntSpan::from_pair(start as i32, end as i32)
}

/// Claimed ranges, keyed by lower bound.
///
/// Ranges are only added after `is_free`, so they never overlap each other and
/// a lookup only has to inspect the nearest range to the left.
#[derive(Debug, Clone, Default)]
pub struct UsedSet {
    ranges: BTreeMap<i32, i32>,
}

impl UsedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any position of `[lower, upper]` is claimed
    pub fn overlaps(&self, lower: i32, upper: i32) -> bool {
        self.ranges
            .range(..=upper)
            .next_back()
            .map_or(false, |(_, &end)| end >= lower)
    }

    pub fn is_free(&self, ints: &IntSpan) -> bool {
        ints.spans()
            .into_iter()
            .all(|(lower, upper)| !self.overlaps(lower, upper))
    }

    /// Callers check `is_free` first
    fn claim(&mut self, ints: &IntSpan) {
        for (lower, upper) in ints.spans() {
            self.ranges.insert(lower, upper);
        }
    }

    /// Number of disjoint ranges claimed
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Keeps candidates, in the given order, that do not touch earlier keepers.
pub fn resolve_overlaps<T: Occupancy>(candidates: Vec<T>) -> Vec<T> {
    let (_, kept) = candidates
        .into_iter()
        .fold((UsedSet::new(), Vec::new()), |(used, kept), candidate| {
            accept(used, kept, candidate)
        });
    kept
}

/// Sorts by `key`, then ascending start, and resolves.
///
/// The sort is stable, so equal keys keep their input order.
pub fn resolve_by<T, K, F>(mut candidates: Vec<T>, key: F) -> Vec<T>
where
    T: Occupancy,
    K: Ord,
    F: Fn(&T) -> K,
{
    candidates.sort_by(|a, b| key(a).cmp(&key(b)).then_with(|| a.start().cmp(&b.start())));
    resolve_overlaps(candidates)
}

fn accept<T: Occupancy>(mut used: UsedSet, mut kept: Vec<T>, candidate: T) -> (UsedSet, Vec<T>) {
    let occupied = candidate.occupied();
    if used.is_free(&occupied) {
        used.claim(&occupied);
        kept.push(candidate);
    }
    (used, kept)
}

/// Union of all claimed positions
pub fn coverage<T: Occupancy>(items: &[T]) -> IntSpan {
    let mut ints = IntSpan::new();
    for item in items {
        ints.merge(&item.occupied());
    }
    ints
}
