//! Auxiliary indices for O(1)-amortized incremental rescoring.
//!
//! Conflict-class constraints key lessons into small buckets (by
//! room+slot, teacher+day, group+day, ...) so that a single lesson's
//! retract/insert only touches its own bucket instead of the whole lesson
//! list. Aggregate constraints additionally book the score currently
//! charged per key so a change yields a net delta.

use std::collections::HashMap;
use std::hash::Hash;

use smallvec::SmallVec;
use timegrid_core::HardSoftScore;

/// Per-lesson score bookkeeping for unary constraints.
#[derive(Debug, Clone, Default)]
pub(crate) struct LessonScores {
    scores: Vec<HardSoftScore>,
}

impl LessonScores {
    fn ensure(&mut self, lesson: usize) {
        if lesson >= self.scores.len() {
            self.scores.resize(lesson + 1, HardSoftScore::ZERO);
        }
    }

    /// Replaces all bookkeeping; returns the total.
    pub fn seed(&mut self, scores: Vec<HardSoftScore>) -> HardSoftScore {
        let total = scores.iter().copied().sum();
        self.scores = scores;
        total
    }

    /// Removes a lesson's booked score; returns the (undo) delta.
    pub fn clear(&mut self, lesson: usize) -> HardSoftScore {
        self.ensure(lesson);
        -std::mem::replace(&mut self.scores[lesson], HardSoftScore::ZERO)
    }

    /// Books a lesson's score; returns it as the delta.
    pub fn set(&mut self, lesson: usize, score: HardSoftScore) -> HardSoftScore {
        self.ensure(lesson);
        self.scores[lesson] = score;
        score
    }

    pub fn reset(&mut self) {
        self.scores.clear();
    }
}

/// Bucket multimap for pairwise constraints.
///
/// Membership mirrors the current assignment state: a lesson is added
/// after its variables change and removed before, so pair contributions
/// computed against bucket occupants always balance out.
#[derive(Debug, Clone)]
pub(crate) struct PairIndex<K: Eq + Hash + Clone> {
    buckets: HashMap<K, SmallVec<[usize; 4]>>,
    lesson_key: Vec<Option<K>>,
}

impl<K: Eq + Hash + Clone> Default for PairIndex<K> {
    fn default() -> Self {
        PairIndex {
            buckets: HashMap::new(),
            lesson_key: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> PairIndex<K> {
    fn ensure(&mut self, lesson: usize) {
        if lesson >= self.lesson_key.len() {
            self.lesson_key.resize(lesson + 1, None);
        }
    }

    /// Lessons currently in the bucket, excluding any not-yet-added one.
    pub fn occupants(&self, key: &K) -> &[usize] {
        self.buckets.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn add(&mut self, lesson: usize, key: K) {
        self.ensure(lesson);
        debug_assert!(
            self.lesson_key[lesson].is_none(),
            "lesson {lesson} inserted twice without retract"
        );
        self.buckets.entry(key.clone()).or_default().push(lesson);
        self.lesson_key[lesson] = Some(key);
    }

    /// Removes the lesson from its bucket; returns the key it was under.
    pub fn remove(&mut self, lesson: usize) -> Option<K> {
        self.ensure(lesson);
        let key = self.lesson_key[lesson].take()?;
        if let Some(bucket) = self.buckets.get_mut(&key) {
            if let Some(pos) = bucket.iter().position(|&l| l == lesson) {
                bucket.swap_remove(pos);
            }
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
        Some(key)
    }

    pub fn reset(&mut self) {
        self.buckets.clear();
        self.lesson_key.clear();
    }
}

/// Bucket multimap plus per-key booked score for aggregate constraints
/// (weekly hours, workday span, daily load).
#[derive(Debug, Clone)]
pub(crate) struct AggregateIndex<K: Eq + Hash + Clone> {
    buckets: HashMap<K, SmallVec<[usize; 8]>>,
    booked: HashMap<K, HardSoftScore>,
    lesson_key: Vec<Option<K>>,
}

impl<K: Eq + Hash + Clone> Default for AggregateIndex<K> {
    fn default() -> Self {
        AggregateIndex {
            buckets: HashMap::new(),
            booked: HashMap::new(),
            lesson_key: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> AggregateIndex<K> {
    fn ensure(&mut self, lesson: usize) {
        if lesson >= self.lesson_key.len() {
            self.lesson_key.resize(lesson + 1, None);
        }
    }

    pub fn members(&self, key: &K) -> &[usize] {
        self.buckets.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn keys(&self) -> Vec<K> {
        self.buckets.keys().cloned().collect()
    }

    pub fn add(&mut self, lesson: usize, key: K) {
        self.ensure(lesson);
        debug_assert!(
            self.lesson_key[lesson].is_none(),
            "lesson {lesson} inserted twice without retract"
        );
        self.buckets.entry(key.clone()).or_default().push(lesson);
        self.lesson_key[lesson] = Some(key);
    }

    pub fn remove(&mut self, lesson: usize) -> Option<K> {
        self.ensure(lesson);
        let key = self.lesson_key[lesson].take()?;
        if let Some(bucket) = self.buckets.get_mut(&key) {
            if let Some(pos) = bucket.iter().position(|&l| l == lesson) {
                bucket.swap_remove(pos);
            }
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
        Some(key)
    }

    /// Re-books the key's score; returns the net delta against what was
    /// previously charged.
    pub fn rebook(&mut self, key: K, score: HardSoftScore) -> HardSoftScore {
        let old = if score == HardSoftScore::ZERO {
            self.booked.remove(&key).unwrap_or(HardSoftScore::ZERO)
        } else {
            self.booked.insert(key, score).unwrap_or(HardSoftScore::ZERO)
        };
        score - old
    }

    pub fn reset(&mut self) {
        self.buckets.clear();
        self.booked.clear();
        self.lesson_key.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_index_add_remove() {
        let mut index: PairIndex<(usize, usize)> = PairIndex::default();
        index.add(0, (1, 1));
        index.add(3, (1, 1));
        index.add(5, (2, 2));
        assert_eq!(index.occupants(&(1, 1)), &[0, 3]);

        assert_eq!(index.remove(0), Some((1, 1)));
        assert_eq!(index.occupants(&(1, 1)), &[3]);
        // Double retract is a no-op.
        assert_eq!(index.remove(0), None);
        // Empty buckets are dropped.
        assert_eq!(index.remove(5), Some((2, 2)));
        assert!(index.occupants(&(2, 2)).is_empty());
    }

    #[test]
    fn aggregate_rebook_returns_net_delta() {
        let mut index: AggregateIndex<usize> = AggregateIndex::default();
        index.add(0, 7);
        let d1 = index.rebook(7, HardSoftScore::of_soft(-3));
        assert_eq!(d1, HardSoftScore::of_soft(-3));
        let d2 = index.rebook(7, HardSoftScore::of_soft(-5));
        assert_eq!(d2, HardSoftScore::of_soft(-2));
        let d3 = index.rebook(7, HardSoftScore::ZERO);
        assert_eq!(d3, HardSoftScore::of_soft(5));
    }
}
