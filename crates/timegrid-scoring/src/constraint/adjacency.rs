//! Adjacency-driven soft constraints: teacher travel, consecutive lessons
//! and paired lab batches.

use chrono::Weekday;
use timegrid_core::{HardSoftScore, Timetable};

use super::index::PairIndex;

const TRAVEL_PENALTY: i64 = 2;

/// A teacher with two back-to-back lessons in different blocks has to
/// cross the campus between classes.
#[derive(Debug, Clone, Default)]
pub struct CrossBlockTravel {
    index: PairIndex<(usize, Weekday)>,
}

impl CrossBlockTravel {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, Weekday)> {
        let l = &solution.lessons[lesson];
        l.room?;
        let slot = &solution.slots[l.slot?];
        Some((l.teacher(), slot.day))
    }

    fn pair_score(&self, solution: &Timetable, a: usize, b: usize) -> HardSoftScore {
        let (la, lb) = (&solution.lessons[a], &solution.lessons[b]);
        let (Some(sa), Some(sb)) = (solution.slot_of(la), solution.slot_of(lb)) else {
            return HardSoftScore::ZERO;
        };
        let (Some(ra), Some(rb)) = (solution.room_of(la), solution.room_of(lb)) else {
            return HardSoftScore::ZERO;
        };
        if sa.is_back_to_back(sb) && ra.block != rb.block {
            HardSoftScore::of_soft(-TRAVEL_PENALTY)
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_pair_constraint!(CrossBlockTravel, "Cross-block travel", soft);

/// Reward keeping a group's sessions of the same course adjacent on a day.
#[derive(Debug, Clone, Default)]
pub struct ConsecutiveLessons {
    index: PairIndex<(usize, usize, Weekday)>,
}

impl ConsecutiveLessons {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, usize, Weekday)> {
        let l = &solution.lessons[lesson];
        let slot = &solution.slots[l.slot?];
        Some((l.group(), l.course(), slot.day))
    }

    fn pair_score(&self, solution: &Timetable, a: usize, b: usize) -> HardSoftScore {
        let (Some(sa), Some(sb)) = (
            solution.slot_of(&solution.lessons[a]),
            solution.slot_of(&solution.lessons[b]),
        ) else {
            return HardSoftScore::ZERO;
        };
        if sa.is_back_to_back(sb) {
            HardSoftScore::ONE_SOFT
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_pair_constraint!(ConsecutiveLessons, "Prefer consecutive lessons", soft);

/// The B1 and B2 labs of the same course and group should share a slot so
/// the group is split, not staggered.
#[derive(Debug, Clone, Default)]
pub struct PairedBatchSlots {
    index: PairIndex<(usize, usize)>,
}

impl PairedBatchSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, usize)> {
        let l = &solution.lessons[lesson];
        if !l.is_split_batch() {
            return None;
        }
        l.slot?;
        Some((l.group(), l.course()))
    }

    fn pair_score(&self, solution: &Timetable, a: usize, b: usize) -> HardSoftScore {
        let (la, lb) = (&solution.lessons[a], &solution.lessons[b]);
        if la.lab_batch() != lb.lab_batch() && la.slot != lb.slot {
            -HardSoftScore::ONE_SOFT
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_pair_constraint!(PairedBatchSlots, "Paired lab batches in different slots", soft);
