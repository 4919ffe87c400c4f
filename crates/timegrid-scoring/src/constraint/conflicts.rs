//! Conflict-class hard constraints: room, teacher and student-group
//! double-booking.
//!
//! All three are pairwise constraints backed by bucket indices, so a move
//! only rescores the buckets it touches.

use chrono::Weekday;
use timegrid_core::{HardSoftScore, Lesson, Timetable};

use super::index::PairIndex;

/// Two lessons may not occupy the same room in the same time slot.
#[derive(Debug, Clone, Default)]
pub struct RoomConflict {
    index: PairIndex<(usize, usize)>,
}

impl RoomConflict {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, usize)> {
        let l = &solution.lessons[lesson];
        Some((l.room?, l.slot?))
    }

    fn pair_score(&self, _solution: &Timetable, _a: usize, _b: usize) -> HardSoftScore {
        // Same room, same slot by bucket construction.
        -HardSoftScore::ONE_HARD
    }
}

impl_pair_constraint!(RoomConflict, "Room conflict", hard);

/// A teacher cannot give two lessons at overlapping times on the same day.
#[derive(Debug, Clone, Default)]
pub struct TeacherConflict {
    index: PairIndex<(usize, Weekday)>,
}

impl TeacherConflict {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, Weekday)> {
        let l = &solution.lessons[lesson];
        let slot = &solution.slots[l.slot?];
        Some((l.teacher(), slot.day))
    }

    fn pair_score(&self, solution: &Timetable, a: usize, b: usize) -> HardSoftScore {
        let (Some(sa), Some(sb)) = (
            solution.slot_of(&solution.lessons[a]),
            solution.slot_of(&solution.lessons[b]),
        ) else {
            return HardSoftScore::ZERO;
        };
        if sa.overlaps(sb) {
            -HardSoftScore::ONE_HARD
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_pair_constraint!(TeacherConflict, "Teacher conflict", hard);

/// A student group cannot attend two lessons at overlapping times, unless
/// the lessons are labs for different batches of the group.
#[derive(Debug, Clone, Default)]
pub struct StudentGroupConflict {
    index: PairIndex<(usize, Weekday)>,
}

impl StudentGroupConflict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two full-group lessons always clash; a full-group lesson clashes
    /// with any batch; two batched labs clash only for the same batch.
    fn batches_clash(a: &Lesson, b: &Lesson) -> bool {
        match (a.lab_batch(), b.lab_batch()) {
            (Some(x), Some(y)) => x == y,
            _ => true,
        }
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, Weekday)> {
        let l = &solution.lessons[lesson];
        let slot = &solution.slots[l.slot?];
        Some((l.group(), slot.day))
    }

    fn pair_score(&self, solution: &Timetable, a: usize, b: usize) -> HardSoftScore {
        let (la, lb) = (&solution.lessons[a], &solution.lessons[b]);
        let (Some(sa), Some(sb)) = (solution.slot_of(la), solution.slot_of(lb)) else {
            return HardSoftScore::ZERO;
        };
        if sa.overlaps(sb) && Self::batches_clash(la, lb) {
            -HardSoftScore::ONE_HARD
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_pair_constraint!(StudentGroupConflict, "Student group conflict", hard);

#[cfg(test)]
mod tests {
    use timegrid_core::{LabBatch, SessionType};

    use super::*;
    use crate::constraint::IncrementalConstraint;
    use crate::test_utils::*;

    /// Two lessons for teacher T, same day, 9:00-9:50 and 9:30-10:20 in
    /// different rooms: the teacher conflict fires once, the room conflict
    /// not at all.
    #[test]
    fn overlapping_teacher_slots() {
        let mut solution = fixture();
        // slot 0 = Mon 9:00-9:50, slot 1 = Mon 9:30-10:20 (rooms 0 and 1)
        solution.lessons[0].room = Some(0);
        solution.lessons[0].slot = Some(0);
        solution.lessons[1].room = Some(1);
        solution.lessons[1].slot = Some(1);

        let teacher_conflict = TeacherConflict::new();
        assert_eq!(
            teacher_conflict.evaluate(&solution),
            HardSoftScore::of_hard(-1)
        );
        let room_conflict = RoomConflict::new();
        assert_eq!(room_conflict.evaluate(&solution), HardSoftScore::ZERO);
    }

    #[test]
    fn same_room_same_slot_fires_room_conflict() {
        let mut solution = fixture();
        solution.lessons[0].room = Some(0);
        solution.lessons[0].slot = Some(0);
        solution.lessons[1].room = Some(0);
        solution.lessons[1].slot = Some(0);

        let room_conflict = RoomConflict::new();
        assert_eq!(room_conflict.evaluate(&solution), HardSoftScore::of_hard(-1));
    }

    #[test]
    fn teacher_conflict_ignores_other_days() {
        let mut solution = fixture();
        // slot 0 = Mon 9:00, slot 3 = Tue 9:00
        solution.lessons[0].room = Some(0);
        solution.lessons[0].slot = Some(0);
        solution.lessons[1].room = Some(1);
        solution.lessons[1].slot = Some(3);

        let teacher_conflict = TeacherConflict::new();
        assert_eq!(teacher_conflict.evaluate(&solution), HardSoftScore::ZERO);
    }

    #[test]
    fn batch_compatibility_filter() {
        let mut solution = fixture_with_batched_labs();
        // Lessons 0/1 are B1/B2 labs of the same group, 2 is a full-group
        // lecture for that group. Lab slots 4 and 4 (same), lecture overlaps.
        let b1 = 0;
        let b2 = 1;
        let lecture = 2;
        solution.lessons[b1].room = Some(2);
        solution.lessons[b1].slot = Some(4);
        solution.lessons[b2].room = Some(3);
        solution.lessons[b2].slot = Some(4);

        let group_conflict = StudentGroupConflict::new();
        // B1 vs B2 in the same slot: allowed.
        assert_eq!(group_conflict.evaluate(&solution), HardSoftScore::ZERO);

        // A full-group lecture overlapping the labs clashes with both.
        solution.lessons[lecture].room = Some(0);
        solution.lessons[lecture].slot = Some(0); // Mon 9:00 overlaps lab slot 4
        assert_eq!(
            group_conflict.evaluate(&solution),
            HardSoftScore::of_hard(-2)
        );

        // Same batch in overlapping slots clashes.
        solution.lessons[lecture].slot = None;
        solution.lessons[lecture].room = None;
        let mut same_batch = solution.clone();
        set_batch_for_test(&mut same_batch, b2, LabBatch::B1);
        assert_eq!(
            group_conflict.evaluate(&same_batch),
            HardSoftScore::of_hard(-1)
        );
    }

    #[test]
    fn incremental_matches_full_evaluation() {
        let mut solution = fixture();
        let mut constraint = TeacherConflict::new();
        let mut cached = constraint.initialize(&solution);
        assert_eq!(cached, HardSoftScore::ZERO);

        // Assign both lessons into overlapping slots via the protocol.
        for (lesson, slot) in [(0usize, 0usize), (1, 1)] {
            cached = cached + constraint.on_retract(&solution, lesson);
            solution.lessons[lesson].room = Some(lesson);
            solution.lessons[lesson].slot = Some(slot);
            cached = cached + constraint.on_insert(&solution, lesson);
        }
        assert_eq!(cached, constraint.evaluate(&solution));
        assert_eq!(cached, HardSoftScore::of_hard(-1));

        // Move lesson 1 to another day and the conflict clears.
        cached = cached + constraint.on_retract(&solution, 1);
        solution.lessons[1].slot = Some(3);
        cached = cached + constraint.on_insert(&solution, 1);
        assert_eq!(cached, constraint.evaluate(&solution));
        assert_eq!(cached, HardSoftScore::ZERO);
    }

    #[test]
    fn matches_report_offending_lessons() {
        let mut solution = fixture();
        solution.lessons[0].room = Some(0);
        solution.lessons[0].slot = Some(0);
        solution.lessons[1].room = Some(0);
        solution.lessons[1].slot = Some(0);

        let room_conflict = RoomConflict::new();
        let matches = room_conflict.matches(&solution);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].lessons.len(), 2);
        assert_eq!(matches[0].score, HardSoftScore::of_hard(-1));
    }

    /// The session type lives behind a constructor invariant, so flipping a
    /// batch for a test means rebuilding the lesson.
    fn set_batch_for_test(solution: &mut Timetable, lesson: usize, batch: LabBatch) {
        let old = &solution.lessons[lesson];
        let mut rebuilt = timegrid_core::Lesson::new(
            old.id().to_string(),
            old.teacher(),
            old.course(),
            old.group(),
            SessionType::Lab,
            Some(batch),
        )
        .unwrap();
        rebuilt.room = old.room;
        rebuilt.slot = old.slot;
        solution.lessons[lesson] = rebuilt;
    }
}
