//! Unary placement constraints: capacity, room/slot typing, batching rules
//! and the unassigned-lesson pressure.

use std::sync::Arc;

use timegrid_config::BatchingPolicy;
use timegrid_core::{HardSoftScore, Timetable};

use super::index::LessonScores;

/// A room must seat the lesson's required capacity; the penalty scales
/// with the seat shortfall.
#[derive(Debug, Clone)]
pub struct RoomCapacity {
    batching: Arc<BatchingPolicy>,
    state: LessonScores,
}

impl RoomCapacity {
    pub fn new(batching: &BatchingPolicy) -> Self {
        RoomCapacity {
            batching: Arc::new(batching.clone()),
            state: LessonScores::default(),
        }
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        let Some(room) = solution.room_of(l) else {
            return HardSoftScore::ZERO;
        };
        let required =
            l.required_capacity(solution.group_of(l).size, self.batching.lab_batch_size);
        if room.capacity < required {
            HardSoftScore::of_hard(-i64::from(required - room.capacity))
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_uni_constraint!(RoomCapacity, "Room capacity", hard);

/// Lab sessions belong in lab rooms.
#[derive(Debug, Clone, Default)]
pub struct LabInTheoryRoom {
    state: LessonScores,
}

impl LabInTheoryRoom {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        match solution.room_of(l) {
            Some(room) if l.requires_lab_room() && !room.is_lab => -HardSoftScore::ONE_HARD,
            _ => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(LabInTheoryRoom, "Lab in a theory room", hard);

/// Lecture/tutorial sessions must not squat in lab rooms.
#[derive(Debug, Clone, Default)]
pub struct TheoryInLabRoom {
    state: LessonScores,
}

impl TheoryInLabRoom {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        match solution.room_of(l) {
            Some(room) if l.requires_theory_room() && room.is_lab => -HardSoftScore::ONE_HARD,
            _ => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(TheoryInLabRoom, "Theory in a lab room", hard);

/// Lab sessions need the long lab slots.
#[derive(Debug, Clone, Default)]
pub struct LabInTheorySlot {
    state: LessonScores,
}

impl LabInTheorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        match solution.slot_of(l) {
            Some(slot) if l.requires_lab_room() && !slot.is_lab => -HardSoftScore::ONE_HARD,
            _ => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(LabInTheorySlot, "Lab in theory slot", hard);

/// Lecture/tutorial sessions must use the short theory slots.
#[derive(Debug, Clone, Default)]
pub struct TheoryInLabSlot {
    state: LessonScores,
}

impl TheoryInLabSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        match solution.slot_of(l) {
            Some(slot) if l.requires_theory_room() && slot.is_lab => -HardSoftScore::ONE_HARD,
            _ => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(TheoryInLabSlot, "Theory in lab slot", hard);

/// Lecture/tutorial sessions are always for the full group.
///
/// `Lesson::new` already rejects this combination; the constraint keeps
/// the rule visible in scoring for lessons produced by other means.
#[derive(Debug, Clone, Default)]
pub struct FullGroupSessionBatched {
    state: LessonScores,
}

impl FullGroupSessionBatched {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        if l.requires_theory_room() && l.is_split_batch() {
            -HardSoftScore::ONE_HARD
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_uni_constraint!(FullGroupSessionBatched, "Lecture/tutorial assigned to a batch", hard);

/// A lab for a group over the batch threshold must be split into batches,
/// unless the course is on the full-group exemption list.
#[derive(Debug, Clone)]
pub struct OversizedLabUnbatched {
    batching: Arc<BatchingPolicy>,
    state: LessonScores,
}

impl OversizedLabUnbatched {
    pub fn new(batching: &BatchingPolicy) -> Self {
        OversizedLabUnbatched {
            batching: Arc::new(batching.clone()),
            state: LessonScores::default(),
        }
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        if !l.requires_lab_room() || l.is_split_batch() {
            return HardSoftScore::ZERO;
        }
        let group = solution.group_of(l);
        if self.batching.must_batch(group.size)
            && !self.batching.is_exempt(&solution.course_of(l).code)
        {
            -HardSoftScore::ONE_HARD
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_uni_constraint!(OversizedLabUnbatched, "Lab for large group must be batched", hard);

/// Construction-time pressure: every lesson missing a room or slot costs a
/// hard point, so best-effort infeasible outputs are ordered sensibly.
/// Complete assignments contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct UnassignedLesson {
    state: LessonScores,
}

impl UnassignedLesson {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        if solution.lessons[lesson].is_assigned() {
            HardSoftScore::ZERO
        } else {
            -HardSoftScore::ONE_HARD
        }
    }
}

impl_uni_constraint!(UnassignedLesson, "Unassigned lesson", hard);
