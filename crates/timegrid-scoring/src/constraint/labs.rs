//! Priority-lab constraints for core courses.
//!
//! Courses in the course→priority-lab mapping must run their labs in one
//! of their designated rooms; within the list, earlier ranks are
//! preferred. Unmapped courses are exempt from both rules.

use std::sync::Arc;

use timegrid_config::PriorityLabs;
use timegrid_core::{HardSoftScore, Timetable};

use super::index::LessonScores;

/// Off-list assignments are punished severely enough to dominate every
/// other soft concern.
const OFF_LIST_PENALTY: i64 = 1000;

/// A mapped course's lab lands in a room outside its priority list.
#[derive(Debug, Clone)]
pub struct CoreLabMismatch {
    labs: Arc<PriorityLabs>,
    state: LessonScores,
}

impl CoreLabMismatch {
    pub fn new(labs: &PriorityLabs) -> Self {
        CoreLabMismatch {
            labs: Arc::new(labs.clone()),
            state: LessonScores::default(),
        }
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        if !l.requires_lab_room() {
            return HardSoftScore::ZERO;
        }
        let Some(room) = solution.room_of(l) else {
            return HardSoftScore::ZERO;
        };
        let code = &solution.course_of(l).code;
        if self.labs.is_mapped(code) && self.labs.rank_of(code, &room.name).is_none() {
            HardSoftScore::of_soft(-OFF_LIST_PENALTY)
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_uni_constraint!(CoreLabMismatch, "Core lab mapping", soft);

/// Within the priority list, rank k costs k-1 soft points, steering labs
/// toward the most preferred room.
#[derive(Debug, Clone)]
pub struct CoreLabPriority {
    labs: Arc<PriorityLabs>,
    state: LessonScores,
}

impl CoreLabPriority {
    pub fn new(labs: &PriorityLabs) -> Self {
        CoreLabPriority {
            labs: Arc::new(labs.clone()),
            state: LessonScores::default(),
        }
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        if !l.requires_lab_room() {
            return HardSoftScore::ZERO;
        }
        let Some(room) = solution.room_of(l) else {
            return HardSoftScore::ZERO;
        };
        let code = &solution.course_of(l).code;
        match self.labs.rank_of(code, &room.name) {
            Some(rank) => HardSoftScore::of_soft(-(rank as i64 - 1)),
            None => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(CoreLabPriority, "Core lab priority preference", soft);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::IncrementalConstraint;
    use crate::test_utils::*;

    /// CS301 prefers [Systems Lab, Networks Lab]. Rank 2 costs one soft
    /// point; the unlisted Robotics Lab costs the off-list penalty.
    #[test]
    fn rank_and_mismatch_penalties() {
        let config = campus_config();
        let mismatch = CoreLabMismatch::new(&config.priority_labs);
        let priority = CoreLabPriority::new(&config.priority_labs);

        let mut solution = fixture_with_batched_labs();
        solution.lessons[0].slot = Some(4);

        // Rank 1: no penalty at all.
        solution.lessons[0].room = Some(2);
        assert_eq!(mismatch.evaluate(&solution), HardSoftScore::ZERO);
        assert_eq!(priority.evaluate(&solution), HardSoftScore::ZERO);

        // Rank 2: one soft point.
        solution.lessons[0].room = Some(3);
        assert_eq!(mismatch.evaluate(&solution), HardSoftScore::ZERO);
        assert_eq!(priority.evaluate(&solution), HardSoftScore::of_soft(-1));

        // Off-list room: the severe penalty, and no rank charge.
        solution.lessons[0].room = Some(4);
        assert_eq!(mismatch.evaluate(&solution), HardSoftScore::of_soft(-1000));
        assert_eq!(priority.evaluate(&solution), HardSoftScore::ZERO);
    }

    #[test]
    fn unmapped_course_is_exempt() {
        let config = campus_config();
        let mismatch = CoreLabMismatch::new(&config.priority_labs);

        // ME101 has no mapping; any lab room is fine.
        let mut solution = build(vec![timegrid_core::Lesson::new(
            "ME-LAB-1",
            1,
            2,
            1,
            timegrid_core::SessionType::Lab,
            None,
        )
        .unwrap()]);
        solution.lessons[0].room = Some(4);
        solution.lessons[0].slot = Some(4);
        assert_eq!(mismatch.evaluate(&solution), HardSoftScore::ZERO);
    }

    #[test]
    fn theory_sessions_ignore_lab_mapping() {
        let config = campus_config();
        let mismatch = CoreLabMismatch::new(&config.priority_labs);

        let mut solution = fixture();
        solution.lessons[0].room = Some(4);
        solution.lessons[0].slot = Some(0);
        assert_eq!(mismatch.evaluate(&solution), HardSoftScore::ZERO);
    }
}
