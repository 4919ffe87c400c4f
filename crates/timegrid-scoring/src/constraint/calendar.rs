//! Department calendar constraints: allowed weekdays and block
//! preferences.

use std::sync::Arc;

use timegrid_config::{DepartmentBlocks, DepartmentWorkdays, WorkdaySeverity};
use timegrid_core::{HardSoftScore, Timetable};

use crate::analysis::ConstraintMatch;
use crate::constraint::IncrementalConstraint;

use super::index::LessonScores;

/// A lesson must land on one of its department's allowed weekdays.
///
/// Severity is configurable: the campus treats it as a hard rule, but the
/// table can be loaded with `severity = "soft"` to demote it.
#[derive(Debug, Clone)]
pub struct DepartmentWorkday {
    workdays: Arc<DepartmentWorkdays>,
    state: LessonScores,
}

impl DepartmentWorkday {
    pub fn new(workdays: &DepartmentWorkdays) -> Self {
        DepartmentWorkday {
            workdays: Arc::new(workdays.clone()),
            state: LessonScores::default(),
        }
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        let Some(slot) = solution.slot_of(l) else {
            return HardSoftScore::ZERO;
        };
        let department = &solution.group_of(l).department;
        if self.workdays.is_allowed(department, slot.day) {
            HardSoftScore::ZERO
        } else {
            match self.workdays.severity {
                WorkdaySeverity::Hard => -HardSoftScore::ONE_HARD,
                WorkdaySeverity::Soft => -HardSoftScore::ONE_SOFT,
            }
        }
    }
}

// Hand-rolled impl because `is_hard` follows the configured severity.
impl IncrementalConstraint for DepartmentWorkday {
    fn name(&self) -> &'static str {
        "Department workday violation"
    }

    fn is_hard(&self) -> bool {
        self.workdays.severity == WorkdaySeverity::Hard
    }

    fn evaluate(&self, solution: &Timetable) -> HardSoftScore {
        (0..solution.lessons.len())
            .map(|l| self.penalty(solution, l))
            .sum()
    }

    fn initialize(&mut self, solution: &Timetable) -> HardSoftScore {
        let scores: Vec<HardSoftScore> = (0..solution.lessons.len())
            .map(|l| self.penalty(solution, l))
            .collect();
        self.state.seed(scores)
    }

    fn on_retract(&mut self, _solution: &Timetable, lesson: usize) -> HardSoftScore {
        self.state.clear(lesson)
    }

    fn on_insert(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let score = self.penalty(solution, lesson);
        self.state.set(lesson, score)
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn matches(&self, solution: &Timetable) -> Vec<ConstraintMatch> {
        (0..solution.lessons.len())
            .filter_map(|l| {
                let score = self.penalty(solution, l);
                (score != HardSoftScore::ZERO).then(|| {
                    ConstraintMatch::of(vec![solution.lessons[l].id().to_string()], score)
                })
            })
            .collect()
    }
}

/// Theory and tutorial sessions should stay in the department's preferred
/// block to spare students the walk.
#[derive(Debug, Clone)]
pub struct DepartmentBlockPreference {
    blocks: Arc<DepartmentBlocks>,
    state: LessonScores,
}

impl DepartmentBlockPreference {
    pub fn new(blocks: &DepartmentBlocks) -> Self {
        DepartmentBlockPreference {
            blocks: Arc::new(blocks.clone()),
            state: LessonScores::default(),
        }
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        let l = &solution.lessons[lesson];
        if !l.requires_theory_room() {
            return HardSoftScore::ZERO;
        }
        let Some(room) = solution.room_of(l) else {
            return HardSoftScore::ZERO;
        };
        let department = &solution.group_of(l).department;
        match self.blocks.preferred_block(department) {
            Some(preferred) if !preferred.eq_ignore_ascii_case(&room.block) => {
                -HardSoftScore::ONE_SOFT
            }
            _ => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(DepartmentBlockPreference, "Department block preference", soft);
