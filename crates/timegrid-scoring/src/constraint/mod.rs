//! The constraint catalogue.
//!
//! Each rule of the timetabling problem is an [`IncrementalConstraint`]:
//! a full evaluator plus the retract/insert protocol that keeps its
//! internal indices in sync with single-lesson changes. Constraints are
//! combined into a [`ConstraintSet`] (the [`TimetableConstraints`] struct
//! for the standard catalogue, tuples for custom sets) so the whole
//! catalogue is monomorphized - no trait objects on the scoring hot path.

use std::collections::HashMap;
use std::hash::Hash;

use timegrid_config::ProblemConfig;
use timegrid_core::{HardSoftScore, Timetable};

use crate::analysis::{ConstraintAnalysis, ConstraintMatch};

#[macro_use]
mod macros;

mod adjacency;
mod calendar;
mod conflicts;
mod index;
mod labs;
mod placement;
mod workload;

pub use adjacency::{ConsecutiveLessons, CrossBlockTravel, PairedBatchSlots};
pub use calendar::{DepartmentBlockPreference, DepartmentWorkday};
pub use conflicts::{RoomConflict, StudentGroupConflict, TeacherConflict};
pub use labs::{CoreLabMismatch, CoreLabPriority};
pub use placement::{
    FullGroupSessionBatched, LabInTheoryRoom, LabInTheorySlot, OversizedLabUnbatched,
    RoomCapacity, TheoryInLabRoom, TheoryInLabSlot, UnassignedLesson,
};
pub use workload::{
    LateClass, TeacherDailyLoad, TeacherTimePreference, TeacherWeeklyHours, TeacherWorkdaySpan,
};

/// A single constraint with incremental scoring capability.
///
/// # Incremental protocol
///
/// 1. Call `initialize` once to populate internal indices.
/// 2. Before changing a lesson's planning variables: `on_retract`.
/// 3. After the change: `on_insert`.
/// 4. The two returned deltas keep a cached total exact.
///
/// All score contributions follow the penalty sign convention: violations
/// return negative scores, rewards positive ones.
pub trait IncrementalConstraint: Send + Sync {
    /// Constraint name shown in analysis output.
    fn name(&self) -> &'static str;

    /// True for feasibility (hard) constraints.
    fn is_hard(&self) -> bool {
        false
    }

    /// Full stateless evaluation over the whole solution.
    fn evaluate(&self, solution: &Timetable) -> HardSoftScore;

    /// Rebuilds internal indices from scratch; returns the total score.
    fn initialize(&mut self, solution: &Timetable) -> HardSoftScore;

    /// Called before a lesson's variables change, while the old values are
    /// still in place. Returns the delta that removes the lesson's
    /// contributions.
    fn on_retract(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore;

    /// Called after a lesson's variables changed. Returns the delta that
    /// adds the lesson's new contributions.
    fn on_insert(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore;

    /// Drops all internal state for a new solving session.
    fn reset(&mut self);

    /// Stateless violation listing with offending lesson ids.
    fn matches(&self, solution: &Timetable) -> Vec<ConstraintMatch>;
}

/// Result of evaluating a single constraint.
#[derive(Debug, Clone)]
pub struct ConstraintResult {
    pub name: &'static str,
    pub score: HardSoftScore,
    pub match_count: usize,
    pub is_hard: bool,
}

/// A set of constraints evaluated together.
///
/// Implemented for tuples of `IncrementalConstraint` (and for the
/// [`TimetableConstraints`] struct), keeping the whole catalogue fully
/// typed.
pub trait ConstraintSet: Send + Sync {
    fn evaluate_all(&self, solution: &Timetable) -> HardSoftScore;

    fn constraint_count(&self) -> usize;

    fn evaluate_each(&self, solution: &Timetable) -> Vec<ConstraintResult>;

    fn analyze(&self, solution: &Timetable) -> Vec<ConstraintAnalysis>;

    fn initialize_all(&mut self, solution: &Timetable) -> HardSoftScore;

    fn on_retract_all(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore;

    fn on_insert_all(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore;

    fn reset_all(&mut self);
}

impl ConstraintSet for () {
    #[inline]
    fn evaluate_all(&self, _solution: &Timetable) -> HardSoftScore {
        HardSoftScore::ZERO
    }

    #[inline]
    fn constraint_count(&self) -> usize {
        0
    }

    #[inline]
    fn evaluate_each(&self, _solution: &Timetable) -> Vec<ConstraintResult> {
        Vec::new()
    }

    #[inline]
    fn analyze(&self, _solution: &Timetable) -> Vec<ConstraintAnalysis> {
        Vec::new()
    }

    #[inline]
    fn initialize_all(&mut self, _solution: &Timetable) -> HardSoftScore {
        HardSoftScore::ZERO
    }

    #[inline]
    fn on_retract_all(&mut self, _solution: &Timetable, _lesson: usize) -> HardSoftScore {
        HardSoftScore::ZERO
    }

    #[inline]
    fn on_insert_all(&mut self, _solution: &Timetable, _lesson: usize) -> HardSoftScore {
        HardSoftScore::ZERO
    }

    #[inline]
    fn reset_all(&mut self) {}
}

macro_rules! impl_constraint_set_for_tuple {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> ConstraintSet for ($($T,)+)
        where
            $($T: IncrementalConstraint,)+
        {
            #[inline]
            fn evaluate_all(&self, solution: &Timetable) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$idx.evaluate(solution);)+
                total
            }

            #[inline]
            fn constraint_count(&self) -> usize {
                let mut count = 0;
                $(let _ = &self.$idx; count += 1;)+
                count
            }

            fn evaluate_each(&self, solution: &Timetable) -> Vec<ConstraintResult> {
                vec![$(ConstraintResult {
                    name: self.$idx.name(),
                    score: self.$idx.evaluate(solution),
                    match_count: self.$idx.matches(solution).len(),
                    is_hard: self.$idx.is_hard(),
                }),+]
            }

            fn analyze(&self, solution: &Timetable) -> Vec<ConstraintAnalysis> {
                vec![$(ConstraintAnalysis {
                    name: self.$idx.name(),
                    hard: self.$idx.is_hard(),
                    score: self.$idx.evaluate(solution),
                    matches: self.$idx.matches(solution),
                }),+]
            }

            #[inline]
            fn initialize_all(&mut self, solution: &Timetable) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$idx.initialize(solution);)+
                total
            }

            #[inline]
            fn on_retract_all(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$idx.on_retract(solution, lesson);)+
                total
            }

            #[inline]
            fn on_insert_all(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$idx.on_insert(solution, lesson);)+
                total
            }

            #[inline]
            fn reset_all(&mut self) {
                $(self.$idx.reset();)+
            }
        }
    };
}

impl_constraint_set_for_tuple!(0: C0);
impl_constraint_set_for_tuple!(0: C0, 1: C1);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10, 11: C11);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10, 11: C11, 12: C12);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10, 11: C11, 12: C12, 13: C13);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10, 11: C11, 12: C12, 13: C13, 14: C14);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10, 11: C11, 12: C12, 13: C13, 14: C14, 15: C15);

macro_rules! impl_constraint_set_for_fields {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl ConstraintSet for $ty {
            #[inline]
            fn evaluate_all(&self, solution: &Timetable) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$field.evaluate(solution);)+
                total
            }

            #[inline]
            fn constraint_count(&self) -> usize {
                let mut count = 0;
                $(let _ = &self.$field; count += 1;)+
                count
            }

            fn evaluate_each(&self, solution: &Timetable) -> Vec<ConstraintResult> {
                vec![$(ConstraintResult {
                    name: self.$field.name(),
                    score: self.$field.evaluate(solution),
                    match_count: self.$field.matches(solution).len(),
                    is_hard: self.$field.is_hard(),
                }),+]
            }

            fn analyze(&self, solution: &Timetable) -> Vec<ConstraintAnalysis> {
                vec![$(ConstraintAnalysis {
                    name: self.$field.name(),
                    hard: self.$field.is_hard(),
                    score: self.$field.evaluate(solution),
                    matches: self.$field.matches(solution),
                }),+]
            }

            #[inline]
            fn initialize_all(&mut self, solution: &Timetable) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$field.initialize(solution);)+
                total
            }

            #[inline]
            fn on_retract_all(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$field.on_retract(solution, lesson);)+
                total
            }

            #[inline]
            fn on_insert_all(&mut self, solution: &Timetable, lesson: usize) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total = total + self.$field.on_insert(solution, lesson);)+
                total
            }

            #[inline]
            fn reset_all(&mut self) {
                $(self.$field.reset();)+
            }
        }
    };
}

/// The full standard catalogue, one field per constraint.
///
/// A struct rather than a tuple so the whole set stays `Clone` (worker
/// replicas) at this arity while remaining fully monomorphized.
#[derive(Clone)]
pub struct TimetableConstraints {
    pub room_conflict: RoomConflict,
    pub teacher_conflict: TeacherConflict,
    pub student_group_conflict: StudentGroupConflict,
    pub room_capacity: RoomCapacity,
    pub lab_in_theory_room: LabInTheoryRoom,
    pub theory_in_lab_room: TheoryInLabRoom,
    pub lab_in_theory_slot: LabInTheorySlot,
    pub theory_in_lab_slot: TheoryInLabSlot,
    pub full_group_session_batched: FullGroupSessionBatched,
    pub oversized_lab_unbatched: OversizedLabUnbatched,
    pub unassigned_lesson: UnassignedLesson,
    pub core_lab_mismatch: CoreLabMismatch,
    pub core_lab_priority: CoreLabPriority,
    pub teacher_weekly_hours: TeacherWeeklyHours,
    pub teacher_workday_span: TeacherWorkdaySpan,
    pub teacher_daily_load: TeacherDailyLoad,
    pub teacher_time_preference: TeacherTimePreference,
    pub late_class: LateClass,
    pub cross_block_travel: CrossBlockTravel,
    pub consecutive_lessons: ConsecutiveLessons,
    pub paired_batch_slots: PairedBatchSlots,
    pub department_workday: DepartmentWorkday,
    pub department_block_preference: DepartmentBlockPreference,
}

impl_constraint_set_for_fields!(TimetableConstraints {
    room_conflict,
    teacher_conflict,
    student_group_conflict,
    room_capacity,
    lab_in_theory_room,
    theory_in_lab_room,
    lab_in_theory_slot,
    theory_in_lab_slot,
    full_group_session_batched,
    oversized_lab_unbatched,
    unassigned_lesson,
    core_lab_mismatch,
    core_lab_priority,
    teacher_weekly_hours,
    teacher_workday_span,
    teacher_daily_load,
    teacher_time_preference,
    late_class,
    cross_block_travel,
    consecutive_lessons,
    paired_batch_slots,
    department_workday,
    department_block_preference,
});

/// Builds the standard catalogue against the given lookup tables.
pub fn standard_catalogue(config: &ProblemConfig) -> TimetableConstraints {
    TimetableConstraints {
        room_conflict: RoomConflict::new(),
        teacher_conflict: TeacherConflict::new(),
        student_group_conflict: StudentGroupConflict::new(),
        room_capacity: RoomCapacity::new(&config.batching),
        lab_in_theory_room: LabInTheoryRoom::new(),
        theory_in_lab_room: TheoryInLabRoom::new(),
        lab_in_theory_slot: LabInTheorySlot::new(),
        theory_in_lab_slot: TheoryInLabSlot::new(),
        full_group_session_batched: FullGroupSessionBatched::new(),
        oversized_lab_unbatched: OversizedLabUnbatched::new(&config.batching),
        unassigned_lesson: UnassignedLesson::new(),
        core_lab_mismatch: CoreLabMismatch::new(&config.priority_labs),
        core_lab_priority: CoreLabPriority::new(&config.priority_labs),
        teacher_weekly_hours: TeacherWeeklyHours::new(),
        teacher_workday_span: TeacherWorkdaySpan::new(),
        teacher_daily_load: TeacherDailyLoad::new(),
        teacher_time_preference: TeacherTimePreference::new(),
        late_class: LateClass::new(),
        cross_block_travel: CrossBlockTravel::new(),
        consecutive_lessons: ConsecutiveLessons::new(),
        paired_batch_slots: PairedBatchSlots::new(),
        department_workday: DepartmentWorkday::new(&config.workdays),
        department_block_preference: DepartmentBlockPreference::new(&config.blocks),
    }
}

/// Stateless pairwise total: groups lessons by key and sums the pair
/// scores within each bucket.
pub(crate) fn pair_total<K, FK, FS>(
    solution: &Timetable,
    key_of: FK,
    pair_score: FS,
) -> HardSoftScore
where
    K: Eq + Hash,
    FK: Fn(&Timetable, usize) -> Option<K>,
    FS: Fn(&Timetable, usize, usize) -> HardSoftScore,
{
    let mut total = HardSoftScore::ZERO;
    for_each_pair(solution, key_of, |a, b| {
        total = total + pair_score(solution, a, b);
    });
    total
}

/// Stateless pairwise matches with nonzero contribution.
pub(crate) fn pair_matches<K, FK, FS>(
    solution: &Timetable,
    key_of: FK,
    pair_score: FS,
) -> Vec<ConstraintMatch>
where
    K: Eq + Hash,
    FK: Fn(&Timetable, usize) -> Option<K>,
    FS: Fn(&Timetable, usize, usize) -> HardSoftScore,
{
    let mut found = Vec::new();
    for_each_pair(solution, key_of, |a, b| {
        let score = pair_score(solution, a, b);
        if score != HardSoftScore::ZERO {
            found.push(ConstraintMatch::of(
                vec![
                    solution.lessons[a].id().to_string(),
                    solution.lessons[b].id().to_string(),
                ],
                score,
            ));
        }
    });
    found
}

fn for_each_pair<K, FK, F>(solution: &Timetable, key_of: FK, mut visit: F)
where
    K: Eq + Hash,
    FK: Fn(&Timetable, usize) -> Option<K>,
    F: FnMut(usize, usize),
{
    let mut buckets: HashMap<K, Vec<usize>> = HashMap::new();
    for lesson in 0..solution.lessons.len() {
        if let Some(key) = key_of(solution, lesson) {
            buckets.entry(key).or_default().push(lesson);
        }
    }
    for members in buckets.values() {
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                visit(members[i], members[j]);
            }
        }
    }
}

/// Stateless aggregate total: groups lessons by key and applies the key
/// penalty to every bucket.
pub(crate) fn aggregate_total<K, FK, FP>(
    solution: &Timetable,
    key_of: FK,
    key_penalty: FP,
) -> HardSoftScore
where
    K: Eq + Hash,
    FK: Fn(&Timetable, usize) -> Option<K>,
    FP: Fn(&Timetable, &[usize]) -> HardSoftScore,
{
    group_by_key(solution, key_of)
        .values()
        .map(|members| key_penalty(solution, members))
        .sum()
}

/// Stateless aggregate matches: one match per key with nonzero penalty,
/// listing every member lesson.
pub(crate) fn aggregate_matches<K, FK, FP>(
    solution: &Timetable,
    key_of: FK,
    key_penalty: FP,
) -> Vec<ConstraintMatch>
where
    K: Eq + Hash,
    FK: Fn(&Timetable, usize) -> Option<K>,
    FP: Fn(&Timetable, &[usize]) -> HardSoftScore,
{
    let mut found = Vec::new();
    for members in group_by_key(solution, key_of).values() {
        let score = key_penalty(solution, members);
        if score != HardSoftScore::ZERO {
            found.push(ConstraintMatch::of(
                members
                    .iter()
                    .map(|&l| solution.lessons[l].id().to_string())
                    .collect(),
                score,
            ));
        }
    }
    found
}

fn group_by_key<K, FK>(solution: &Timetable, key_of: FK) -> HashMap<K, Vec<usize>>
where
    K: Eq + Hash,
    FK: Fn(&Timetable, usize) -> Option<K>,
{
    let mut buckets: HashMap<K, Vec<usize>> = HashMap::new();
    for lesson in 0..solution.lessons.len() {
        if let Some(key) = key_of(solution, lesson) {
            buckets.entry(key).or_default().push(lesson);
        }
    }
    buckets
}
