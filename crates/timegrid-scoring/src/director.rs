//! Incremental score director.
//!
//! Owns the working timetable plus the constraint set, and keeps a cached
//! score exact through the retract → mutate → insert protocol. Cloning the
//! director yields an independent replica (solution, indices and cached
//! score), which is how the solver hands read-only evaluation work to its
//! worker pool.

use timegrid_core::{HardSoftScore, Timetable};

use crate::analysis::ScoreAnalysis;
use crate::constraint::ConstraintSet;

/// Drives incremental scoring over a working [`Timetable`].
///
/// # Example
///
/// ```ignore
/// let mut director = TimetableScoreDirector::new(problem, standard_catalogue(&config));
/// let score = director.calculate_score();
/// let new_score = director.do_change(lesson, |s| {
///     s.lessons[lesson].room = Some(room);
///     s.lessons[lesson].slot = Some(slot);
/// });
/// ```
#[derive(Clone)]
pub struct TimetableScoreDirector<C: ConstraintSet> {
    working: Timetable,
    constraints: C,
    cached_score: HardSoftScore,
    initialized: bool,
    full_assert: bool,
}

impl<C: ConstraintSet> TimetableScoreDirector<C> {
    /// Creates a director over a working solution.
    pub fn new(solution: Timetable, constraints: C) -> Self {
        TimetableScoreDirector {
            working: solution,
            constraints,
            cached_score: HardSoftScore::ZERO,
            initialized: false,
            full_assert: false,
        }
    }

    /// Cross-checks the incremental score against a from-scratch
    /// recalculation after every change. A divergence is a programming
    /// defect and asserts immediately; never enable outside tests and
    /// debugging runs.
    pub fn with_full_assert(mut self, full_assert: bool) -> Self {
        self.full_assert = full_assert;
        self
    }

    /// Returns the current score, initializing all constraint indices on
    /// first call. Stamps the score onto the working solution.
    pub fn calculate_score(&mut self) -> HardSoftScore {
        if !self.initialized {
            self.cached_score = self.constraints.initialize_all(&self.working);
            self.initialized = true;
        }
        self.working.score = Some(self.cached_score);
        self.cached_score
    }

    /// Returns the cached score without recalculation.
    #[inline]
    pub fn get_score(&self) -> HardSoftScore {
        self.cached_score
    }

    /// Called before a lesson's planning variables change.
    #[inline]
    pub fn before_variable_changed(&mut self, lesson: usize) {
        if !self.initialized {
            return;
        }
        let delta = self.constraints.on_retract_all(&self.working, lesson);
        self.cached_score = self.cached_score + delta;
    }

    /// Called after a lesson's planning variables changed.
    #[inline]
    pub fn after_variable_changed(&mut self, lesson: usize) {
        if !self.initialized {
            return;
        }
        let delta = self.constraints.on_insert_all(&self.working, lesson);
        self.cached_score = self.cached_score + delta;
        if self.full_assert {
            let fresh = self.constraints.evaluate_all(&self.working);
            assert_eq!(
                fresh, self.cached_score,
                "incremental score diverged from full rescore after lesson {lesson} changed"
            );
        }
    }

    /// Complete variable-change cycle: retract, apply, insert.
    #[inline]
    pub fn do_change<F>(&mut self, lesson: usize, change: F) -> HardSoftScore
    where
        F: FnOnce(&mut Timetable),
    {
        self.before_variable_changed(lesson);
        change(&mut self.working);
        self.after_variable_changed(lesson);
        self.cached_score
    }

    pub fn working(&self) -> &Timetable {
        &self.working
    }

    /// Direct mutable access; bypassing the change protocol requires a
    /// `reset` before the next score read.
    pub fn working_mut(&mut self) -> &mut Timetable {
        &mut self.working
    }

    /// Clones the working solution with the cached score stamped on.
    pub fn clone_working(&self) -> Timetable {
        let mut snapshot = self.working.clone();
        snapshot.score = Some(self.cached_score);
        snapshot
    }

    /// Consumes the director and returns the working solution.
    pub fn take_solution(mut self) -> Timetable {
        self.working.score = Some(self.cached_score);
        self.working
    }

    /// Per-constraint breakdown of the working solution, computed from
    /// scratch.
    pub fn analyze(&self) -> ScoreAnalysis {
        ScoreAnalysis {
            score: self.constraints.evaluate_all(&self.working),
            constraints: self.constraints.analyze(&self.working),
        }
    }

    pub fn constraints(&self) -> &C {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.constraint_count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drops all constraint state; the next `calculate_score` rebuilds it.
    pub fn reset(&mut self) {
        self.constraints.reset_all();
        self.initialized = false;
        self.cached_score = HardSoftScore::ZERO;
    }
}

impl<C: ConstraintSet> std::fmt::Debug for TimetableScoreDirector<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimetableScoreDirector")
            .field("initialized", &self.initialized)
            .field("cached_score", &self.cached_score)
            .field("constraint_count", &self.constraints.constraint_count())
            .finish()
    }
}
