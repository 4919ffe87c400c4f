//! Dual tabu / late-acceptance move acceptance.
//!
//! A candidate move passes when its target assignment is not in the tabu
//! window, OR when its score beats the late-acceptance threshold (the
//! step score from `size` steps ago). A move that would produce a new
//! global best is always accepted (aspiration), which keeps the tabu list
//! from ever hiding the next incumbent.

use std::collections::VecDeque;

use timegrid_config::LocalSearchSettings;
use timegrid_core::{HardSoftScore, Timetable};

use crate::moves::{ChangeMove, Move, SwapMove};

/// One remembered assignment: a lesson together with the (room, slot)
/// values it recently held or received.
type TabuEntry = (usize, Option<usize>, Option<usize>);

/// Fixed-recency tabu window over lesson assignments.
#[derive(Debug, Clone)]
pub struct AssignmentTabu {
    tenure: usize,
    window: VecDeque<TabuEntry>,
}

impl AssignmentTabu {
    pub fn new(tenure: usize) -> Self {
        AssignmentTabu {
            tenure,
            window: VecDeque::with_capacity(tenure + 1),
        }
    }

    pub fn is_tabu(&self, lesson: usize, room: Option<usize>, slot: Option<usize>) -> bool {
        self.window.contains(&(lesson, room, slot))
    }

    /// Marks an assignment as recently visited, dropping the oldest entry
    /// past the tenure.
    pub fn remember(&mut self, lesson: usize, room: Option<usize>, slot: Option<usize>) {
        if self.tenure == 0 {
            return;
        }
        self.window.push_back((lesson, room, slot));
        while self.window.len() > self.tenure {
            self.window.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

/// Circular buffer of step scores for the late-acceptance criterion.
#[derive(Debug, Clone)]
pub struct LateAcceptanceRing {
    history: Vec<HardSoftScore>,
    index: usize,
}

impl LateAcceptanceRing {
    pub fn new(size: usize, initial: HardSoftScore) -> Self {
        LateAcceptanceRing {
            history: vec![initial; size.max(1)],
            index: 0,
        }
    }

    /// The score from `size` steps ago.
    pub fn late_score(&self) -> HardSoftScore {
        self.history[self.index]
    }

    pub fn record(&mut self, step_score: HardSoftScore) {
        self.history[self.index] = step_score;
        self.index = (self.index + 1) % self.history.len();
    }
}

/// The combined acceptance criterion used by the local-search phase.
#[derive(Debug, Clone)]
pub struct MoveAcceptor {
    tabu: AssignmentTabu,
    late: LateAcceptanceRing,
    best_score: HardSoftScore,
}

impl MoveAcceptor {
    pub fn new(settings: &LocalSearchSettings, initial_score: HardSoftScore) -> Self {
        MoveAcceptor {
            tabu: AssignmentTabu::new(settings.tabu_tenure),
            late: LateAcceptanceRing::new(settings.late_acceptance_size, initial_score),
            best_score: initial_score,
        }
    }

    /// The assignments this move would (re)establish.
    fn target_assignments(solution: &Timetable, m: &Move) -> [Option<TabuEntry>; 2] {
        match *m {
            Move::Change(ChangeMove { lesson, room, slot }) => {
                [Some((lesson, room, slot)), None]
            }
            Move::Swap(SwapMove { a, b }) => {
                let (la, lb) = (&solution.lessons[a], &solution.lessons[b]);
                [Some((a, lb.room, lb.slot)), Some((b, la.room, la.slot))]
            }
        }
    }

    fn is_move_tabu(&self, solution: &Timetable, m: &Move) -> bool {
        Self::target_assignments(solution, m)
            .into_iter()
            .flatten()
            .any(|(lesson, room, slot)| self.tabu.is_tabu(lesson, room, slot))
    }

    /// Dual criterion: aspiration, then not-tabu OR late acceptance.
    pub fn is_accepted(&self, solution: &Timetable, m: &Move, move_score: HardSoftScore) -> bool {
        if move_score > self.best_score {
            return true;
        }
        !self.is_move_tabu(solution, m) || move_score >= self.late.late_score()
    }

    /// Books an applied step: records the step score, taboos the moved
    /// lessons' previous assignments, and tracks the global best.
    pub fn step_ended(&mut self, step_score: HardSoftScore, previous: &[TabuEntry]) {
        for &(lesson, room, slot) in previous {
            self.tabu.remember(lesson, room, slot);
        }
        self.late.record(step_score);
        if step_score > self.best_score {
            self.best_score = step_score;
        }
    }

    pub fn phase_ended(&mut self) {
        self.tabu.clear();
    }
}
