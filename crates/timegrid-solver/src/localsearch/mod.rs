//! Local-search phase.
//!
//! Each step samples a bounded neighborhood of change and swap moves,
//! evaluates the candidates in parallel against worker-local replicas of
//! the score director, then lets the driver apply the best accepted move
//! on the master state. Evaluation never mutates shared state: workers
//! own their scratch directors, and the master is only touched between
//! the fan-out barriers.

mod acceptor;

pub use acceptor::{AssignmentTabu, LateAcceptanceRing, MoveAcceptor};

use rand::Rng;
use rayon::prelude::*;
use timegrid_config::LocalSearchSettings;
use timegrid_core::HardSoftScore;
use timegrid_scoring::{ConstraintSet, TimetableScoreDirector};

use crate::moves::{ChangeMove, Move, SwapMove};
use crate::scope::SolverScope;
use crate::termination::CompositeTermination;
use crate::Phase;

pub struct LocalSearchPhase {
    settings: LocalSearchSettings,
    workers: usize,
    termination: CompositeTermination,
}

impl LocalSearchPhase {
    pub fn new(
        settings: LocalSearchSettings,
        workers: usize,
        termination: CompositeTermination,
    ) -> Self {
        LocalSearchPhase {
            settings,
            workers: workers.max(1),
            termination,
        }
    }

    /// Bounded random neighborhood: half reassignments, half swaps.
    fn sample_moves<C: ConstraintSet>(&self, scope: &mut SolverScope<C>) -> Vec<Move> {
        let solution = scope.working_solution();
        let lessons = solution.lessons.len();
        let rooms = solution.rooms.len();
        let slots = solution.slots.len();
        if lessons == 0 || rooms == 0 || slots == 0 {
            return Vec::new();
        }

        let sample_size = self.settings.sample_size.max(1);
        let rng = scope.rng();
        let mut moves = Vec::with_capacity(sample_size);
        for i in 0..sample_size {
            if i % 2 == 1 && lessons >= 2 {
                let a = rng.random_range(0..lessons);
                let b = rng.random_range(0..lessons);
                moves.push(Move::Swap(SwapMove::new(a, b)));
            } else {
                let lesson = rng.random_range(0..lessons);
                let room = rng.random_range(0..rooms);
                let slot = rng.random_range(0..slots);
                moves.push(Move::Change(ChangeMove::new(lesson, Some(room), Some(slot))));
            }
        }
        moves
    }
}

impl<C: ConstraintSet + Clone> Phase<C> for LocalSearchPhase {
    fn solve(&mut self, scope: &mut SolverScope<C>) {
        let initial_score = scope.calculate_score();
        scope.update_best_solution();
        let mut acceptor = MoveAcceptor::new(&self.settings, initial_score);
        tracing::debug!(score = %initial_score, workers = self.workers, "local search started");

        loop {
            // Termination is polled once per outer step; an in-flight step
            // always completes before the loop halts.
            if self.termination.should_terminate(scope) {
                break;
            }

            let moves = self.sample_moves(scope);
            if moves.is_empty() {
                break;
            }
            let evaluated = evaluate_moves(scope.director(), &moves, self.workers);

            let mut selected: Option<(Move, HardSoftScore)> = None;
            for &(m, score) in &evaluated {
                if !acceptor.is_accepted(scope.working_solution(), &m, score) {
                    continue;
                }
                let better = match selected {
                    None => true,
                    Some((_, best)) => score > best,
                };
                if better {
                    selected = Some((m, score));
                }
            }

            scope.increment_step_count();
            let Some((m, step_score)) = selected else {
                // Every sampled move was tabu and under the late
                // threshold; resample next step.
                continue;
            };

            let previous: Vec<(usize, Option<usize>, Option<usize>)> = m
                .lessons()
                .map(|l| {
                    let lesson = &scope.working_solution().lessons[l];
                    (l, lesson.room, lesson.slot)
                })
                .collect();
            let applied_score = m.apply(scope.director_mut());
            debug_assert_eq!(applied_score, step_score);

            acceptor.step_ended(step_score, &previous);
            scope.update_best_solution();

            if scope.step_count() % 1000 == 0 {
                tracing::debug!(
                    step = scope.step_count(),
                    score = %step_score,
                    best = %scope.best_score().unwrap_or(step_score),
                    "local search progress"
                );
            }
        }

        acceptor.phase_ended();
        tracing::debug!(
            steps = scope.step_count(),
            best = ?scope.best_score(),
            "local search finished"
        );
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}

/// Evaluates candidate moves and returns (move, resulting score) pairs.
///
/// Candidates are split into one slice per worker; every worker clones the
/// master director once per step and probes its slice by apply/undo on the
/// private replica. The master itself is never touched here.
fn evaluate_moves<C: ConstraintSet + Clone>(
    master: &TimetableScoreDirector<C>,
    moves: &[Move],
    workers: usize,
) -> Vec<(Move, HardSoftScore)> {
    let doable: Vec<Move> = moves
        .iter()
        .copied()
        .filter(|m| m.is_doable(master.working()))
        .collect();
    if doable.is_empty() {
        return Vec::new();
    }

    if workers <= 1 || doable.len() == 1 {
        let mut scratch = master.clone();
        return doable
            .into_iter()
            .map(|m| {
                let score = probe(&mut scratch, m);
                (m, score)
            })
            .collect();
    }

    let chunk_size = doable.len().div_ceil(workers);
    doable
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut scratch = master.clone();
            chunk
                .iter()
                .map(|&m| {
                    let score = probe(&mut scratch, m);
                    (m, score)
                })
                .collect::<Vec<_>>()
        })
        .reduce(Vec::new, |mut acc, mut part| {
            acc.append(&mut part);
            acc
        })
}

/// Applies the move on the scratch replica, reads the score, undoes it.
fn probe<C: ConstraintSet>(scratch: &mut TimetableScoreDirector<C>, m: Move) -> HardSoftScore {
    let inverse = m.inverse(scratch.working());
    let score = m.apply(scratch);
    inverse.apply(scratch);
    score
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use timegrid_scoring::standard_catalogue;

    use super::*;
    use crate::construction::ConstructionHeuristic;
    use crate::termination::TerminationCondition;
    use crate::test_utils::{campus_config, lab_problem};

    fn solved_scope(
        steps: u64,
        workers: usize,
    ) -> SolverScope<timegrid_scoring::TimetableConstraints> {
        let config = campus_config();
        let director =
            TimetableScoreDirector::new(lab_problem(), standard_catalogue(&config));
        let mut scope = SolverScope::with_seed(director, 99);
        scope.start_solving();
        let mut construction = ConstructionHeuristic::new(&config);
        Phase::solve(&mut construction, &mut scope);

        let mut phase = LocalSearchPhase::new(
            LocalSearchSettings {
                tabu_tenure: 5,
                late_acceptance_size: 50,
                sample_size: 64,
            },
            workers,
            CompositeTermination::new(vec![
                TerminationCondition::StepCount(steps),
                TerminationCondition::TimeSpent(Duration::from_secs(10)),
            ]),
        );
        Phase::solve(&mut phase, &mut scope);
        scope
    }

    #[test]
    fn search_does_not_regress_the_incumbent() {
        let config = campus_config();
        let director =
            TimetableScoreDirector::new(lab_problem(), standard_catalogue(&config));
        let mut scope = SolverScope::with_seed(director, 99);
        scope.start_solving();
        let mut construction = ConstructionHeuristic::new(&config);
        Phase::solve(&mut construction, &mut scope);
        let construction_best = scope.best_score().unwrap();

        let mut phase = LocalSearchPhase::new(
            LocalSearchSettings {
                tabu_tenure: 5,
                late_acceptance_size: 50,
                sample_size: 64,
            },
            1,
            CompositeTermination::new(vec![TerminationCondition::StepCount(120)]),
        );
        Phase::solve(&mut phase, &mut scope);

        // The incumbent is lexicographically non-worsening even though the
        // exploration state may wander below it.
        assert!(scope.best_score().unwrap() >= construction_best);
        assert!(scope.best_solution().unwrap().is_fully_assigned());
    }

    #[test]
    fn parallel_and_sequential_agree_on_evaluation() {
        let config = campus_config();
        let mut director =
            TimetableScoreDirector::new(lab_problem(), standard_catalogue(&config));
        director.calculate_score();

        let moves: Vec<Move> = (0..lab_problem().lessons.len())
            .map(|l| Move::Change(ChangeMove::new(l, Some(0), Some(0))))
            .collect();
        let mut sequential = evaluate_moves(&director, &moves, 1);
        let mut parallel = evaluate_moves(&director, &moves, 4);
        sequential.sort_by_key(|&(m, _)| format!("{m:?}"));
        parallel.sort_by_key(|&(m, _)| format!("{m:?}"));
        assert_eq!(sequential.len(), parallel.len());
        for ((ma, sa), (mb, sb)) in sequential.iter().zip(parallel.iter()) {
            assert_eq!(ma, mb);
            assert_eq!(sa, sb);
        }
    }

    #[test]
    fn probing_leaves_the_master_untouched() {
        let config = campus_config();
        let mut director =
            TimetableScoreDirector::new(lab_problem(), standard_catalogue(&config));
        let before = director.calculate_score();
        let snapshot = director.working().clone();

        let moves = vec![
            Move::Change(ChangeMove::new(0, Some(1), Some(2))),
            Move::Swap(SwapMove::new(0, 1)),
        ];
        let _ = evaluate_moves(&director, &moves, 2);

        assert_eq!(director.get_score(), before);
        for (a, b) in snapshot.lessons.iter().zip(director.working().lessons.iter()) {
            assert_eq!(a.room, b.room);
            assert_eq!(a.slot, b.slot);
        }
    }

    #[test]
    fn step_limit_bounds_the_search() {
        let scope = solved_scope(5, 2);
        assert!(scope.step_count() <= 5);
    }
}
