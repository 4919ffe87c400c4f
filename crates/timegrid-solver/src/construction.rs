//! Greedy construction heuristic.
//!
//! Places every lesson, hardest first: batched labs and priority-mapped
//! courses have the fewest legal rooms, then larger groups, then input
//! order as the stable tie-break. Each lesson takes the (room, slot) pair
//! with the best incremental score; when scores tie, the pair with the
//! better priority-lab rank wins, then the first pair encountered. No
//! lesson is ever skipped: completeness is guaranteed, feasibility is not.

use std::cmp::Reverse;
use std::sync::Arc;

use timegrid_config::{BatchingPolicy, PriorityLabs, ProblemConfig};
use timegrid_core::{HardSoftScore, Timetable};
use timegrid_scoring::ConstraintSet;

use crate::scope::SolverScope;
use crate::Phase;

/// Tie-break weight for rooms outside a mapped course's priority list.
const OFF_LIST_RANK_PENALTY: i64 = 1000;

pub struct ConstructionHeuristic {
    batching: Arc<BatchingPolicy>,
    priority_labs: Arc<PriorityLabs>,
}

impl ConstructionHeuristic {
    pub fn new(config: &ProblemConfig) -> Self {
        ConstructionHeuristic {
            batching: Arc::new(config.batching.clone()),
            priority_labs: Arc::new(config.priority_labs.clone()),
        }
    }

    /// Unassigned lessons in placement order.
    fn placement_order(&self, solution: &Timetable) -> Vec<usize> {
        let mut order: Vec<usize> = (0..solution.lessons.len())
            .filter(|&l| !solution.lessons[l].is_assigned())
            .collect();
        order.sort_by_key(|&l| {
            let lesson = &solution.lessons[l];
            let constrained = lesson.is_split_batch()
                || self.priority_labs.is_mapped(&solution.course_of(lesson).code);
            let required = lesson
                .required_capacity(solution.group_of(lesson).size, self.batching.lab_batch_size);
            (!constrained as u8, Reverse(required), l)
        });
        order
    }

    /// Tie-break table: rank k charges k-1, off-list rooms a large
    /// constant, unmapped courses nothing.
    fn rank_penalty(&self, solution: &Timetable, lesson: usize, room: usize) -> i64 {
        let code = &solution.course_of(&solution.lessons[lesson]).code;
        if !self.priority_labs.is_mapped(code) {
            return 0;
        }
        match self.priority_labs.rank_of(code, &solution.rooms[room].name) {
            Some(rank) => rank as i64 - 1,
            None => OFF_LIST_RANK_PENALTY,
        }
    }
}

impl<C: ConstraintSet> Phase<C> for ConstructionHeuristic {
    fn solve(&mut self, scope: &mut SolverScope<C>) {
        scope.calculate_score();
        let order = self.placement_order(scope.working_solution());
        let room_count = scope.working_solution().rooms.len();
        let slot_count = scope.working_solution().slots.len();
        tracing::debug!(lessons = order.len(), "construction heuristic started");

        for lesson in order {
            // The time budget is ignored here on purpose: an explicit
            // cancel stops between placements, the construction otherwise
            // runs to completion so every lesson ends up assigned.
            if scope.is_terminate_early() {
                break;
            }

            let mut best: Option<(usize, usize, HardSoftScore, i64)> = None;
            for room in 0..room_count {
                let rank = self.rank_penalty(scope.director().working(), lesson, room);
                for slot in 0..slot_count {
                    let director = scope.director_mut();
                    let score = director.do_change(lesson, |s| {
                        s.lessons[lesson].room = Some(room);
                        s.lessons[lesson].slot = Some(slot);
                    });
                    director.do_change(lesson, |s| {
                        s.lessons[lesson].room = None;
                        s.lessons[lesson].slot = None;
                    });

                    let better = match best {
                        None => true,
                        Some((_, _, best_score, best_rank)) => {
                            score > best_score || (score == best_score && rank < best_rank)
                        }
                    };
                    if better {
                        best = Some((room, slot, score, rank));
                    }
                }
            }

            if let Some((room, slot, score, _)) = best {
                scope.director_mut().do_change(lesson, |s| {
                    s.lessons[lesson].room = Some(room);
                    s.lessons[lesson].slot = Some(slot);
                });
                tracing::trace!(lesson, room, slot, score = %score, "placed");
            }
        }

        scope.update_best_solution();
        tracing::debug!(score = %scope.director().get_score(), "construction heuristic finished");
    }

    fn phase_type_name(&self) -> &'static str {
        "ConstructionHeuristic"
    }
}

#[cfg(test)]
mod tests {
    use timegrid_scoring::{standard_catalogue, TimetableScoreDirector};

    use super::*;
    use crate::test_utils::{campus_config, lab_problem, small_problem};

    fn run(problem: Timetable) -> SolverScope<timegrid_scoring::TimetableConstraints> {
        let config = campus_config();
        let director = TimetableScoreDirector::new(problem, standard_catalogue(&config));
        let mut scope = SolverScope::with_seed(director, 17);
        scope.start_solving();
        let mut phase = ConstructionHeuristic::new(&config);
        Phase::solve(&mut phase, &mut scope);
        scope
    }

    #[test]
    fn every_lesson_gets_assigned() {
        let scope = run(lab_problem());
        assert!(scope.working_solution().is_fully_assigned());
        assert!(scope.best_solution().unwrap().is_fully_assigned());
    }

    #[test]
    fn small_instance_constructs_feasible() {
        let scope = run(small_problem());
        let score = scope.best_score().unwrap();
        assert!(score.is_feasible(), "expected feasible, got {score}");
    }

    #[test]
    fn hard_lessons_come_first() {
        let problem = lab_problem();
        let config = campus_config();
        let heuristic = ConstructionHeuristic::new(&config);
        let order = heuristic.placement_order(&problem);

        // Batched CS301 labs (indices 3, 4) and the priority-mapped CS301
        // lecture (index 2) precede the unmapped CS101 lectures.
        let class_of = |l: usize| order.iter().position(|&x| x == l).unwrap();
        assert!(class_of(3) < class_of(0));
        assert!(class_of(4) < class_of(0));
        assert!(class_of(2) < class_of(0));
        // Stable within a class: CS101 lectures keep input order.
        assert!(class_of(0) < class_of(1));
    }

    #[test]
    fn preassigned_lessons_are_left_alone() {
        let mut problem = small_problem();
        problem.lessons[0].room = Some(1);
        problem.lessons[0].slot = Some(2);
        let scope = run(problem);
        let solution = scope.working_solution();
        assert_eq!(solution.lessons[0].room, Some(1));
        assert_eq!(solution.lessons[0].slot, Some(2));
        assert!(solution.is_fully_assigned());
    }

    #[test]
    fn labs_land_in_lab_rooms_and_slots() {
        let scope = run(lab_problem());
        let solution = scope.working_solution();
        for lesson in &solution.lessons {
            if lesson.requires_lab_room() {
                assert!(solution.room_of(lesson).unwrap().is_lab);
                assert!(solution.slot_of(lesson).unwrap().is_lab);
            }
        }
    }
}
