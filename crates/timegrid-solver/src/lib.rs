//! Timegrid Solver - construction heuristic and local-search engine
//!
//! The solver turns an unassigned [`timegrid_core::Timetable`] into a
//! scored one in two phases:
//!
//! 1. A greedy construction heuristic places the hardest lessons first,
//!    guaranteeing a complete (though possibly infeasible) assignment.
//! 2. A tabu/late-acceptance local search improves the assignment with
//!    change and swap moves, evaluating candidates in parallel and
//!    tracking the best incumbent separately from the exploration state.
//!
//! An unsatisfiable instance is not an error: the best incumbent is
//! returned with its true score, and callers decide what an infeasible
//! hard score means for them.

pub mod construction;
pub mod localsearch;
pub mod moves;
pub mod scope;
pub mod solver;
pub mod termination;

#[cfg(test)]
mod test_utils;

use timegrid_scoring::ConstraintSet;

pub use construction::ConstructionHeuristic;
pub use localsearch::LocalSearchPhase;
pub use moves::{ChangeMove, Move, SwapMove};
pub use scope::SolverScope;
pub use solver::{SolvedTimetable, Solver};
pub use termination::{CompositeTermination, TerminationCondition};

/// A solving phase run to completion by the driver.
pub trait Phase<C: ConstraintSet> {
    fn solve(&mut self, scope: &mut SolverScope<C>);

    fn phase_type_name(&self) -> &'static str;
}
