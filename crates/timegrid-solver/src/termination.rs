//! Termination conditions, polled once per outer step.

use std::time::Duration;

use timegrid_scoring::ConstraintSet;

use crate::scope::SolverScope;

/// A single termination criterion.
#[derive(Debug, Clone)]
pub enum TerminationCondition {
    /// Wall-clock budget exceeded.
    TimeSpent(Duration),

    /// Local-search step budget exceeded.
    StepCount(u64),

    /// The incumbent reached hard score 0 ("stop on first feasible").
    FirstFeasible,
}

impl TerminationCondition {
    pub fn is_terminated<C: ConstraintSet>(&self, scope: &SolverScope<C>) -> bool {
        match *self {
            TerminationCondition::TimeSpent(limit) => {
                scope.elapsed().is_some_and(|e| e >= limit)
            }
            TerminationCondition::StepCount(limit) => scope.step_count() >= limit,
            TerminationCondition::FirstFeasible => {
                scope.best_score().is_some_and(|s| s.is_feasible())
            }
        }
    }
}

/// Any-of composite over the configured conditions plus the cooperative
/// terminate-early flag.
#[derive(Debug, Clone, Default)]
pub struct CompositeTermination {
    conditions: Vec<TerminationCondition>,
}

impl CompositeTermination {
    pub fn new(conditions: Vec<TerminationCondition>) -> Self {
        CompositeTermination { conditions }
    }

    pub fn should_terminate<C: ConstraintSet>(&self, scope: &SolverScope<C>) -> bool {
        scope.is_terminate_early()
            || self
                .conditions
                .iter()
                .any(|condition| condition.is_terminated(scope))
    }
}
