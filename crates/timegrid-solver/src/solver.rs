//! Solver driver: phase sequencing, cooperative cancellation and final
//! reporting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use timegrid_config::{EnvironmentMode, ProblemConfig, SolverSettings};
use timegrid_core::{HardSoftScore, Timetable};
use timegrid_scoring::{standard_catalogue, ConstraintSet, ScoreAnalysis, TimetableScoreDirector};

use crate::construction::ConstructionHeuristic;
use crate::localsearch::LocalSearchPhase;
use crate::scope::SolverScope;
use crate::termination::{CompositeTermination, TerminationCondition};
use crate::Phase;

/// The frozen result of a solver run: the incumbent timetable, its score
/// and the per-constraint violation breakdown for external exporters.
///
/// An infeasible result is a valid result; `score.hard() < 0` tells the
/// caller by how much.
#[derive(Debug, Clone)]
pub struct SolvedTimetable {
    pub timetable: Timetable,
    pub score: HardSoftScore,
    pub analysis: ScoreAnalysis,
}

impl SolvedTimetable {
    pub fn is_feasible(&self) -> bool {
        self.score.is_feasible()
    }
}

/// Orchestrates construction → local search and returns the incumbent.
///
/// # Example
///
/// ```ignore
/// let solver = Solver::new(ProblemConfig::campus_default(), SolverSettings::default());
/// let solved = solver.solve(problem);
/// tracing::info!(score = %solved.score, "solved");
/// ```
pub struct Solver {
    problem_config: ProblemConfig,
    settings: SolverSettings,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl Solver {
    pub fn new(problem_config: ProblemConfig, settings: SolverSettings) -> Self {
        Solver {
            problem_config,
            settings,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests early termination; safe to call from another thread. The
    /// in-flight step completes before the solver halts. Returns false
    /// when no solve is running.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Runs both phases and freezes the incumbent.
    ///
    /// Never fails for unsatisfiable instances: the best incumbent found
    /// is returned with its true (possibly infeasible) score.
    pub fn solve(&self, problem: Timetable) -> SolvedTimetable {
        self.solving.store(true, Ordering::SeqCst);
        self.terminate_early_flag.store(false, Ordering::SeqCst);

        let full_assert = self.settings.environment_mode == EnvironmentMode::FullAssert;
        let director =
            TimetableScoreDirector::new(problem, standard_catalogue(&self.problem_config))
                .with_full_assert(full_assert);
        let mut scope = match self.settings.random_seed {
            Some(seed) => SolverScope::with_seed(director, seed),
            None => SolverScope::new(director),
        };
        scope.set_terminate_early_flag(self.terminate_early_flag.clone());
        scope.start_solving();

        tracing::info!(
            lessons = scope.working_solution().lessons.len(),
            rooms = scope.working_solution().rooms.len(),
            slots = scope.working_solution().slots.len(),
            "solving started"
        );

        let mut construction = ConstructionHeuristic::new(&self.problem_config);
        self.run_phase(&mut construction, &mut scope);

        let termination = self.build_termination();
        if !termination.should_terminate(&scope) {
            let workers = self.settings.move_thread_count.resolve();
            let mut local_search =
                LocalSearchPhase::new(self.settings.local_search.clone(), workers, termination);
            self.run_phase(&mut local_search, &mut scope);
        }

        self.solving.store(false, Ordering::SeqCst);

        let steps = scope.step_count();
        let elapsed = scope.elapsed();
        let mut best = scope.take_best_or_working_solution();

        // Freeze the incumbent and attach the diagnostic breakdown.
        let constraints = standard_catalogue(&self.problem_config);
        let score = constraints.evaluate_all(&best);
        best.score = Some(score);
        let analysis = ScoreAnalysis {
            score,
            constraints: constraints.analyze(&best),
        };

        tracing::info!(
            score = %score,
            feasible = score.is_feasible(),
            steps,
            elapsed = ?elapsed,
            "solving ended"
        );

        SolvedTimetable {
            timetable: best,
            score,
            analysis,
        }
    }

    fn run_phase<C, P>(&self, phase: &mut P, scope: &mut SolverScope<C>)
    where
        C: ConstraintSet,
        P: Phase<C>,
    {
        tracing::debug!(phase = phase.phase_type_name(), "phase started");
        phase.solve(scope);
        tracing::debug!(
            phase = phase.phase_type_name(),
            best = ?scope.best_score(),
            "phase ended"
        );
    }

    fn build_termination(&self) -> CompositeTermination {
        let termination = &self.settings.termination;
        let mut conditions = Vec::new();
        if let Some(limit) = termination.time_limit() {
            conditions.push(TerminationCondition::TimeSpent(limit));
        }
        if let Some(steps) = termination.step_count_limit {
            conditions.push(TerminationCondition::StepCount(steps));
        }
        if termination.stop_on_first_feasible {
            conditions.push(TerminationCondition::FirstFeasible);
        }
        CompositeTermination::new(conditions)
    }
}
