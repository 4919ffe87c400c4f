//! Solver-level scope: working director, incumbent, rng, timing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use timegrid_core::{HardSoftScore, Timetable};
use timegrid_scoring::{ConstraintSet, TimetableScoreDirector};

/// Top-level scope for the entire solving process.
///
/// The working director is owned here and only ever mutated by the driver
/// thread; the incumbent (best solution seen) is tracked separately from
/// the exploration state and is the only thing the solver returns.
pub struct SolverScope<C: ConstraintSet> {
    director: TimetableScoreDirector<C>,
    best_solution: Option<Timetable>,
    best_score: Option<HardSoftScore>,
    rng: StdRng,
    start_time: Option<Instant>,
    step_count: u64,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl<C: ConstraintSet> SolverScope<C> {
    pub fn new(director: TimetableScoreDirector<C>) -> Self {
        Self {
            director,
            best_solution: None,
            best_score: None,
            rng: StdRng::from_os_rng(),
            start_time: None,
            step_count: 0,
            terminate_early_flag: None,
        }
    }

    pub fn with_seed(director: TimetableScoreDirector<C>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(director)
        }
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.step_count = 0;
    }

    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn director(&self) -> &TimetableScoreDirector<C> {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut TimetableScoreDirector<C> {
        &mut self.director
    }

    pub fn working_solution(&self) -> &Timetable {
        self.director.working()
    }

    pub fn calculate_score(&mut self) -> HardSoftScore {
        self.director.calculate_score()
    }

    pub fn best_solution(&self) -> Option<&Timetable> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<HardSoftScore> {
        self.best_score
    }

    /// Promotes the working solution to incumbent when it is strictly
    /// better; the incumbent score is lexicographically non-worsening.
    pub fn update_best_solution(&mut self) {
        let current = self.director.get_score();
        let improved = match self.best_score {
            None => true,
            Some(best) => current > best,
        };
        if improved {
            self.best_solution = Some(self.director.clone_working());
            self.best_score = Some(current);
            tracing::debug!(score = %current, step = self.step_count, "new incumbent");
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.step_count += 1;
        self.step_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// The incumbent, or the working solution when nothing was ever
    /// promoted (e.g. termination before the first step).
    pub fn take_best_or_working_solution(self) -> Timetable {
        match self.best_solution {
            Some(best) => best,
            None => self.director.clone_working(),
        }
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
