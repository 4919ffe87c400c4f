//! Macros generating the incremental plumbing shared by constraint shapes.
//!
//! Three shapes cover the whole catalogue:
//! - unary: a pure per-lesson penalty (`state: LessonScores` +
//!   `fn penalty(&self, solution, lesson) -> HardSoftScore`)
//! - pairwise: bucket-keyed pair scoring (`index: PairIndex<K>` +
//!   `fn key_of(...) -> Option<K>` + `fn pair_score(...) -> HardSoftScore`)
//! - aggregate: bucket-keyed group penalty (`index: AggregateIndex<K>` +
//!   `fn key_of(...) -> Option<K>` + `fn key_penalty(...) -> HardSoftScore`)

macro_rules! impl_uni_constraint {
    ($ty:ident, $name:expr, hard) => {
        impl_uni_constraint!(@impl $ty, $name, true);
    };
    ($ty:ident, $name:expr, soft) => {
        impl_uni_constraint!(@impl $ty, $name, false);
    };
    (@impl $ty:ident, $name:expr, $hard:expr) => {
        impl $crate::constraint::IncrementalConstraint for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn is_hard(&self) -> bool {
                $hard
            }

            fn evaluate(
                &self,
                solution: &timegrid_core::Timetable,
            ) -> timegrid_core::HardSoftScore {
                (0..solution.lessons.len())
                    .map(|l| self.penalty(solution, l))
                    .sum()
            }

            fn initialize(
                &mut self,
                solution: &timegrid_core::Timetable,
            ) -> timegrid_core::HardSoftScore {
                let scores: Vec<timegrid_core::HardSoftScore> = (0..solution.lessons.len())
                    .map(|l| self.penalty(solution, l))
                    .collect();
                self.state.seed(scores)
            }

            fn on_retract(
                &mut self,
                _solution: &timegrid_core::Timetable,
                lesson: usize,
            ) -> timegrid_core::HardSoftScore {
                self.state.clear(lesson)
            }

            fn on_insert(
                &mut self,
                solution: &timegrid_core::Timetable,
                lesson: usize,
            ) -> timegrid_core::HardSoftScore {
                let score = self.penalty(solution, lesson);
                self.state.set(lesson, score)
            }

            fn reset(&mut self) {
                self.state.reset();
            }

            fn matches(
                &self,
                solution: &timegrid_core::Timetable,
            ) -> Vec<$crate::analysis::ConstraintMatch> {
                (0..solution.lessons.len())
                    .filter_map(|l| {
                        let score = self.penalty(solution, l);
                        (score != timegrid_core::HardSoftScore::ZERO).then(|| {
                            $crate::analysis::ConstraintMatch::of(
                                vec![solution.lessons[l].id().to_string()],
                                score,
                            )
                        })
                    })
                    .collect()
            }
        }
    };
}

macro_rules! impl_pair_constraint {
    ($ty:ident, $name:expr, hard) => {
        impl_pair_constraint!(@impl $ty, $name, true);
    };
    ($ty:ident, $name:expr, soft) => {
        impl_pair_constraint!(@impl $ty, $name, false);
    };
    (@impl $ty:ident, $name:expr, $hard:expr) => {
        impl $crate::constraint::IncrementalConstraint for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn is_hard(&self) -> bool {
                $hard
            }

            fn evaluate(
                &self,
                solution: &timegrid_core::Timetable,
            ) -> timegrid_core::HardSoftScore {
                $crate::constraint::pair_total(
                    solution,
                    |s, l| self.key_of(s, l),
                    |s, a, b| self.pair_score(s, a, b),
                )
            }

            fn initialize(
                &mut self,
                solution: &timegrid_core::Timetable,
            ) -> timegrid_core::HardSoftScore {
                self.index.reset();
                let mut total = timegrid_core::HardSoftScore::ZERO;
                for lesson in 0..solution.lessons.len() {
                    if let Some(key) = self.key_of(solution, lesson) {
                        for &other in self.index.occupants(&key) {
                            total = total + self.pair_score(solution, lesson, other);
                        }
                        self.index.add(lesson, key);
                    }
                }
                total
            }

            fn on_retract(
                &mut self,
                solution: &timegrid_core::Timetable,
                lesson: usize,
            ) -> timegrid_core::HardSoftScore {
                let Some(key) = self.index.remove(lesson) else {
                    return timegrid_core::HardSoftScore::ZERO;
                };
                let mut removed = timegrid_core::HardSoftScore::ZERO;
                for &other in self.index.occupants(&key) {
                    removed = removed + self.pair_score(solution, lesson, other);
                }
                -removed
            }

            fn on_insert(
                &mut self,
                solution: &timegrid_core::Timetable,
                lesson: usize,
            ) -> timegrid_core::HardSoftScore {
                let Some(key) = self.key_of(solution, lesson) else {
                    return timegrid_core::HardSoftScore::ZERO;
                };
                let mut added = timegrid_core::HardSoftScore::ZERO;
                for &other in self.index.occupants(&key) {
                    added = added + self.pair_score(solution, lesson, other);
                }
                self.index.add(lesson, key);
                added
            }

            fn reset(&mut self) {
                self.index.reset();
            }

            fn matches(
                &self,
                solution: &timegrid_core::Timetable,
            ) -> Vec<$crate::analysis::ConstraintMatch> {
                $crate::constraint::pair_matches(
                    solution,
                    |s, l| self.key_of(s, l),
                    |s, a, b| self.pair_score(s, a, b),
                )
            }
        }
    };
}

macro_rules! impl_aggregate_constraint {
    ($ty:ident, $name:expr, hard) => {
        impl_aggregate_constraint!(@impl $ty, $name, true);
    };
    ($ty:ident, $name:expr, soft) => {
        impl_aggregate_constraint!(@impl $ty, $name, false);
    };
    (@impl $ty:ident, $name:expr, $hard:expr) => {
        impl $crate::constraint::IncrementalConstraint for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn is_hard(&self) -> bool {
                $hard
            }

            fn evaluate(
                &self,
                solution: &timegrid_core::Timetable,
            ) -> timegrid_core::HardSoftScore {
                $crate::constraint::aggregate_total(
                    solution,
                    |s, l| self.key_of(s, l),
                    |s, members| self.key_penalty(s, members),
                )
            }

            fn initialize(
                &mut self,
                solution: &timegrid_core::Timetable,
            ) -> timegrid_core::HardSoftScore {
                self.index.reset();
                for lesson in 0..solution.lessons.len() {
                    if let Some(key) = self.key_of(solution, lesson) {
                        self.index.add(lesson, key);
                    }
                }
                let mut total = timegrid_core::HardSoftScore::ZERO;
                for key in self.index.keys() {
                    let score = self.key_penalty(solution, self.index.members(&key));
                    total = total + self.index.rebook(key, score);
                }
                total
            }

            fn on_retract(
                &mut self,
                solution: &timegrid_core::Timetable,
                lesson: usize,
            ) -> timegrid_core::HardSoftScore {
                let Some(key) = self.index.remove(lesson) else {
                    return timegrid_core::HardSoftScore::ZERO;
                };
                let score = self.key_penalty(solution, self.index.members(&key));
                self.index.rebook(key, score)
            }

            fn on_insert(
                &mut self,
                solution: &timegrid_core::Timetable,
                lesson: usize,
            ) -> timegrid_core::HardSoftScore {
                let Some(key) = self.key_of(solution, lesson) else {
                    return timegrid_core::HardSoftScore::ZERO;
                };
                self.index.add(lesson, key.clone());
                let score = self.key_penalty(solution, self.index.members(&key));
                self.index.rebook(key, score)
            }

            fn reset(&mut self) {
                self.index.reset();
            }

            fn matches(
                &self,
                solution: &timegrid_core::Timetable,
            ) -> Vec<$crate::analysis::ConstraintMatch> {
                $crate::constraint::aggregate_matches(
                    solution,
                    |s, l| self.key_of(s, l),
                    |s, members| self.key_penalty(s, members),
                )
            }
        }
    };
}
